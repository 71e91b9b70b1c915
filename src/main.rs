mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use cli::{Command, MixAction, ScheduleAction};
use commands::{MixOp, Workspace};
use pocket_atelier::config::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let config = AppConfig::load_default()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ws = Workspace::resolve(config, args.store)?;
    tracing::debug!("using project file {:?}", ws.store_path);

    let command = args.command.unwrap_or(Command::List);
    match command {
        Command::New {
            widget_type,
            mode,
            title,
        } => commands::new_project(&ws, widget_type, mode, title),
        Command::List => commands::list(&ws),
        Command::Show { project_id, device } => commands::show(&ws, project_id, device),
        Command::Delete { project_id } => commands::delete(&ws, project_id),
        Command::Devices => commands::devices(&ws),
        Command::Schedule { action } => match action {
            ScheduleAction::Add {
                project_id,
                day,
                start,
                end,
                title,
                color,
                emoji,
                all_days,
                force,
            } => commands::schedule_add(
                &ws, project_id, day, start, end, title, color, emoji, all_days, force,
            ),
            ScheduleAction::Edit {
                project_id,
                day,
                item_id,
                start,
                end,
                title,
                color,
                force,
            } => commands::schedule_edit(
                &ws, project_id, day, item_id, start, end, title, color, force,
            ),
            ScheduleAction::Remove {
                project_id,
                day,
                item_id,
            } => commands::schedule_remove(&ws, project_id, day, item_id),
        },
        Command::Gauge {
            project_id,
            start,
            end,
            format,
            style,
            label,
        } => commands::gauge(&ws, project_id, start, end, format, style, label),
        Command::Life {
            project_id,
            birth,
            lifespan,
            unit,
            design,
            motto,
        } => commands::life(&ws, project_id, birth, lifespan, unit, design, motto),
        Command::Motto {
            project_id,
            text,
            size,
            rotation,
            template,
        } => commands::motto(&ws, project_id, text, size, rotation, template),
        Command::Mix { action } => match action {
            MixAction::Add {
                project_id,
                kind,
                content,
                color,
            } => commands::mix_add(&ws, project_id, kind, content, color),
            MixAction::Remove {
                project_id,
                element_id,
            } => commands::mix_edit(&ws, project_id, element_id, MixOp::Remove),
            MixAction::Front {
                project_id,
                element_id,
            } => commands::mix_edit(&ws, project_id, element_id, MixOp::Front),
            MixAction::Back {
                project_id,
                element_id,
            } => commands::mix_edit(&ws, project_id, element_id, MixOp::Back),
            MixAction::Lock {
                project_id,
                element_id,
                unlock,
            } => commands::mix_lock(&ws, project_id, element_id, !unlock),
        },
        Command::Tui {
            project_id,
            widget_type,
        } => commands::tui(&ws, project_id, widget_type),
    }
}
