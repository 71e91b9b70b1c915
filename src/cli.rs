use clap::{Parser, Subcommand};
use pocket_atelier::model::{ProjectMode, WidgetType};
use pocket_atelier::widgets::{
    DisplayFormat, DisplayUnit, GaugeStyle, LifeDesignType, MixElementType, MottoTemplate, Weekday,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "atelier",
    version,
    about = "Design phone wallpapers and home-screen widgets"
)]
pub struct Cli {
    /// Project file to use instead of the configured one
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create and save a new project
    New {
        /// timetable, timegauge, progress, motto or mixmatch
        widget_type: WidgetType,
        /// wallpaper or widget (defaults to the configured mode)
        #[arg(long)]
        mode: Option<ProjectMode>,
        /// Project title
        #[arg(long)]
        title: Option<String>,
    },
    /// List saved projects
    List,
    /// Show a project and its live preview values
    Show {
        project_id: String,
        /// Device preset used to report export size
        #[arg(long)]
        device: Option<String>,
    },
    /// Delete a saved project
    Delete { project_id: String },
    /// List export resolution presets
    Devices,
    /// Edit timetable items
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },
    /// Configure a time gauge
    Gauge {
        project_id: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, value_parser = parse_display_format)]
        format: Option<DisplayFormat>,
        #[arg(long, value_parser = parse_gauge_style)]
        style: Option<GaugeStyle>,
        #[arg(long)]
        label: Option<String>,
    },
    /// Configure life progress
    Life {
        project_id: String,
        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth: Option<String>,
        /// Expected lifespan in years (50-120)
        #[arg(long)]
        lifespan: Option<u32>,
        #[arg(long, value_parser = parse_display_unit)]
        unit: Option<DisplayUnit>,
        #[arg(long, value_parser = parse_design)]
        design: Option<LifeDesignType>,
        #[arg(long)]
        motto: Option<String>,
    },
    /// Edit the motto text
    Motto {
        project_id: String,
        #[arg(long)]
        text: Option<String>,
        /// Font size (12-64)
        #[arg(long)]
        size: Option<f32>,
        /// Rotation in degrees (-45..45)
        #[arg(long, allow_hyphen_values = true)]
        rotation: Option<f32>,
        #[arg(long, value_parser = parse_template)]
        template: Option<MottoTemplate>,
    },
    /// Edit mix & match elements
    Mix {
        #[command(subcommand)]
        action: MixAction,
    },
    /// Open the interactive editor
    Tui {
        /// Saved project to open; a new project is started when omitted
        project_id: Option<String>,
        /// Widget type for a new project
        #[arg(long, default_value = "timetable")]
        widget_type: WidgetType,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScheduleAction {
    /// Add an item to a day
    Add {
        project_id: String,
        day: Weekday,
        /// Start time (HH:MM)
        start: String,
        /// End time (HH:MM)
        end: String,
        title: String,
        #[arg(long, default_value = "#91D0FF")]
        color: String,
        #[arg(long)]
        emoji: Option<String>,
        /// Add to every visible day
        #[arg(long)]
        all_days: bool,
        /// Add even if it overlaps existing items
        #[arg(long)]
        force: bool,
    },
    /// Edit an existing item
    Edit {
        project_id: String,
        day: Weekday,
        item_id: String,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Save even if it overlaps existing items
        #[arg(long)]
        force: bool,
    },
    /// Remove an item
    Remove {
        project_id: String,
        day: Weekday,
        item_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MixAction {
    /// Place a new element near the canvas center
    Add {
        project_id: String,
        #[arg(value_parser = parse_mix_type)]
        kind: MixElementType,
        /// Text, emoji or shape name
        content: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove an element
    Remove { project_id: String, element_id: String },
    /// Bring an element to the front
    Front { project_id: String, element_id: String },
    /// Send an element to the back
    Back { project_id: String, element_id: String },
    /// Lock an element in place (or unlock it with --unlock)
    Lock {
        project_id: String,
        element_id: String,
        #[arg(long)]
        unlock: bool,
    },
}

fn parse_json_enum<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_ascii_lowercase()))
        .map_err(|_| format!("unsupported value: {}", raw))
}

fn parse_display_format(raw: &str) -> Result<DisplayFormat, String> {
    parse_json_enum(raw)
}

fn parse_gauge_style(raw: &str) -> Result<GaugeStyle, String> {
    parse_json_enum(raw)
}

fn parse_display_unit(raw: &str) -> Result<DisplayUnit, String> {
    parse_json_enum(raw)
}

fn parse_design(raw: &str) -> Result<LifeDesignType, String> {
    parse_json_enum(raw)
}

fn parse_template(raw: &str) -> Result<MottoTemplate, String> {
    parse_json_enum(raw)
}

fn parse_mix_type(raw: &str) -> Result<MixElementType, String> {
    parse_json_enum(raw)
}
