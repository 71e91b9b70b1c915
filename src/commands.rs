use crate::ui;
use anyhow::{bail, Context, Result};
use chrono::Local;
use pocket_atelier::config::AppConfig;
use pocket_atelier::devices::{find_device, DEVICE_PRESETS};
use pocket_atelier::model::{
    generate_id, MixElementPatch, Project, ProjectError, ProjectMode, ProjectPatch,
    ScheduleItemPatch, WidgetData, WidgetType,
};
use pocket_atelier::storage::{load_store, save_store};
use pocket_atelier::store::ProjectStore;
use pocket_atelier::timecalc::{
    compute_life_stats, compute_range_progress, current_minutes, find_overlaps, format_gauge,
    parse_birth_date, try_clock_minutes,
};
use pocket_atelier::widgets::{
    centered_position, clamp_lifespan, next_z_index, DisplayFormat, DisplayUnit, GaugeStyle,
    LifeDesignType, MixElement, MixElementType, MottoTemplate, ScheduleItem, Weekday,
};
use rand::Rng;
use std::path::PathBuf;

/// Resolved settings shared by every command.
pub struct Workspace {
    pub config: AppConfig,
    pub store_path: PathBuf,
}

impl Workspace {
    pub fn resolve(config: AppConfig, store_override: Option<PathBuf>) -> Result<Self> {
        let store_path = config.resolve_data_file(store_override)?;
        Ok(Workspace { config, store_path })
    }

    fn load(&self) -> Result<ProjectStore> {
        load_store(&self.store_path)
    }

    /// Saves the open project into the collection and writes the file.
    fn commit(&self, store: &mut ProjectStore) -> Result<()> {
        store.save_project();
        save_store(&self.store_path, store)
    }
}

pub fn new_project(
    ws: &Workspace,
    widget_type: WidgetType,
    mode: Option<ProjectMode>,
    title: Option<String>,
) -> Result<()> {
    let mut store = ws.load()?;
    store.create_project(mode.unwrap_or(ws.config.default_mode), widget_type);
    if let Some(title) = title {
        store.update_current_project(ProjectPatch::title(title));
    }
    ws.commit(&mut store)?;
    if let Some(project) = store.current_project() {
        println!("Created {} project {}", widget_type, project.id);
    }
    Ok(())
}

pub fn list(ws: &Workspace) -> Result<()> {
    let store = ws.load()?;
    if store.projects().is_empty() {
        println!("(no projects)");
        return Ok(());
    }
    for project in store.projects() {
        println!(
            "{}  {:<9}  {:<9}  {}  (updated {})",
            project.id,
            project.widget_type(),
            project.mode,
            project.title,
            project
                .updated_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

pub fn show(ws: &Workspace, project_id: String, device: Option<String>) -> Result<()> {
    let store = ws.load()?;
    let project = store
        .find_project(&project_id)
        .ok_or_else(|| ProjectError::ProjectNotFound(project_id.clone()))?;
    let device_id = device.unwrap_or_else(|| ws.config.default_device.clone());
    let device = find_device(&device_id)?;
    println!("{} [{}]", project.title, project.id);
    println!(
        "  {} {}  •  background {}",
        project.mode,
        project.widget_type(),
        project.bg_color
    );
    println!(
        "  export {}x{} ({})",
        device.width, device.height, device.name
    );
    for line in preview_lines(project) {
        println!("  {}", line);
    }
    Ok(())
}

pub fn delete(ws: &Workspace, project_id: String) -> Result<()> {
    let mut store = ws.load()?;
    if store.find_project(&project_id).is_none() {
        bail!(ProjectError::ProjectNotFound(project_id));
    }
    store.delete_project(&project_id);
    save_store(&ws.store_path, &store)?;
    println!("Deleted project {}", project_id);
    Ok(())
}

pub fn devices(ws: &Workspace) -> Result<()> {
    for device in DEVICE_PRESETS {
        let marker = if device.id == ws.config.default_device {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:<16} {:>4}x{:<4}  {}",
            marker, device.id, device.width, device.height, device.name
        );
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn schedule_add(
    ws: &Workspace,
    project_id: String,
    day: Weekday,
    start: String,
    end: String,
    title: String,
    color: String,
    emoji: Option<String>,
    all_days: bool,
    force: bool,
) -> Result<()> {
    let mut store = ws.load()?;
    let project = open_project(&mut store, &project_id, WidgetType::Timetable)?;
    let title = title.trim().to_string();
    if title.is_empty() {
        bail!("title must not be empty");
    }
    let mut template = ScheduleItem::new(generate_id(), start, end, title, color);
    template.emoji = emoji;
    template.validate()?;

    let days = match (all_days, project.timetable()) {
        (true, Some(timetable)) => Weekday::visible(timetable.show_weekend),
        _ => vec![day],
    };
    let conflicts = days
        .iter()
        .flat_map(|d| {
            find_overlaps(
                project.schedule(*d),
                &template.start_time,
                &template.end_time,
                None,
            )
            .into_iter()
            .map(move |item| (*d, item.title.clone()))
        })
        .collect::<Vec<_>>();
    if !confirm_overlaps(&conflicts, force) {
        bail!("not added; pass --force to add anyway");
    }

    for d in &days {
        let mut item = template.clone();
        if days.len() > 1 {
            item.id = format!("{}-{}", template.id, d);
        }
        store.add_schedule_item(*d, item);
    }
    ws.commit(&mut store)?;
    println!(
        "Added \"{}\" {}-{} to {}",
        template.title,
        template.start_time,
        template.end_time,
        days.iter()
            .map(Weekday::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn schedule_edit(
    ws: &Workspace,
    project_id: String,
    day: Weekday,
    item_id: String,
    start: Option<String>,
    end: Option<String>,
    title: Option<String>,
    color: Option<String>,
    force: bool,
) -> Result<()> {
    let mut store = ws.load()?;
    let project = open_project(&mut store, &project_id, WidgetType::Timetable)?;
    let existing = project
        .schedule(day)
        .iter()
        .find(|i| i.id == item_id)
        .cloned()
        .ok_or_else(|| ProjectError::ScheduleItemNotFound {
            day,
            id: item_id.clone(),
        })?;
    let patch = ScheduleItemPatch {
        start_time: start,
        end_time: end,
        title: title.map(|t| t.trim().to_string()),
        color,
        emoji: None,
    };
    let mut edited = existing.clone();
    patch.apply(&mut edited);
    edited.validate()?;

    let conflicts = find_overlaps(
        project.schedule(day),
        &edited.start_time,
        &edited.end_time,
        Some(&item_id),
    )
    .into_iter()
    .map(|item| (day, item.title.clone()))
    .collect::<Vec<_>>();
    if !confirm_overlaps(&conflicts, force) {
        bail!("not saved; pass --force to save anyway");
    }

    store.update_schedule_item(day, &item_id, patch);
    ws.commit(&mut store)?;
    println!("Updated item {} on {}", item_id, day);
    Ok(())
}

pub fn schedule_remove(
    ws: &Workspace,
    project_id: String,
    day: Weekday,
    item_id: String,
) -> Result<()> {
    let mut store = ws.load()?;
    let project = open_project(&mut store, &project_id, WidgetType::Timetable)?;
    if !project.schedule(day).iter().any(|i| i.id == item_id) {
        bail!(ProjectError::ScheduleItemNotFound { day, id: item_id });
    }
    store.remove_schedule_item(day, &item_id);
    ws.commit(&mut store)?;
    println!("Removed item {} from {}", item_id, day);
    Ok(())
}

pub fn gauge(
    ws: &Workspace,
    project_id: String,
    start: Option<String>,
    end: Option<String>,
    format: Option<DisplayFormat>,
    style: Option<GaugeStyle>,
    label: Option<String>,
) -> Result<()> {
    let mut store = ws.load()?;
    let project = open_project(&mut store, &project_id, WidgetType::TimeGauge)?;
    let mut data = project
        .time_gauge()
        .cloned()
        .context("project has no gauge data")?;
    if let Some(start) = start {
        try_clock_minutes(&start)?;
        data.start_time = start;
    }
    if let Some(end) = end {
        try_clock_minutes(&end)?;
        data.end_time = end;
    }
    if let Some(format) = format {
        data.display_format = format;
    }
    if let Some(style) = style {
        data.gauge_style = style;
    }
    if let Some(label) = label {
        data.label = label;
    }
    store.update_current_project(ProjectPatch::widget(WidgetData::TimeGauge { data }));
    ws.commit(&mut store)?;
    if let Some(project) = store.current_project() {
        for line in preview_lines(project) {
            println!("{}", line);
        }
    }
    Ok(())
}

pub fn life(
    ws: &Workspace,
    project_id: String,
    birth: Option<String>,
    lifespan: Option<u32>,
    unit: Option<DisplayUnit>,
    design: Option<LifeDesignType>,
    motto: Option<String>,
) -> Result<()> {
    let mut store = ws.load()?;
    let project = open_project(&mut store, &project_id, WidgetType::LifeProgress)?;
    let mut data = project
        .life_progress()
        .cloned()
        .context("project has no life progress data")?;
    if let Some(birth) = birth {
        parse_birth_date(&birth)?;
        data.birth_date = birth;
    }
    if let Some(years) = lifespan {
        data.expected_lifespan = clamp_lifespan(years);
    }
    if let Some(unit) = unit {
        data.display_unit = unit;
    }
    if let Some(design) = design {
        data.design_type = design;
    }
    if let Some(motto) = motto {
        data.motto = Some(motto).filter(|m| !m.trim().is_empty());
    }
    store.update_current_project(ProjectPatch::widget(WidgetData::LifeProgress { data }));
    ws.commit(&mut store)?;
    if let Some(project) = store.current_project() {
        for line in preview_lines(project) {
            println!("{}", line);
        }
    }
    Ok(())
}

pub fn motto(
    ws: &Workspace,
    project_id: String,
    text: Option<String>,
    size: Option<f32>,
    rotation: Option<f32>,
    template: Option<MottoTemplate>,
) -> Result<()> {
    let mut store = ws.load()?;
    let project = open_project(&mut store, &project_id, WidgetType::Motto)?;
    let mut data = project
        .motto()
        .cloned()
        .context("project has no motto data")?;
    if let Some(template) = template {
        data.template = template;
    }
    if let Some(primary) = data.texts.first_mut() {
        if let Some(text) = text {
            primary.content = text;
        }
        if let Some(size) = size {
            primary.font_size = size;
        }
        if let Some(rotation) = rotation {
            primary.rotation = rotation;
        }
        *primary = primary.clone().clamped();
    }
    store.update_current_project(ProjectPatch::widget(WidgetData::Motto { data }));
    ws.commit(&mut store)?;
    println!("Updated motto for {}", project_id);
    Ok(())
}

pub fn mix_add(
    ws: &Workspace,
    project_id: String,
    kind: MixElementType,
    content: String,
    color: Option<String>,
) -> Result<()> {
    let mut store = ws.load()?;
    let project = open_project(&mut store, &project_id, WidgetType::MixMatch)?;
    let existing = project.mix_elements().unwrap_or(&[]);
    let mut rng = rand::thread_rng();
    let mut element = MixElement::new(generate_id(), kind, content);
    let (x, y) = centered_position(
        element.width,
        element.height,
        (rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5)),
    );
    element.x = x;
    element.y = y;
    element.z_index = next_z_index(existing);
    element.color = color;
    if kind == MixElementType::Tape {
        element.rotation = rng.gen_range(-10.0..10.0);
    }
    let id = element.id.clone();
    store.add_mix_element(element);
    ws.commit(&mut store)?;
    println!("Added {:?} element {}", kind, id);
    Ok(())
}

pub enum MixOp {
    Remove,
    Front,
    Back,
}

pub fn mix_edit(ws: &Workspace, project_id: String, element_id: String, op: MixOp) -> Result<()> {
    let mut store = ws.load()?;
    let project = open_project(&mut store, &project_id, WidgetType::MixMatch)?;
    let element = project
        .mix_elements()
        .and_then(|els| els.iter().find(|e| e.id == element_id))
        .ok_or_else(|| ProjectError::MixElementNotFound(element_id.clone()))?;
    if element.locked && !matches!(op, MixOp::Remove) {
        bail!("element {} is locked", element_id);
    }
    match op {
        MixOp::Remove => store.remove_mix_element(&element_id),
        MixOp::Front => store.bring_mix_element_to_front(&element_id),
        MixOp::Back => store.send_mix_element_to_back(&element_id),
    }
    ws.commit(&mut store)?;
    if let Some(el) = store
        .current_project()
        .and_then(Project::mix_elements)
        .and_then(|els| els.iter().find(|e| e.id == element_id))
    {
        println!("Element {} now at z {}", element_id, el.z_index);
    } else {
        println!("Removed element {}", element_id);
    }
    Ok(())
}

pub fn mix_lock(
    ws: &Workspace,
    project_id: String,
    element_id: String,
    locked: bool,
) -> Result<()> {
    let mut store = ws.load()?;
    let project = open_project(&mut store, &project_id, WidgetType::MixMatch)?;
    if !project
        .mix_elements()
        .is_some_and(|els| els.iter().any(|e| e.id == element_id))
    {
        bail!(ProjectError::MixElementNotFound(element_id));
    }
    store.update_mix_element(
        &element_id,
        MixElementPatch {
            locked: Some(locked),
            ..Default::default()
        },
    );
    ws.commit(&mut store)?;
    println!(
        "{} element {}",
        if locked { "Locked" } else { "Unlocked" },
        element_id
    );
    Ok(())
}

pub fn tui(ws: &Workspace, project_id: Option<String>, widget_type: WidgetType) -> Result<()> {
    let mut store = ws.load()?;
    match project_id {
        Some(id) => {
            let project = store
                .find_project(&id)
                .cloned()
                .ok_or(ProjectError::ProjectNotFound(id))?;
            store.set_current_project(Some(project));
        }
        None => store.create_project(ws.config.default_mode, widget_type),
    }
    ui::run(store, ws.store_path.clone())
}

/// Loads a saved project into the editing slot and checks its widget type.
fn open_project(
    store: &mut ProjectStore,
    project_id: &str,
    expected: WidgetType,
) -> Result<Project> {
    let project = store
        .find_project(project_id)
        .cloned()
        .ok_or_else(|| ProjectError::ProjectNotFound(project_id.to_string()))?;
    ProjectError::expect_type(&project, expected)?;
    store.set_current_project(Some(project.clone()));
    Ok(project)
}

/// Prints the overlap warning; proceeds only when forced or clear.
fn confirm_overlaps(conflicts: &[(Weekday, String)], force: bool) -> bool {
    if conflicts.is_empty() {
        return true;
    }
    let names = conflicts
        .iter()
        .map(|(day, title)| format!("\"{}\" ({})", title, day))
        .collect::<Vec<_>>()
        .join(", ");
    eprintln!("warning: overlaps with {}", names);
    force
}

/// Text rendition of the widget preview at the current moment.
pub fn preview_lines(project: &Project) -> Vec<String> {
    match &project.widget {
        WidgetData::Timetable { data } => {
            let mut lines = vec![format!(
                "{:?} view, {:?} layout, selected {}",
                data.view_type, data.layout_mode, data.selected_day
            )];
            for day in Weekday::visible(data.show_weekend) {
                let items = data.days.get(day);
                if items.is_empty() {
                    continue;
                }
                lines.push(format!("{}:", day));
                for item in items {
                    lines.push(format!(
                        "  {}-{} {}{} [{}]",
                        item.start_time,
                        item.end_time,
                        item.emoji
                            .as_deref()
                            .map(|e| format!("{} ", e))
                            .unwrap_or_default(),
                        item.title,
                        item.id
                    ));
                }
            }
            lines
        }
        WidgetData::TimeGauge { data } => {
            let progress =
                compute_range_progress(&data.start_time, &data.end_time, current_minutes());
            vec![
                format!("{} ({}-{})", data.label, data.start_time, data.end_time),
                format!(
                    "{} {}",
                    progress_bar(progress, 30),
                    format_gauge(progress, data.display_format, &data.start_time, &data.end_time)
                ),
            ]
        }
        WidgetData::LifeProgress { data } => {
            let stats =
                compute_life_stats(&data.birth_date, data.expected_lifespan, data.display_unit);
            let mut lines = vec![
                format!("born {}, expecting {} years", data.birth_date, data.expected_lifespan),
                format!("{} {}", progress_bar(stats.progress, 30), stats.percent_text()),
            ];
            if data.show_details {
                lines.push(format!(
                    "{} / {} {} lived, {} left",
                    stats.elapsed, stats.total, stats.unit_label, stats.remaining
                ));
            }
            if let Some(motto) = &data.motto {
                lines.push(format!("\"{}\"", motto));
            }
            lines
        }
        WidgetData::Motto { data } => data
            .texts
            .iter()
            .map(|t| {
                format!(
                    "{:?}: \"{}\" size {} rot {}° at ({:.2}, {:.2})",
                    data.template, t.content, t.font_size, t.rotation, t.position.x, t.position.y
                )
            })
            .collect(),
        WidgetData::MixMatch { elements } => {
            let mut ordered: Vec<&MixElement> = elements.iter().collect();
            ordered.sort_by_key(|e| e.z_index);
            ordered
                .into_iter()
                .map(|e| {
                    format!(
                        "z{:<3} {:?} \"{}\" at ({:.0}, {:.0}) {:.0}x{:.0}{} [{}]",
                        e.z_index,
                        e.kind,
                        e.content,
                        e.x,
                        e.y,
                        e.width,
                        e.height,
                        if e.locked { " locked" } else { "" },
                        e.id
                    )
                })
                .collect()
        }
    }
}

fn progress_bar(progress: f64, width: usize) -> String {
    let filled = (progress.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
