use crate::widgets::{
    LifeProgressData, MixElement, MixElementType, MottoData, ScheduleItem, TimeGaugeData,
    TimetableData, Weekday,
};
use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ProjectId = String;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectMode {
    Wallpaper,
    Widget,
}

impl FromStr for ProjectMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wallpaper" => Ok(ProjectMode::Wallpaper),
            "widget" => Ok(ProjectMode::Widget),
            other => Err(format!("unknown mode: {} (wallpaper|widget)", other)),
        }
    }
}

impl fmt::Display for ProjectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProjectMode::Wallpaper => "wallpaper",
            ProjectMode::Widget => "widget",
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum WidgetType {
    #[serde(rename = "timetable")]
    Timetable,
    #[serde(rename = "timegauge")]
    TimeGauge,
    #[serde(rename = "progress")]
    LifeProgress,
    #[serde(rename = "motto")]
    Motto,
    #[serde(rename = "mixmatch")]
    MixMatch,
}

impl WidgetType {
    pub const ALL: [WidgetType; 5] = [
        WidgetType::Timetable,
        WidgetType::TimeGauge,
        WidgetType::LifeProgress,
        WidgetType::Motto,
        WidgetType::MixMatch,
    ];

    pub fn key(self) -> &'static str {
        match self {
            WidgetType::Timetable => "timetable",
            WidgetType::TimeGauge => "timegauge",
            WidgetType::LifeProgress => "progress",
            WidgetType::Motto => "motto",
            WidgetType::MixMatch => "mixmatch",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            WidgetType::Timetable => "New Timetable",
            WidgetType::TimeGauge => "New Time Gauge",
            WidgetType::LifeProgress => "Life Progress",
            WidgetType::Motto => "Motto & Doodle",
            WidgetType::MixMatch => "Mix & Match",
        }
    }
}

impl FromStr for WidgetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        WidgetType::ALL
            .into_iter()
            .find(|w| w.key() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown widget type: {} (timetable|timegauge|progress|motto|mixmatch)",
                    s
                )
            })
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The single populated sub-schema of a project, discriminated by
/// `widgetType` on the wire.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "widgetType")]
pub enum WidgetData {
    #[serde(rename = "timetable")]
    Timetable {
        #[serde(rename = "timetableData", default)]
        data: TimetableData,
    },
    #[serde(rename = "timegauge")]
    TimeGauge {
        #[serde(rename = "timeGaugeData", default)]
        data: TimeGaugeData,
    },
    #[serde(rename = "progress")]
    LifeProgress {
        #[serde(rename = "lifeProgressData", default)]
        data: LifeProgressData,
    },
    #[serde(rename = "motto")]
    Motto {
        #[serde(rename = "mottoData", default)]
        data: MottoData,
    },
    #[serde(rename = "mixmatch")]
    MixMatch {
        #[serde(rename = "mixElements", default)]
        elements: Vec<MixElement>,
    },
}

impl WidgetData {
    pub fn default_for(widget_type: WidgetType) -> Self {
        match widget_type {
            WidgetType::Timetable => WidgetData::Timetable {
                data: TimetableData::default(),
            },
            WidgetType::TimeGauge => WidgetData::TimeGauge {
                data: TimeGaugeData::default(),
            },
            WidgetType::LifeProgress => WidgetData::LifeProgress {
                data: LifeProgressData::default(),
            },
            WidgetType::Motto => WidgetData::Motto {
                data: MottoData::default(),
            },
            WidgetType::MixMatch => WidgetData::MixMatch {
                elements: Vec::new(),
            },
        }
    }

    pub fn widget_type(&self) -> WidgetType {
        match self {
            WidgetData::Timetable { .. } => WidgetType::Timetable,
            WidgetData::TimeGauge { .. } => WidgetType::TimeGauge,
            WidgetData::LifeProgress { .. } => WidgetType::LifeProgress,
            WidgetData::Motto { .. } => WidgetType::Motto,
            WidgetData::MixMatch { .. } => WidgetType::MixMatch,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockElementType {
    Hour,
    Half,
    Important,
    Text,
    Stamp,
}

/// Generic canvas block from the first editor generation. Kept so older
/// documents still load; new widget types leave the list empty.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BlockElementType,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub mode: ProjectMode,
    pub title: String,
    pub bg_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_image: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub widget: WidgetData,
    #[serde(default)]
    pub elements: Vec<BlockElement>,
}

pub const DEFAULT_BG_COLOR: &str = "#FFFDF9";

impl Project {
    pub fn new(id: ProjectId, mode: ProjectMode, widget_type: WidgetType) -> Self {
        let now = Utc::now();
        Project {
            id,
            mode,
            title: widget_type.default_title().to_string(),
            bg_color: DEFAULT_BG_COLOR.to_string(),
            bg_image: None,
            created_at: now,
            updated_at: now,
            widget: WidgetData::default_for(widget_type),
            elements: Vec::new(),
        }
    }

    pub fn widget_type(&self) -> WidgetType {
        self.widget.widget_type()
    }

    pub fn timetable(&self) -> Option<&TimetableData> {
        match &self.widget {
            WidgetData::Timetable { data } => Some(data),
            _ => None,
        }
    }

    pub fn timetable_mut(&mut self) -> Option<&mut TimetableData> {
        match &mut self.widget {
            WidgetData::Timetable { data } => Some(data),
            _ => None,
        }
    }

    pub fn time_gauge(&self) -> Option<&TimeGaugeData> {
        match &self.widget {
            WidgetData::TimeGauge { data } => Some(data),
            _ => None,
        }
    }

    pub fn life_progress(&self) -> Option<&LifeProgressData> {
        match &self.widget {
            WidgetData::LifeProgress { data } => Some(data),
            _ => None,
        }
    }

    pub fn motto(&self) -> Option<&MottoData> {
        match &self.widget {
            WidgetData::Motto { data } => Some(data),
            _ => None,
        }
    }

    pub fn mix_elements(&self) -> Option<&[MixElement]> {
        match &self.widget {
            WidgetData::MixMatch { elements } => Some(elements),
            _ => None,
        }
    }

    pub fn mix_elements_mut(&mut self) -> Option<&mut Vec<MixElement>> {
        match &mut self.widget {
            WidgetData::MixMatch { elements } => Some(elements),
            _ => None,
        }
    }

    pub fn schedule(&self, day: Weekday) -> &[ScheduleItem] {
        self.timetable().map(|t| t.days.get(day)).unwrap_or(&[])
    }
}

/// Shallow partial update of a project. `None` leaves a field untouched.
///
/// A `widget` payload of a different widget type than the project's is
/// ignored: the widget type is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub mode: Option<ProjectMode>,
    pub title: Option<String>,
    pub bg_color: Option<String>,
    pub bg_image: Option<Option<String>>,
    pub widget: Option<WidgetData>,
    pub elements: Option<Vec<BlockElement>>,
}

impl ProjectPatch {
    pub fn title(title: impl Into<String>) -> Self {
        ProjectPatch {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn widget(widget: WidgetData) -> Self {
        ProjectPatch {
            widget: Some(widget),
            ..Default::default()
        }
    }

    pub fn apply(self, project: &mut Project) {
        if let Some(mode) = self.mode {
            project.mode = mode;
        }
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(bg_color) = self.bg_color {
            project.bg_color = bg_color;
        }
        if let Some(bg_image) = self.bg_image {
            project.bg_image = bg_image;
        }
        if let Some(widget) = self.widget {
            if widget.widget_type() == project.widget_type() {
                project.widget = widget;
            } else {
                tracing::warn!(
                    project = %project.id,
                    expected = %project.widget_type(),
                    got = %widget.widget_type(),
                    "ignoring widget payload of another widget type"
                );
            }
        }
        if let Some(elements) = self.elements {
            project.elements = elements;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleItemPatch {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub title: Option<String>,
    pub color: Option<String>,
    pub emoji: Option<Option<String>>,
}

impl ScheduleItemPatch {
    pub fn apply(&self, item: &mut ScheduleItem) {
        if let Some(v) = &self.start_time {
            item.start_time = v.clone();
        }
        if let Some(v) = &self.end_time {
            item.end_time = v.clone();
        }
        if let Some(v) = &self.title {
            item.title = v.clone();
        }
        if let Some(v) = &self.color {
            item.color = v.clone();
        }
        if let Some(v) = &self.emoji {
            item.emoji = v.clone();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MixElementPatch {
    pub kind: Option<MixElementType>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub z_index: Option<i32>,
    pub locked: Option<bool>,
    pub opacity: Option<f32>,
    pub content: Option<String>,
    pub color: Option<Option<String>>,
    pub font_size: Option<Option<f32>>,
    pub font_family: Option<Option<String>>,
    pub uri: Option<Option<String>>,
}

impl MixElementPatch {
    pub fn z_index(z_index: i32) -> Self {
        MixElementPatch {
            z_index: Some(z_index),
            ..Default::default()
        }
    }

    pub fn apply(&self, el: &mut MixElement) {
        if let Some(v) = self.kind {
            el.kind = v;
        }
        if let Some(v) = self.x {
            el.x = v;
        }
        if let Some(v) = self.y {
            el.y = v;
        }
        if let Some(v) = self.width {
            el.width = v;
        }
        if let Some(v) = self.height {
            el.height = v;
        }
        if let Some(v) = self.rotation {
            el.rotation = v;
        }
        if let Some(v) = self.z_index {
            el.z_index = v;
        }
        if let Some(v) = self.locked {
            el.locked = v;
        }
        if let Some(v) = self.opacity {
            el.opacity = v;
        }
        if let Some(v) = &self.content {
            el.content = v.clone();
        }
        if let Some(v) = &self.color {
            el.color = v.clone();
        }
        if let Some(v) = self.font_size {
            el.font_size = v;
        }
        if let Some(v) = &self.font_family {
            el.font_family = v.clone();
        }
        if let Some(v) = &self.uri {
            el.uri = v.clone();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockElementPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub color: Option<String>,
    pub label: Option<Option<String>>,
}

impl BlockElementPatch {
    pub fn apply(&self, el: &mut BlockElement) {
        if let Some(v) = self.x {
            el.x = v;
        }
        if let Some(v) = self.y {
            el.y = v;
        }
        if let Some(v) = self.width {
            el.width = v;
        }
        if let Some(v) = self.height {
            el.height = v;
        }
        if let Some(v) = &self.color {
            el.color = v.clone();
        }
        if let Some(v) = &self.label {
            el.label = v.clone();
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    #[error("project {id} is a {actual} project, expected {expected}")]
    WrongWidgetType {
        id: String,
        expected: WidgetType,
        actual: WidgetType,
    },
    #[error("schedule item not found on {day}: {id}")]
    ScheduleItemNotFound { day: Weekday, id: String },
    #[error("mix element not found: {0}")]
    MixElementNotFound(String),
    #[error("end time must be after start time ({start} - {end})")]
    InvalidScheduleRange { start: String, end: String },
    #[error("unknown device preset: {0}")]
    UnknownDevice(String),
}

impl ProjectError {
    pub fn expect_type(project: &Project, expected: WidgetType) -> Result<(), ProjectError> {
        if project.widget_type() == expected {
            Ok(())
        } else {
            Err(ProjectError::WrongWidgetType {
                id: project.id.clone(),
                expected,
                actual: project.widget_type(),
            })
        }
    }
}

/// `"<epoch-ms>-<5 alphanumerics>"`, unique for practical purposes within
/// one app instance.
pub fn generate_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(5)
        .map(char::from)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_populates_only_its_sub_schema() {
        for widget_type in WidgetType::ALL {
            let project = Project::new(generate_id(), ProjectMode::Widget, widget_type);
            assert_eq!(project.widget_type(), widget_type);
            assert_eq!(project.title, widget_type.default_title());
            assert_eq!(project.timetable().is_some(), widget_type == WidgetType::Timetable);
            assert_eq!(project.time_gauge().is_some(), widget_type == WidgetType::TimeGauge);
            assert_eq!(
                project.life_progress().is_some(),
                widget_type == WidgetType::LifeProgress
            );
            assert_eq!(project.motto().is_some(), widget_type == WidgetType::Motto);
            assert_eq!(project.mix_elements().is_some(), widget_type == WidgetType::MixMatch);
            assert!(project.elements.is_empty());
        }
    }

    #[test]
    fn serializes_with_flat_widget_keys() {
        let project = Project::new("p1".into(), ProjectMode::Wallpaper, WidgetType::TimeGauge);
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["widgetType"], "timegauge");
        assert_eq!(value["timeGaugeData"]["startTime"], "00:00");
        assert_eq!(value["bgColor"], DEFAULT_BG_COLOR);
        assert!(value["createdAt"].is_i64());
        assert!(value.get("timetableData").is_none());

        let back: Project = serde_json::from_value(value).unwrap();
        assert_eq!(back.time_gauge(), project.time_gauge());
    }

    #[test]
    fn missing_sub_schema_falls_back_to_defaults() {
        let value = serde_json::json!({
            "id": "legacy",
            "mode": "wallpaper",
            "title": "Old",
            "bgColor": DEFAULT_BG_COLOR,
            "createdAt": 0,
            "updatedAt": 0,
            "widgetType": "timetable"
        });
        let project: Project = serde_json::from_value(value).unwrap();
        assert_eq!(project.widget_type(), WidgetType::Timetable);
        assert_eq!(project.timetable(), Some(&TimetableData::default()));
        assert!(project.elements.is_empty());
    }

    #[test]
    fn patch_ignores_foreign_widget_payload() {
        let mut project = Project::new("p1".into(), ProjectMode::Widget, WidgetType::Motto);
        let before = project.widget.clone();
        ProjectPatch::widget(WidgetData::default_for(WidgetType::Timetable)).apply(&mut project);
        assert_eq!(project.widget, before);

        ProjectPatch::title("Morning").apply(&mut project);
        assert_eq!(project.title, "Morning");
    }

    #[test]
    fn widget_type_parses_wire_names() {
        assert_eq!("progress".parse::<WidgetType>().unwrap(), WidgetType::LifeProgress);
        assert_eq!("MixMatch".parse::<WidgetType>().unwrap(), WidgetType::MixMatch);
        assert!("clock".parse::<WidgetType>().is_err());
        assert_eq!("widget".parse::<ProjectMode>().unwrap(), ProjectMode::Widget);
    }

    #[test]
    fn generated_ids_differ() {
        assert_ne!(generate_id(), generate_id());
    }
}
