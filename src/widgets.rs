use crate::timecalc::parse_clock_minutes;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_LIFESPAN_YEARS: u32 = 50;
pub const MAX_LIFESPAN_YEARS: u32 = 120;
pub const MIN_MOTTO_FONT_SIZE: f32 = 12.0;
pub const MAX_MOTTO_FONT_SIZE: f32 = 64.0;
pub const MAX_MOTTO_ROTATION: f32 = 45.0;
/// Smallest edge a mix element can be pinched down to, in canvas pixels.
pub const MIN_MIX_ELEMENT_EDGE: f32 = 20.0;
/// Editing canvas in points; the aspect matches a 393x852 phone screen.
pub const CANVAS_WIDTH: f32 = 345.0;
pub const CANVAS_HEIGHT: f32 = CANVAS_WIDTH * (852.0 / 393.0);
const PLACEMENT_SPREAD: f32 = 80.0;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
            Weekday::Sun => "sun",
        }
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Sat | Weekday::Sun)
    }

    pub fn next(self) -> Weekday {
        let idx = Weekday::ALL.iter().position(|d| *d == self).unwrap_or(0);
        Weekday::ALL[(idx + 1) % Weekday::ALL.len()]
    }

    pub fn prev(self) -> Weekday {
        let idx = Weekday::ALL.iter().position(|d| *d == self).unwrap_or(0);
        Weekday::ALL[(idx + Weekday::ALL.len() - 1) % Weekday::ALL.len()]
    }

    /// Days shown by the timetable, honoring the weekend toggle.
    pub fn visible(show_weekend: bool) -> Vec<Weekday> {
        Weekday::ALL
            .into_iter()
            .filter(|d| show_weekend || !d.is_weekend())
            .collect()
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|d| d.key() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown weekday: {}", s))
    }
}

// ---------------------------------------------------------------- timetable

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub id: String,
    pub start_time: String,
    pub end_time: String,
    pub title: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl ScheduleItem {
    pub fn new(
        id: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        title: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        ScheduleItem {
            id: id.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            title: title.into(),
            color: color.into(),
            emoji: None,
        }
    }

    /// Editor-side check: both ends parse and the end is strictly after the start.
    /// The store accepts items regardless.
    pub fn validate(&self) -> Result<(), crate::model::ProjectError> {
        let start = parse_clock_minutes(&self.start_time);
        let end = parse_clock_minutes(&self.end_time);
        match (start, end) {
            (Some(s), Some(e)) if e > s => Ok(()),
            _ => Err(crate::model::ProjectError::InvalidScheduleRange {
                start: self.start_time.clone(),
                end: self.end_time.clone(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimetableViewType {
    Block,
    Circle,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimetableLayoutMode {
    Daily,
    Weekly,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ClockMode {
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl ClockMode {
    /// Minutes covered by one full turn of the dial.
    pub fn dial_minutes(self) -> i32 {
        match self {
            ClockMode::TwelveHour => 720,
            ClockMode::TwentyFourHour => 1440,
        }
    }

    pub fn toggled(self) -> ClockMode {
        match self {
            ClockMode::TwelveHour => ClockMode::TwentyFourHour,
            ClockMode::TwentyFourHour => ClockMode::TwelveHour,
        }
    }
}

/// One ordered item list per weekday. All seven keys always exist.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct WeekSchedule {
    #[serde(default)]
    pub mon: Vec<ScheduleItem>,
    #[serde(default)]
    pub tue: Vec<ScheduleItem>,
    #[serde(default)]
    pub wed: Vec<ScheduleItem>,
    #[serde(default)]
    pub thu: Vec<ScheduleItem>,
    #[serde(default)]
    pub fri: Vec<ScheduleItem>,
    #[serde(default)]
    pub sat: Vec<ScheduleItem>,
    #[serde(default)]
    pub sun: Vec<ScheduleItem>,
}

impl WeekSchedule {
    pub fn get(&self, day: Weekday) -> &[ScheduleItem] {
        match day {
            Weekday::Mon => &self.mon,
            Weekday::Tue => &self.tue,
            Weekday::Wed => &self.wed,
            Weekday::Thu => &self.thu,
            Weekday::Fri => &self.fri,
            Weekday::Sat => &self.sat,
            Weekday::Sun => &self.sun,
        }
    }

    pub fn get_mut(&mut self, day: Weekday) -> &mut Vec<ScheduleItem> {
        match day {
            Weekday::Mon => &mut self.mon,
            Weekday::Tue => &mut self.tue,
            Weekday::Wed => &mut self.wed,
            Weekday::Thu => &mut self.thu,
            Weekday::Fri => &mut self.fri,
            Weekday::Sat => &mut self.sat,
            Weekday::Sun => &mut self.sun,
        }
    }

    pub fn total_items(&self) -> usize {
        Weekday::ALL.iter().map(|d| self.get(*d).len()).sum()
    }
}

/// Stable sort by the raw "HH:MM" start string, which orders correctly for
/// zero-padded 24-hour values.
pub fn sort_by_start(items: &mut [ScheduleItem]) {
    items.sort_by(|a, b| a.start_time.cmp(&b.start_time));
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimetableData {
    pub view_type: TimetableViewType,
    pub layout_mode: TimetableLayoutMode,
    pub clock_mode: ClockMode,
    pub show_weekend: bool,
    pub selected_day: Weekday,
    pub days: WeekSchedule,
}

impl Default for TimetableData {
    fn default() -> Self {
        TimetableData {
            view_type: TimetableViewType::Block,
            layout_mode: TimetableLayoutMode::Daily,
            clock_mode: ClockMode::TwelveHour,
            show_weekend: true,
            selected_day: Weekday::Mon,
            days: WeekSchedule::default(),
        }
    }
}

// ---------------------------------------------------------------- time gauge

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GaugeStyle {
    Horizontal,
    Vertical,
    Circular,
    Water,
    Battery,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    Percent,
    Remaining,
    Elapsed,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeGaugeData {
    pub gauge_style: GaugeStyle,
    pub start_time: String,
    pub end_time: String,
    pub display_format: DisplayFormat,
    pub label: String,
    pub fill_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
}

impl Default for TimeGaugeData {
    fn default() -> Self {
        TimeGaugeData {
            gauge_style: GaugeStyle::Horizontal,
            start_time: "00:00".into(),
            end_time: "24:00".into(),
            display_format: DisplayFormat::Percent,
            label: "Today".into(),
            fill_color: "#FFDE59".into(),
            bg_color: None,
            text_color: None,
            character: None,
        }
    }
}

// ---------------------------------------------------------------- life progress

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    Year,
    Month,
    Week,
    Day,
}

impl DisplayUnit {
    pub fn days_per_unit(self) -> f64 {
        match self {
            DisplayUnit::Year => 365.25,
            DisplayUnit::Month => 30.4375,
            DisplayUnit::Week => 7.0,
            DisplayUnit::Day => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayUnit::Year => "years",
            DisplayUnit::Month => "months",
            DisplayUnit::Week => "weeks",
            DisplayUnit::Day => "days",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LifeDesignType {
    Bar,
    Dots,
    Tree,
    Book,
    Moon,
    Pixel,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LifeProgressData {
    pub birth_date: String,
    pub expected_lifespan: u32,
    pub display_unit: DisplayUnit,
    pub design_type: LifeDesignType,
    pub show_details: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motto: Option<String>,
    pub filled_color: String,
    pub remaining_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl Default for LifeProgressData {
    fn default() -> Self {
        LifeProgressData {
            birth_date: "2000-01-01".into(),
            expected_lifespan: 80,
            display_unit: DisplayUnit::Year,
            design_type: LifeDesignType::Bar,
            show_details: true,
            motto: None,
            filled_color: "#FFDE59".into(),
            remaining_color: "#F3F4F6".into(),
            text_color: None,
        }
    }
}

pub fn clamp_lifespan(years: u32) -> u32 {
    years.clamp(MIN_LIFESPAN_YEARS, MAX_LIFESPAN_YEARS)
}

// ---------------------------------------------------------------- motto

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MottoTemplate {
    Center,
    Bubble,
    Postit,
    Typewriter,
    Notebook,
    Stamp,
    Neon,
    Collage,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Underline,
    Highlight,
    Circle,
}

/// Position relative to the canvas, both axes in `0.0..=1.0`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct NormalizedPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MottoText {
    pub id: String,
    pub content: String,
    pub font_size: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    pub color: String,
    pub align: TextAlign,
    pub rotation: f32,
    pub position: NormalizedPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<Emphasis>,
}

impl MottoText {
    /// Pulls font size, rotation and position back into their editable ranges.
    pub fn clamped(mut self) -> Self {
        self.font_size = self
            .font_size
            .clamp(MIN_MOTTO_FONT_SIZE, MAX_MOTTO_FONT_SIZE);
        self.rotation = self.rotation.clamp(-MAX_MOTTO_ROTATION, MAX_MOTTO_ROTATION);
        self.position.x = self.position.x.clamp(0.0, 1.0);
        self.position.y = self.position.y.clamp(0.0, 1.0);
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MottoData {
    pub template: MottoTemplate,
    pub texts: Vec<MottoText>,
}

impl MottoData {
    pub fn primary(&self) -> Option<&MottoText> {
        self.texts.first()
    }
}

impl Default for MottoData {
    fn default() -> Self {
        MottoData {
            template: MottoTemplate::Center,
            texts: vec![MottoText {
                id: "1".into(),
                content: "You've got this today!".into(),
                font_size: 32.0,
                font_family: None,
                color: "#1A1A1A".into(),
                align: TextAlign::Center,
                rotation: 0.0,
                position: NormalizedPoint { x: 0.5, y: 0.5 },
                emphasis: None,
            }],
        }
    }
}

// ---------------------------------------------------------------- mix & match

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MixElementType {
    Photo,
    Stamp,
    Sticker,
    Text,
    Shape,
    Tape,
    Frame,
}

impl MixElementType {
    /// Size a freshly placed element starts with.
    pub fn default_size(self) -> (f32, f32) {
        match self {
            MixElementType::Sticker | MixElementType::Stamp => (60.0, 60.0),
            MixElementType::Text => (140.0, 50.0),
            MixElementType::Shape => (56.0, 56.0),
            MixElementType::Tape => (160.0, 28.0),
            MixElementType::Photo | MixElementType::Frame => (120.0, 120.0),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MixElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MixElementType,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub z_index: i32,
    pub locked: bool,
    pub opacity: f32,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl MixElement {
    pub fn new(id: impl Into<String>, kind: MixElementType, content: impl Into<String>) -> Self {
        let (width, height) = kind.default_size();
        MixElement {
            id: id.into(),
            kind,
            x: 0.0,
            y: 0.0,
            width,
            height,
            rotation: 0.0,
            z_index: 0,
            locked: false,
            opacity: if kind == MixElementType::Tape { 0.7 } else { 1.0 },
            content: content.into(),
            color: None,
            font_size: None,
            font_family: None,
            uri: None,
        }
    }

    /// Size after a pinch of `factor`, never below the minimum edge.
    pub fn scaled_size(&self, factor: f32) -> (f32, f32) {
        (
            (self.width * factor).round().max(MIN_MIX_ELEMENT_EDGE),
            (self.height * factor).round().max(MIN_MIX_ELEMENT_EDGE),
        )
    }
}

/// Top-left corner that centers a `width` x `height` element on the canvas,
/// nudged by `jitter` (each axis in `-0.5..=0.5` of the placement spread).
pub fn centered_position(width: f32, height: f32, jitter: (f32, f32)) -> (f32, f32) {
    (
        CANVAS_WIDTH / 2.0 - width / 2.0 + jitter.0 * PLACEMENT_SPREAD,
        CANVAS_HEIGHT / 2.0 - height / 2.0 + jitter.1 * PLACEMENT_SPREAD,
    )
}

/// zIndex handed to a freshly added element.
pub fn next_z_index(elements: &[MixElement]) -> i32 {
    elements.len() as i32 + 1
}

pub fn max_z_index(elements: &[MixElement]) -> i32 {
    elements.iter().map(|e| e.z_index).max().unwrap_or(0).max(0)
}

pub fn back_z_index(elements: &[MixElement]) -> i32 {
    let min = elements.iter().map(|e| e.z_index).min().unwrap_or(1).min(1);
    (min - 1).max(0)
}

pub fn clamp_opacity(opacity: f32) -> f32 {
    opacity.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timetable_has_every_day_empty() {
        let data = TimetableData::default();
        for day in Weekday::ALL {
            assert!(data.days.get(day).is_empty());
        }
        assert_eq!(data.selected_day, Weekday::Mon);
        assert_eq!(data.clock_mode, ClockMode::TwelveHour);
        assert!(data.show_weekend);
    }

    #[test]
    fn visible_days_drop_weekend() {
        assert_eq!(Weekday::visible(true).len(), 7);
        let weekdays = Weekday::visible(false);
        assert_eq!(weekdays.len(), 5);
        assert!(!weekdays.contains(&Weekday::Sat));
    }

    #[test]
    fn weekday_cycles_both_ways() {
        assert_eq!(Weekday::Sun.next(), Weekday::Mon);
        assert_eq!(Weekday::Mon.prev(), Weekday::Sun);
        assert_eq!("Wed".parse::<Weekday>().unwrap(), Weekday::Wed);
        assert!("someday".parse::<Weekday>().is_err());
    }

    #[test]
    fn schedule_item_validation_requires_forward_range() {
        let ok = ScheduleItem::new("a", "09:00", "10:00", "Math", "#91D0FF");
        assert!(ok.validate().is_ok());
        let flat = ScheduleItem::new("b", "09:00", "09:00", "Math", "#91D0FF");
        assert!(flat.validate().is_err());
        let garbage = ScheduleItem::new("c", "9am", "10:00", "Math", "#91D0FF");
        assert!(garbage.validate().is_err());
    }

    #[test]
    fn motto_text_clamps_editable_ranges() {
        let mut text = MottoData::default().texts.remove(0);
        text.font_size = 200.0;
        text.rotation = -90.0;
        text.position = NormalizedPoint { x: 1.4, y: -0.2 };
        let text = text.clamped();
        assert_eq!(text.font_size, MAX_MOTTO_FONT_SIZE);
        assert_eq!(text.rotation, -MAX_MOTTO_ROTATION);
        assert_eq!(text.position, NormalizedPoint { x: 1.0, y: 0.0 });
    }

    #[test]
    fn lifespan_clamped_to_supported_range() {
        assert_eq!(clamp_lifespan(10), 50);
        assert_eq!(clamp_lifespan(85), 85);
        assert_eq!(clamp_lifespan(300), 120);
    }

    #[test]
    fn z_order_helpers() {
        let mut a = MixElement::new("a", MixElementType::Sticker, "⭐");
        a.z_index = 3;
        let mut b = MixElement::new("b", MixElementType::Text, "hi");
        b.z_index = 1;
        let elements = vec![a, b];
        assert_eq!(next_z_index(&elements), 3);
        assert_eq!(max_z_index(&elements), 3);
        assert_eq!(back_z_index(&elements), 0);
        assert_eq!(max_z_index(&[]), 0);
    }

    #[test]
    fn scaling_respects_minimum_edge() {
        let el = MixElement::new("a", MixElementType::Sticker, "⭐");
        assert_eq!(el.scaled_size(0.1), (MIN_MIX_ELEMENT_EDGE, MIN_MIX_ELEMENT_EDGE));
        assert_eq!(el.scaled_size(1.5), (90.0, 90.0));
    }

    #[test]
    fn placement_centers_element() {
        let (x, y) = centered_position(60.0, 60.0, (0.0, 0.0));
        assert_eq!(x, CANVAS_WIDTH / 2.0 - 30.0);
        assert_eq!(y, CANVAS_HEIGHT / 2.0 - 30.0);
        let (jx, _) = centered_position(60.0, 60.0, (0.5, 0.0));
        assert_eq!(jx, x + 40.0);
        assert_eq!(MixElement::new("t", MixElementType::Tape, "tape").opacity, 0.7);
    }
}
