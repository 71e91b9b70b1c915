//! Integration tests for pocket-atelier
//!
//! These tests drive the store the way an editing session does and check
//! what survives a round trip through the project file.

use pocket_atelier::model::{
    MixElementPatch, Project, ProjectMode, ProjectPatch, ScheduleItemPatch, WidgetData, WidgetType,
};
use pocket_atelier::storage::{load_store, save_store};
use pocket_atelier::store::{ProjectStore, MAX_HISTORY};
use pocket_atelier::timecalc::find_overlaps;
use pocket_atelier::widgets::{MixElement, MixElementType, ScheduleItem, Weekday};
use tempfile::TempDir;

fn timetable_session() -> ProjectStore {
    let mut store = ProjectStore::new();
    store.create_project(ProjectMode::Wallpaper, WidgetType::Timetable);
    store
}

fn item(id: &str, start: &str, end: &str, title: &str) -> ScheduleItem {
    ScheduleItem::new(id, start, end, title, "#91D0FF")
}

fn titles(store: &ProjectStore, day: Weekday) -> Vec<String> {
    store
        .current_project()
        .unwrap()
        .schedule(day)
        .iter()
        .map(|i| i.title.clone())
        .collect()
}

#[test]
fn test_math_then_gym_undo_redo() {
    let mut store = timetable_session();

    store.add_schedule_item(Weekday::Mon, item("1", "09:00", "10:00", "Math"));
    store.add_schedule_item(Weekday::Mon, item("2", "09:30", "10:30", "Gym"));
    assert_eq!(titles(&store, Weekday::Mon), vec!["Math", "Gym"]);

    // The overlap is reported but does not block the add
    let existing = store.current_project().unwrap().schedule(Weekday::Mon);
    let overlaps = find_overlaps(existing, "09:30", "10:30", Some("2"));
    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].title, "Math");

    store.undo();
    assert_eq!(titles(&store, Weekday::Mon), vec!["Math"]);
    assert!(store.can_redo());

    store.redo();
    let mon = store.current_project().unwrap().schedule(Weekday::Mon);
    assert_eq!(mon[0].start_time, "09:00");
    assert_eq!(mon[1].start_time, "09:30");
    assert_eq!(titles(&store, Weekday::Mon), vec!["Math", "Gym"]);
}

#[test]
fn test_undo_then_redo_restores_exact_snapshot() {
    let mut store = timetable_session();
    store.add_schedule_item(Weekday::Tue, item("a", "13:00", "14:00", "Lunch"));
    store.update_current_project(ProjectPatch::title("Week plan"));

    let before = store.current_project().cloned();
    store.undo();
    assert_ne!(store.current_project().cloned(), before);
    store.redo();
    assert_eq!(store.current_project().cloned(), before);
}

/// Undoes every recorded step, checking each intermediate state, then redoes
/// them all. `states[0]` is the state before the first edit.
fn assert_replays(store: &mut ProjectStore, states: &[Project]) {
    for expected in states[..states.len() - 1].iter().rev() {
        store.undo();
        assert_eq!(store.current_project(), Some(expected));
    }
    assert!(!store.can_undo());

    for expected in &states[1..] {
        store.redo();
        assert_eq!(store.current_project(), Some(expected));
    }
    assert!(!store.can_redo());
}

fn snapshot(store: &ProjectStore) -> Project {
    store.current_project().cloned().unwrap()
}

#[test]
fn test_undo_redo_replays_every_timetable_state() {
    let mut store = timetable_session();
    let mut states = vec![snapshot(&store)];

    store.add_schedule_item(Weekday::Mon, item("1", "09:00", "10:00", "Math"));
    states.push(snapshot(&store));
    store.add_schedule_item(Weekday::Mon, item("2", "08:00", "08:30", "Run"));
    states.push(snapshot(&store));
    store.update_schedule_item(
        Weekday::Mon,
        "2",
        ScheduleItemPatch {
            start_time: Some("11:00".into()),
            end_time: Some("12:00".into()),
            ..Default::default()
        },
    );
    states.push(snapshot(&store));
    store.update_current_project(ProjectPatch::title("Week plan"));
    states.push(snapshot(&store));
    store.remove_schedule_item(Weekday::Mon, "1");
    states.push(snapshot(&store));

    assert_eq!(store.history_len(), states.len() - 1);
    assert_replays(&mut store, &states);
}

#[test]
fn test_undo_redo_replays_every_mix_state() {
    let mut store = ProjectStore::new();
    store.create_project(ProjectMode::Widget, WidgetType::MixMatch);
    let mut states = vec![snapshot(&store)];

    store.add_mix_element(MixElement::new("s1", MixElementType::Sticker, "⭐"));
    states.push(snapshot(&store));
    store.add_mix_element(MixElement::new("t1", MixElementType::Tape, "washi"));
    states.push(snapshot(&store));
    store.update_mix_element(
        "t1",
        MixElementPatch {
            locked: Some(true),
            ..Default::default()
        },
    );
    states.push(snapshot(&store));
    store.bring_mix_element_to_front("s1");
    states.push(snapshot(&store));
    store.update_current_project(ProjectPatch::title("Collage"));
    states.push(snapshot(&store));

    assert_replays(&mut store, &states);
}

#[test]
fn test_long_session_keeps_bounded_history() {
    let mut store = timetable_session();
    for n in 0..(MAX_HISTORY + 15) {
        store.update_current_project(ProjectPatch::title(format!("t{}", n)));
    }
    assert_eq!(store.history_len(), MAX_HISTORY);

    for _ in 0..MAX_HISTORY {
        store.undo();
    }
    assert!(!store.can_undo());
    assert_eq!(store.current_project().unwrap().title, "t14");
    assert_eq!(store.future_len(), MAX_HISTORY);

    // Extra undos do nothing
    store.undo();
    assert_eq!(store.current_project().unwrap().title, "t14");
}

#[test]
fn test_edit_after_undo_invalidates_redo() {
    let mut store = timetable_session();
    store.add_schedule_item(Weekday::Wed, item("a", "08:00", "09:00", "Run"));
    store.undo();
    assert!(store.can_redo());

    store.update_schedule_item(
        Weekday::Wed,
        "missing",
        ScheduleItemPatch {
            title: Some("ignored".into()),
            ..Default::default()
        },
    );
    assert!(!store.can_redo());
    assert!(store.can_undo());
}

#[test]
fn test_browsing_days_is_not_undoable() {
    let mut store = timetable_session();
    store.add_schedule_item(Weekday::Mon, item("a", "09:00", "10:00", "Math"));
    let depth = store.history_len();

    store.set_selected_day(Weekday::Fri);
    store.set_selected_day(Weekday::Sat);
    assert_eq!(store.history_len(), depth);

    // Undo restores the whole snapshot, including the day selected when it
    // was taken
    store.undo();
    let timetable = store.current_project().unwrap().timetable().unwrap();
    assert_eq!(timetable.selected_day, Weekday::Mon);
    assert!(timetable.days.get(Weekday::Mon).is_empty());
    assert!(!store.can_undo());
}

#[test]
fn test_saving_twice_keeps_one_copy() {
    let mut store = timetable_session();
    store.save_project();
    store.update_current_project(ProjectPatch::title("Renamed"));
    store.save_project();
    store.save_project();

    assert_eq!(store.projects().len(), 1);
    assert_eq!(store.projects()[0].title, "Renamed");
}

#[test]
fn test_project_file_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("projects.json");

    let mut store = ProjectStore::new();
    store.create_project(ProjectMode::Widget, WidgetType::MixMatch);
    store.add_mix_element(MixElement::new("s1", MixElementType::Sticker, "⭐"));
    store.add_mix_element(MixElement::new("t1", MixElementType::Tape, "washi"));
    store.save_project();
    store.update_current_project(ProjectPatch::title("unsaved edit"));
    save_store(&path, &store).unwrap();

    let restored = load_store(&path).unwrap();
    assert_eq!(restored.projects(), store.projects());
    // Session state is not persisted
    assert!(restored.current_project().is_none());
    assert!(!restored.can_undo());
    assert!(!restored.can_redo());

    match &restored.projects()[0].widget {
        WidgetData::MixMatch { elements } => {
            assert_eq!(elements.len(), 2);
            assert_eq!(elements[1].kind, MixElementType::Tape);
        }
        other => panic!("unexpected widget {:?}", other.widget_type()),
    }
}

#[test]
fn test_missing_project_file_loads_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = load_store(&temp_dir.path().join("absent.json")).unwrap();
    assert!(store.projects().is_empty());
}

#[test]
fn test_project_file_uses_flat_widget_keys() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("projects.json");

    let mut store = ProjectStore::new();
    store.create_project(ProjectMode::Widget, WidgetType::TimeGauge);
    store.save_project();
    save_store(&path, &store).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let project = &raw["projects"][0];
    assert_eq!(project["widgetType"], "timegauge");
    assert_eq!(project["timeGaugeData"]["startTime"], "00:00");
    assert!(project.get("timetableData").is_none());
    assert!(project["createdAt"].is_i64());
}

#[test]
fn test_project_without_sub_schema_still_loads() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("projects.json");
    let legacy = r##"{
        "projects": [
            {
                "id": "old",
                "mode": "widget",
                "title": "Legacy",
                "bgColor": "#FFFDF9",
                "createdAt": 0,
                "updatedAt": 0,
                "widgetType": "progress"
            }
        ]
    }"##;
    std::fs::write(&path, legacy).unwrap();

    let store = load_store(&path).unwrap();
    let project = store.find_project("old").unwrap();
    assert_eq!(project.widget_type(), WidgetType::LifeProgress);
    assert_eq!(project.life_progress().unwrap().expected_lifespan, 80);
}
