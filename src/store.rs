//! The in-memory editing state: saved projects, the project being edited,
//! and a linear undo/redo history of whole-project snapshots.
//!
//! Every operation is total. Calling a mutator with no project open (or
//! with a project of a different widget type) does nothing. Content
//! mutations push the pre-mutation snapshot onto the history, clear the redo
//! stack and refresh `updated_at`. View-state changes (selected day,
//! timetable view type) bypass the history.

use crate::model::{
    generate_id, BlockElement, BlockElementPatch, MixElementPatch, Project, ProjectMode,
    ProjectPatch, ScheduleItemPatch, WidgetType,
};
use crate::widgets::{
    back_z_index, max_z_index, sort_by_start, MixElement, ScheduleItem, TimetableData,
    TimetableViewType, Weekday,
};
use chrono::Utc;
use std::collections::VecDeque;

/// Snapshots kept on each of the undo and redo stacks.
pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Default, Clone)]
pub struct ProjectStore {
    projects: Vec<Project>,
    current: Option<Project>,
    history: VecDeque<Project>,
    future: VecDeque<Project>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store hydrated from durable storage. Only saved projects survive a
    /// restart; the open project and both stacks start empty.
    pub fn from_projects(projects: Vec<Project>) -> Self {
        ProjectStore {
            projects,
            ..Self::default()
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn find_project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.current.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Oldest snapshot first.
    pub fn history(&self) -> impl Iterator<Item = &Project> {
        self.history.iter()
    }

    /// Next redo target first.
    pub fn future(&self) -> impl Iterator<Item = &Project> {
        self.future.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Starts a fresh project with default data for `widget_type`.
    ///
    /// Not undoable. The redo stack is left as is: starting over is not an
    /// edit of the previous document, so only edits clear it.
    pub fn create_project(&mut self, mode: ProjectMode, widget_type: WidgetType) {
        let project = Project::new(generate_id(), mode, widget_type);
        tracing::info!(id = %project.id, %widget_type, %mode, "created project");
        self.current = Some(project);
    }

    /// Opens (or with `None`, closes) a project verbatim. History untouched.
    pub fn set_current_project(&mut self, project: Option<Project>) {
        self.current = project;
    }

    /// Generic content mutation: snapshot, clear redo, shallow-merge, touch.
    pub fn update_current_project(&mut self, patch: ProjectPatch) {
        self.commit(|project| patch.apply(project));
    }

    pub fn add_schedule_item(&mut self, day: Weekday, item: ScheduleItem) {
        self.commit_timetable(|timetable| {
            let items = timetable.days.get_mut(day);
            items.push(item);
            sort_by_start(items);
        });
    }

    pub fn remove_schedule_item(&mut self, day: Weekday, item_id: &str) {
        self.commit_timetable(|timetable| {
            timetable.days.get_mut(day).retain(|i| i.id != item_id);
        });
    }

    pub fn update_schedule_item(&mut self, day: Weekday, item_id: &str, patch: ScheduleItemPatch) {
        self.commit_timetable(|timetable| {
            let items = timetable.days.get_mut(day);
            for item in items.iter_mut().filter(|i| i.id == item_id) {
                patch.apply(item);
            }
            sort_by_start(items);
        });
    }

    pub fn set_selected_day(&mut self, day: Weekday) {
        if let Some(timetable) = self.current.as_mut().and_then(Project::timetable_mut) {
            timetable.selected_day = day;
        }
    }

    pub fn set_timetable_view_type(&mut self, view_type: TimetableViewType) {
        if let Some(timetable) = self.current.as_mut().and_then(Project::timetable_mut) {
            timetable.view_type = view_type;
        }
    }

    pub fn add_element(&mut self, element: BlockElement) {
        self.commit(|project| project.elements.push(element));
    }

    pub fn update_element(&mut self, id: &str, patch: BlockElementPatch) {
        self.commit(|project| {
            for el in project.elements.iter_mut().filter(|e| e.id == id) {
                patch.apply(el);
            }
        });
    }

    pub fn remove_element(&mut self, id: &str) {
        self.commit(|project| project.elements.retain(|e| e.id != id));
    }

    pub fn add_mix_element(&mut self, element: MixElement) {
        self.commit_mix(|elements| elements.push(element));
    }

    pub fn update_mix_element(&mut self, id: &str, patch: MixElementPatch) {
        self.commit_mix(|elements| {
            for el in elements.iter_mut().filter(|e| e.id == id) {
                patch.apply(el);
            }
        });
    }

    pub fn remove_mix_element(&mut self, id: &str) {
        self.commit_mix(|elements| elements.retain(|e| e.id != id));
    }

    /// Raises the element above every other one (`max + 1`).
    pub fn bring_mix_element_to_front(&mut self, id: &str) {
        self.commit_mix(|elements| {
            let top = max_z_index(elements) + 1;
            for el in elements.iter_mut().filter(|e| e.id == id) {
                el.z_index = top;
            }
        });
    }

    /// Drops the element below every other one, never below zero.
    pub fn send_mix_element_to_back(&mut self, id: &str) {
        self.commit_mix(|elements| {
            let bottom = back_z_index(elements);
            for el in elements.iter_mut().filter(|e| e.id == id) {
                el.z_index = bottom;
            }
        });
    }

    pub fn undo(&mut self) {
        if self.current.is_none() {
            return;
        }
        let Some(previous) = self.history.pop_back() else {
            return;
        };
        if let Some(current) = self.current.replace(previous) {
            self.future.push_front(current);
            self.future.truncate(MAX_HISTORY);
        }
        tracing::debug!(
            history = self.history.len(),
            future = self.future.len(),
            "undo"
        );
    }

    pub fn redo(&mut self) {
        if self.current.is_none() {
            return;
        }
        let Some(next) = self.future.pop_front() else {
            return;
        };
        if let Some(current) = self.current.replace(next) {
            push_bounded(&mut self.history, current);
        }
        tracing::debug!(
            history = self.history.len(),
            future = self.future.len(),
            "redo"
        );
    }

    /// Upserts the open project into the saved collection by id.
    pub fn save_project(&mut self) {
        let Some(current) = self.current.as_ref() else {
            return;
        };
        match self.projects.iter_mut().find(|p| p.id == current.id) {
            Some(existing) => *existing = current.clone(),
            None => self.projects.push(current.clone()),
        }
        tracing::info!(id = %current.id, "saved project");
    }

    pub fn delete_project(&mut self, id: &str) {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        if self.projects.len() != before {
            tracing::info!(id, "deleted project");
        }
    }

    fn commit<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Project),
    {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        push_bounded(&mut self.history, current.clone());
        self.future.clear();
        f(current);
        current.updated_at = Utc::now();
        tracing::debug!(
            id = %current.id,
            history = self.history.len(),
            "content mutation"
        );
    }

    fn commit_timetable<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TimetableData),
    {
        if self.current.as_ref().and_then(Project::timetable).is_none() {
            return;
        }
        self.commit(|project| {
            if let Some(timetable) = project.timetable_mut() {
                f(timetable);
            }
        });
    }

    fn commit_mix<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Vec<MixElement>),
    {
        if self.current.as_ref().and_then(Project::mix_elements).is_none() {
            return;
        }
        self.commit(|project| {
            if let Some(elements) = project.mix_elements_mut() {
                f(elements);
            }
        });
    }
}

fn push_bounded(stack: &mut VecDeque<Project>, snapshot: Project) {
    stack.push_back(snapshot);
    while stack.len() > MAX_HISTORY {
        stack.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{MixElementType, TimetableViewType};

    fn timetable_store() -> ProjectStore {
        let mut store = ProjectStore::new();
        store.create_project(ProjectMode::Widget, WidgetType::Timetable);
        store
    }

    fn item(id: &str, start: &str, end: &str) -> ScheduleItem {
        ScheduleItem::new(id, start, end, id, "#91D0FF")
    }

    #[test]
    fn mutators_without_project_are_noops() {
        let mut store = ProjectStore::new();
        store.update_current_project(ProjectPatch::title("x"));
        store.add_schedule_item(Weekday::Mon, item("a", "09:00", "10:00"));
        store.add_mix_element(MixElement::new("m", MixElementType::Sticker, "⭐"));
        store.undo();
        store.redo();
        store.save_project();
        assert!(store.current_project().is_none());
        assert!(!store.can_undo());
        assert!(!store.can_redo());
        assert!(store.projects().is_empty());
    }

    #[test]
    fn create_project_is_not_undoable() {
        let store = timetable_store();
        assert!(store.current_project().is_some());
        assert!(!store.can_undo());
        assert!(store.projects().is_empty());
    }

    #[test]
    fn create_project_keeps_redo_stack() {
        let mut store = timetable_store();
        store.update_current_project(ProjectPatch::title("one"));
        store.undo();
        assert!(store.can_redo());
        store.create_project(ProjectMode::Widget, WidgetType::Motto);
        assert!(store.can_redo());
    }

    #[test]
    fn update_pushes_snapshot_and_touches() {
        let mut store = timetable_store();
        let before = store.current_project().unwrap().clone();
        store.update_current_project(ProjectPatch::title("Week plan"));
        let after = store.current_project().unwrap();
        assert_eq!(after.title, "Week plan");
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(store.history().last(), Some(&before));
    }

    #[test]
    fn history_is_bounded_to_most_recent() {
        let mut store = timetable_store();
        for n in 0..60 {
            store.update_current_project(ProjectPatch::title(format!("t{}", n)));
        }
        assert_eq!(store.history_len(), MAX_HISTORY);
        let titles: Vec<_> = store.history().map(|p| p.title.clone()).collect();
        assert_eq!(titles.first().map(String::as_str), Some("t9"));
        assert_eq!(titles.last().map(String::as_str), Some("t58"));
    }

    #[test]
    fn new_edit_after_undo_drops_redo() {
        let mut store = timetable_store();
        store.update_current_project(ProjectPatch::title("a"));
        store.update_current_project(ProjectPatch::title("b"));
        store.undo();
        assert!(store.can_redo());
        store.update_current_project(ProjectPatch::title("c"));
        assert!(!store.can_redo());
        store.redo();
        assert_eq!(store.current_project().unwrap().title, "c");
    }

    #[test]
    fn view_state_changes_skip_history() {
        let mut store = timetable_store();
        store.set_selected_day(Weekday::Fri);
        store.set_timetable_view_type(TimetableViewType::Circle);
        store.set_selected_day(Weekday::Tue);
        assert!(!store.can_undo());
        let timetable = store.current_project().unwrap().timetable().unwrap();
        assert_eq!(timetable.selected_day, Weekday::Tue);
        assert_eq!(timetable.view_type, TimetableViewType::Circle);
    }

    #[test]
    fn schedule_items_stay_sorted() {
        let mut store = timetable_store();
        store.add_schedule_item(Weekday::Mon, item("late", "14:00", "15:00"));
        store.add_schedule_item(Weekday::Mon, item("early", "08:00", "09:00"));
        store.add_schedule_item(Weekday::Mon, item("mid", "11:00", "12:00"));
        store.update_schedule_item(
            Weekday::Mon,
            "early",
            ScheduleItemPatch {
                start_time: Some("16:00".into()),
                end_time: Some("17:00".into()),
                ..Default::default()
            },
        );
        let ids: Vec<_> = store
            .current_project()
            .unwrap()
            .schedule(Weekday::Mon)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, ["mid", "late", "early"]);
        assert_eq!(store.history_len(), 4);
    }

    #[test]
    fn remove_schedule_item_is_undoable() {
        let mut store = timetable_store();
        store.add_schedule_item(Weekday::Wed, item("a", "09:00", "10:00"));
        store.remove_schedule_item(Weekday::Wed, "a");
        assert!(store.current_project().unwrap().schedule(Weekday::Wed).is_empty());
        store.undo();
        assert_eq!(store.current_project().unwrap().schedule(Weekday::Wed).len(), 1);
    }

    #[test]
    fn timetable_mutators_ignore_other_widgets() {
        let mut store = ProjectStore::new();
        store.create_project(ProjectMode::Widget, WidgetType::TimeGauge);
        store.add_schedule_item(Weekday::Mon, item("a", "09:00", "10:00"));
        store.set_selected_day(Weekday::Sun);
        store.add_mix_element(MixElement::new("m", MixElementType::Stamp, "✅"));
        assert!(!store.can_undo());
    }

    #[test]
    fn mix_z_order() {
        let mut store = ProjectStore::new();
        store.create_project(ProjectMode::Wallpaper, WidgetType::MixMatch);
        let mut a = MixElement::new("a", MixElementType::Sticker, "⭐");
        a.z_index = 1;
        let mut b = MixElement::new("b", MixElementType::Text, "hello");
        b.z_index = 2;
        store.add_mix_element(a);
        store.add_mix_element(b);
        store.bring_mix_element_to_front("a");
        let z = |store: &ProjectStore, id: &str| {
            store
                .current_project()
                .unwrap()
                .mix_elements()
                .unwrap()
                .iter()
                .find(|e| e.id == id)
                .unwrap()
                .z_index
        };
        assert_eq!(z(&store, "a"), 3);
        store.send_mix_element_to_back("a");
        assert_eq!(z(&store, "a"), 0);
        store.update_mix_element("b", MixElementPatch::z_index(7));
        assert_eq!(z(&store, "b"), 7);
        store.remove_mix_element("b");
        assert_eq!(store.current_project().unwrap().mix_elements().unwrap().len(), 1);
    }

    #[test]
    fn save_is_an_upsert() {
        let mut store = timetable_store();
        store.save_project();
        store.save_project();
        assert_eq!(store.projects().len(), 1);
        store.update_current_project(ProjectPatch::title("renamed"));
        store.save_project();
        assert_eq!(store.projects().len(), 1);
        assert_eq!(store.projects()[0].title, "renamed");

        let id = store.projects()[0].id.clone();
        store.delete_project("missing");
        assert_eq!(store.projects().len(), 1);
        store.delete_project(&id);
        assert!(store.projects().is_empty());
    }

    #[test]
    fn set_current_project_leaves_history() {
        let mut store = timetable_store();
        store.update_current_project(ProjectPatch::title("x"));
        let other = Project::new("other".into(), ProjectMode::Widget, WidgetType::Motto);
        store.set_current_project(Some(other));
        assert_eq!(store.history_len(), 1);
        store.set_current_project(None);
        store.undo();
        assert!(store.current_project().is_none());
        assert_eq!(store.history_len(), 1);
    }
}
