//! Read-only projections of [`AppState`] that both front ends draw from.

use chrono::NaiveDate;
use serde::Serialize;

use crate::app::{AppState, Screen};
use crate::model::{ListId, Task, TodoList};
use crate::session::{AuthMode, SessionState};
use crate::settings::Settings;

pub const APP_TITLE: &str = "Welcome to Todo Calendar";
pub const APP_TAGLINE: &str = "Organize your tasks and manage your time efficiently";
pub const DEMO_HINT: &str = "Demo Access - Use any email and password";
pub const EMPTY_STATE_TITLE: &str = "No tasks yet";
pub const EMPTY_STATE_HINT: &str = "Add a task above to get started!";

/// One row of the list sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry<'a> {
  pub list: &'a TodoList,
  pub count: usize,
  pub selected: bool,
}

impl SidebarEntry<'_> {
  /// The count badge is hidden for lists with nothing open.
  pub fn badge(&self) -> Option<usize> {
    (self.count > 0).then_some(self.count)
  }
}

pub fn sidebar(state: &AppState) -> Vec<SidebarEntry<'_>> {
  let store = state.store();
  store
    .lists()
    .iter()
    .map(|list| SidebarEntry {
      list,
      count: store.count_for(&list.id),
      selected: &list.id == store.selected(),
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow<'a> {
  pub task: &'a Task,
  /// Draft text when this task is under edit.
  pub draft: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelBody<'a> {
  Empty,
  Tasks(Vec<TaskRow<'a>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel<'a> {
  pub list: Option<&'a TodoList>,
  pub date_label: String,
  pub body: PanelBody<'a>,
}

/// The main panel for the selected list as of `today`.
pub fn panel(state: &AppState, today: NaiveDate) -> Panel<'_> {
  let store = state.store();
  let editing = store.editing();

  let rows: Vec<TaskRow<'_>> = store
    .visible_tasks()
    .map(|task| TaskRow {
      task,
      draft: editing
        .filter(|draft| draft.task_id == task.id)
        .map(|draft| draft.buffer.as_str()),
    })
    .collect();

  Panel {
    list: store.current_list(),
    date_label: date_label(today),
    body: if rows.is_empty() {
      PanelBody::Empty
    } else {
      PanelBody::Tasks(rows)
    },
  }
}

/// "Wednesday, October 15"
pub fn date_label(date: NaiveDate) -> String {
  date.format("%A, %B %-d").to_string()
}

/// "Due: 6/5/2025"
pub fn due_label(due: NaiveDate) -> String {
  format!("Due: {}", due.format("%-m/%-d/%Y"))
}

#[derive(Debug, Clone, Serialize)]
pub struct ListSnapshot {
  pub id: ListId,
  pub name: String,
  pub icon: String,
  pub gradient: String,
  pub count: usize,
}

/// Serializable picture of the whole session.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
  pub session: SessionState,
  pub auth_mode: AuthMode,
  pub selected: ListId,
  pub editing: Option<u64>,
  pub settings: Settings,
  pub lists: Vec<ListSnapshot>,
  pub tasks: Vec<Task>,
}

impl Snapshot {
  pub fn capture(state: &AppState) -> Self {
    let store = state.store();
    Self {
      session: state.session().state(),
      auth_mode: state.session().mode(),
      selected: store.selected().clone(),
      editing: store.editing().map(|draft| draft.task_id.get()),
      settings: *state.settings(),
      lists: sidebar(state)
        .into_iter()
        .map(|entry| ListSnapshot {
          id: entry.list.id.clone(),
          name: entry.list.name.clone(),
          icon: entry.list.icon.clone(),
          gradient: entry.list.gradient.clone(),
          count: entry.count,
        })
        .collect(),
      tasks: store.tasks().to_vec(),
    }
  }

  pub fn screen(&self) -> Screen {
    match self.session {
      SessionState::SignedIn => Screen::Tasks,
      SessionState::SignedOut => Screen::SignIn,
    }
  }
}
