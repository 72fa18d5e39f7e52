use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use crate::error::Rejection;
use crate::model::{ListId, TaskId};
use crate::session::{AuthMode, SessionGate};
use crate::settings::{SettingChange, Settings};
use crate::store::TaskStore;

/// Most toasts kept queued at once; older ones are dropped first.
pub const NOTIFICATION_LIMIT: usize = 5;

pub const MSG_TASK_ADDED: &str = "Task added successfully!";
pub const MSG_TASK_UPDATED: &str = "Task updated successfully!";
pub const MSG_TASK_DELETED: &str = "Task deleted successfully!";
pub const MSG_LIST_CREATED: &str = "New list created successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  SignIn,
  Tasks,
}

/// Text typed into the forms but not yet submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drafts {
  pub email: String,
  pub password: String,
  pub new_task: String,
  pub new_list: String,
}

/// A transient confirmation shown after a successful change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
  pub seq: u64,
  pub message: String,
}

/// Every input event the front ends can raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  SetEmailDraft(String),
  SetPasswordDraft(String),
  SubmitCredentials { email: String, password: String },
  ToggleAuthMode,
  SignOut,
  SelectList(ListId),
  SetNewListDraft(String),
  CreateList(String),
  SetNewTaskDraft(String),
  AddTask(String),
  ToggleCompleted(TaskId),
  ToggleImportant(TaskId),
  BeginEdit(TaskId),
  SetEditDraft(String),
  CommitEdit { id: TaskId, text: String },
  DeleteTask(TaskId),
  SetDueDate { id: TaskId, due: Option<NaiveDate> },
  SetNotes { id: TaskId, notes: Option<String> },
  ChangeSetting(SettingChange),
  DismissNotification(u64),
}

impl Action {
  /// Whether the action needs the task view, as opposed to the gate.
  fn needs_session(&self) -> bool {
    !matches!(
      self,
      Self::SetEmailDraft(_)
        | Self::SetPasswordDraft(_)
        | Self::SubmitCredentials { .. }
        | Self::ToggleAuthMode
        | Self::SetNewListDraft(_)
        | Self::SetNewTaskDraft(_)
        | Self::DismissNotification(_)
    )
  }
}

/// What an accepted action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
  DraftUpdated,
  SignedIn,
  SignedOut,
  AuthModeToggled(AuthMode),
  ListSelected(ListId),
  ListCreated(ListId),
  TaskAdded(TaskId),
  CompletedToggled { id: TaskId, completed: bool },
  ImportantToggled { id: TaskId, important: bool },
  EditStarted(TaskId),
  TaskUpdated(TaskId),
  TaskDeleted(TaskId),
  SettingChanged(SettingChange),
  NotificationDismissed(u64),
}

/// The whole session: gate, store, settings, form drafts and pending
/// notifications.
///
/// [`AppState::apply`] is the only way to change it, one action at a time.
/// A rejected action leaves every field untouched. Signing out keeps the
/// store as it is, so signing back in shows the same lists and tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
  session: SessionGate,
  store: TaskStore,
  settings: Settings,
  drafts: Drafts,
  notifications: Vec<Notification>,
  next_seq: u64,
}

impl Default for AppState {
  fn default() -> Self {
    Self::new(TaskStore::with_demo_data(), Settings::default())
  }
}

impl AppState {
  pub fn new(store: TaskStore, settings: Settings) -> Self {
    Self {
      session: SessionGate::default(),
      store,
      settings,
      drafts: Drafts::default(),
      notifications: vec![],
      next_seq: 0,
    }
  }

  pub fn screen(&self) -> Screen {
    if self.session.is_signed_in() {
      Screen::Tasks
    } else {
      Screen::SignIn
    }
  }

  pub fn session(&self) -> &SessionGate {
    &self.session
  }

  pub fn store(&self) -> &TaskStore {
    &self.store
  }

  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  pub fn drafts(&self) -> &Drafts {
    &self.drafts
  }

  pub fn notifications(&self) -> &[Notification] {
    &self.notifications
  }

  /// Hands pending notifications to a front end that shows them once.
  pub fn take_notifications(&mut self) -> Vec<Notification> {
    std::mem::take(&mut self.notifications)
  }

  #[instrument(skip_all, level = "debug")]
  pub fn apply(&mut self, action: Action) -> Result<Change, Rejection> {
    if action.needs_session() && !self.session.is_signed_in() {
      debug!("action needs a signed-in session");
      return Err(Rejection::NotSignedIn);
    }

    let result = self.apply_inner(action);
    match &result {
      Ok(change) => debug!(?change, "action applied"),
      Err(rejection) => debug!(%rejection, "action rejected"),
    }
    result
  }

  fn apply_inner(&mut self, action: Action) -> Result<Change, Rejection> {
    match action {
      Action::SetEmailDraft(text) => {
        self.drafts.email = text;
        Ok(Change::DraftUpdated)
      }
      Action::SetPasswordDraft(text) => {
        self.drafts.password = text;
        Ok(Change::DraftUpdated)
      }
      Action::SubmitCredentials { email, password } => {
        self.session.submit_credentials(&email, &password)?;
        self.drafts.email.clear();
        self.drafts.password.clear();
        Ok(Change::SignedIn)
      }
      Action::ToggleAuthMode => self.session.toggle_mode().map(Change::AuthModeToggled),
      Action::SignOut => {
        self.session.sign_out()?;
        Ok(Change::SignedOut)
      }
      Action::SelectList(id) => {
        self.store.select_list(&id)?;
        Ok(Change::ListSelected(id))
      }
      Action::SetNewListDraft(text) => {
        self.drafts.new_list = text;
        Ok(Change::DraftUpdated)
      }
      Action::CreateList(name) => {
        let id = self.store.create_list(&name)?;
        self.drafts.new_list.clear();
        self.notify(MSG_LIST_CREATED);
        Ok(Change::ListCreated(id))
      }
      Action::SetNewTaskDraft(text) => {
        self.drafts.new_task = text;
        Ok(Change::DraftUpdated)
      }
      Action::AddTask(text) => {
        let id = self.store.add_task(&text)?;
        self.drafts.new_task.clear();
        self.notify(MSG_TASK_ADDED);
        Ok(Change::TaskAdded(id))
      }
      Action::ToggleCompleted(id) => {
        let completed = self.store.toggle_completed(id)?;
        Ok(Change::CompletedToggled { id, completed })
      }
      Action::ToggleImportant(id) => {
        let important = self.store.toggle_important(id)?;
        Ok(Change::ImportantToggled { id, important })
      }
      Action::BeginEdit(id) => {
        self.store.begin_edit(id)?;
        Ok(Change::EditStarted(id))
      }
      Action::SetEditDraft(text) => {
        self.store.set_edit_buffer(text)?;
        Ok(Change::DraftUpdated)
      }
      Action::CommitEdit { id, text } => {
        self.store.commit_edit(id, &text)?;
        self.notify(MSG_TASK_UPDATED);
        Ok(Change::TaskUpdated(id))
      }
      Action::DeleteTask(id) => {
        self.store.delete_task(id)?;
        self.notify(MSG_TASK_DELETED);
        Ok(Change::TaskDeleted(id))
      }
      Action::SetDueDate { id, due } => {
        self.store.set_due(id, due)?;
        self.notify(MSG_TASK_UPDATED);
        Ok(Change::TaskUpdated(id))
      }
      Action::SetNotes { id, notes } => {
        self.store.set_notes(id, notes)?;
        self.notify(MSG_TASK_UPDATED);
        Ok(Change::TaskUpdated(id))
      }
      Action::ChangeSetting(change) => {
        info!(key = change.key(), ?change, "changed setting");
        self.settings.apply(change);
        Ok(Change::SettingChanged(change))
      }
      Action::DismissNotification(seq) => {
        self.notifications.retain(|note| note.seq != seq);
        Ok(Change::NotificationDismissed(seq))
      }
    }
  }

  /// Queued whatever the notifications setting says; front ends decide
  /// whether to show them.
  fn notify(&mut self, message: &str) {
    self.next_seq += 1;
    self.notifications.push(Notification {
      seq: self.next_seq,
      message: message.to_string(),
    });

    if self.notifications.len() > NOTIFICATION_LIMIT {
      let overflow = self.notifications.len() - NOTIFICATION_LIMIT;
      self.notifications.drain(..overflow);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn signed_in() -> AppState {
    let mut state = AppState::default();
    state
      .apply(Action::SubmitCredentials {
        email: "me@example.com".to_string(),
        password: "pw".to_string(),
      })
      .expect("sign in");
    state
  }

  #[test]
  fn gate_blocks_task_actions() {
    let mut state = AppState::default();
    assert_eq!(state.screen(), Screen::SignIn);

    let before = state.clone();
    assert_eq!(
      state.apply(Action::AddTask("sneaky".to_string())),
      Err(Rejection::NotSignedIn)
    );
    assert_eq!(state, before);
  }

  #[test]
  fn failed_submit_keeps_drafts() {
    let mut state = AppState::default();
    state
      .apply(Action::SetEmailDraft("me@example.com".to_string()))
      .expect("draft");
    assert_eq!(
      state.apply(Action::SubmitCredentials {
        email: "me@example.com".to_string(),
        password: " ".to_string(),
      }),
      Err(Rejection::InvalidCredentials)
    );
    assert_eq!(state.drafts().email, "me@example.com");
    assert_eq!(state.screen(), Screen::SignIn);
  }

  #[test]
  fn successful_changes_queue_notifications() {
    let mut state = signed_in();
    state
      .apply(Action::SetNewTaskDraft("Call mom".to_string()))
      .expect("draft");
    state.apply(Action::AddTask("Call mom".to_string())).expect("add");
    assert!(state.drafts().new_task.is_empty());

    let messages: Vec<String> = state
      .take_notifications()
      .into_iter()
      .map(|note| note.message)
      .collect();
    assert_eq!(messages, vec![MSG_TASK_ADDED.to_string()]);
    assert!(state.notifications().is_empty());

    state
      .apply(Action::ToggleCompleted(TaskId::new(1)))
      .expect("toggle");
    assert!(state.notifications().is_empty());
  }

  #[test]
  fn notifications_are_capped_and_ignore_setting() {
    let mut state = signed_in();
    for n in 0..8 {
      state.apply(Action::AddTask(format!("task {n}"))).expect("add");
    }
    assert_eq!(state.notifications().len(), NOTIFICATION_LIMIT);
    let oldest = state.notifications()[0].seq;
    assert_eq!(oldest, 4);

    state
      .apply(Action::DismissNotification(oldest))
      .expect("dismiss");
    assert_eq!(state.notifications().len(), NOTIFICATION_LIMIT - 1);

    state.take_notifications();
    state
      .apply(Action::ChangeSetting(SettingChange::Notifications(false)))
      .expect("setting");
    state.apply(Action::AddTask("quiet".to_string())).expect("add");
    let messages: Vec<String> = state
      .take_notifications()
      .into_iter()
      .map(|note| note.message)
      .collect();
    assert_eq!(messages, vec![MSG_TASK_ADDED.to_string()]);
  }

  #[test]
  fn notifications_queue_with_setting_off_from_start() {
    let settings = Settings {
      notifications: false,
      ..Settings::default()
    };
    let mut state = AppState::new(TaskStore::with_demo_data(), settings);
    state
      .apply(Action::SubmitCredentials {
        email: "a".to_string(),
        password: "b".to_string(),
      })
      .expect("sign in");
    state.apply(Action::AddTask("x".to_string())).expect("add");
    assert_eq!(state.notifications().len(), 1);
  }

  #[test]
  fn every_task_change_confirms() {
    let mut state = signed_in();
    let messages = |state: &mut AppState| -> Vec<String> {
      state
        .take_notifications()
        .into_iter()
        .map(|note| note.message)
        .collect()
    };

    state
      .apply(Action::DeleteTask(TaskId::new(2)))
      .expect("delete");
    assert_eq!(messages(&mut state), vec![MSG_TASK_DELETED.to_string()]);

    let id = TaskId::new(3);
    state.apply(Action::BeginEdit(id)).expect("edit");
    assert!(messages(&mut state).is_empty());
    assert_eq!(
      state.apply(Action::CommitEdit {
        id,
        text: "  ".to_string(),
      }),
      Err(Rejection::EmptyInput { field: "task text" })
    );
    assert!(messages(&mut state).is_empty());
    state
      .apply(Action::CommitEdit {
        id,
        text: "Buy oat milk".to_string(),
      })
      .expect("commit");
    assert_eq!(messages(&mut state), vec![MSG_TASK_UPDATED.to_string()]);

    state
      .apply(Action::SetDueDate {
        id,
        due: NaiveDate::from_ymd_opt(2026, 11, 1),
      })
      .expect("due");
    state
      .apply(Action::SetNotes {
        id,
        notes: Some("the barista kind".to_string()),
      })
      .expect("notes");
    assert_eq!(
      messages(&mut state),
      vec![MSG_TASK_UPDATED.to_string(), MSG_TASK_UPDATED.to_string()]
    );

    assert!(state.apply(Action::DeleteTask(TaskId::new(99))).is_err());
    assert!(messages(&mut state).is_empty());
  }

  #[test]
  fn sign_out_retains_data() {
    let mut state = signed_in();
    state
      .apply(Action::CreateList("Side Quests".to_string()))
      .expect("list");
    state
      .apply(Action::SelectList(ListId::new("side-quests")))
      .expect("select");
    state.apply(Action::AddTask("Find the key".to_string())).expect("add");

    state.apply(Action::SignOut).expect("sign out");
    assert_eq!(state.screen(), Screen::SignIn);
    assert_eq!(
      state.apply(Action::SignOut),
      Err(Rejection::NotSignedIn)
    );

    state
      .apply(Action::SubmitCredentials {
        email: "a".to_string(),
        password: "b".to_string(),
      })
      .expect("sign in again");
    assert_eq!(state.store().selected(), &ListId::new("side-quests"));
    assert_eq!(state.store().tasks().len(), 6);
  }
}
