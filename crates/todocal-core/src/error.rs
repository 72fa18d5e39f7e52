use crate::model::{ListId, TaskId};

/// Reasons an action was refused.
///
/// Every rejection leaves the state exactly as it was; callers are free to
/// ignore them, and the front ends only log or echo them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
  /// A text field was blank after trimming.
  #[error("{field} cannot be empty")]
  EmptyInput { field: &'static str },

  #[error("task not found: {0}")]
  TaskNotFound(TaskId),

  #[error("list not found: {0}")]
  ListNotFound(ListId),

  /// A new list would reuse the slug of an existing list.
  #[error("a list with id '{0}' already exists")]
  DuplicateList(ListId),

  /// Sign-in submitted with an empty email or password.
  #[error("email and password are both required")]
  InvalidCredentials,

  #[error("sign in first")]
  NotSignedIn,

  #[error("already signed in")]
  AlreadySignedIn,

  /// Commit or draft update for a task that is not under edit.
  #[error("task {0} is not being edited")]
  NotEditing(TaskId),

  #[error("no task is being edited")]
  NoActiveEdit,

  #[error("unknown setting: {0}")]
  UnknownSetting(String),

  #[error("invalid value '{value}' for setting '{key}'")]
  InvalidSetting { key: String, value: String },
}
