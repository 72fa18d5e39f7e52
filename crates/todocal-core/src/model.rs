use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Icon given to every user-created list.
pub const NOTE_ICON: &str = "📝";

/// Gradient token given to every user-created list.
pub const DEFAULT_GRADIENT: &str = "personal-gradient";

/// Session-unique task identifier, handed out by a monotonic counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
  pub const fn new(raw: u64) -> Self {
    Self(raw)
  }

  pub const fn get(self) -> u64 {
    self.0
  }
}

impl fmt::Display for TaskId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl FromStr for TaskId {
  type Err = ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.trim().parse::<u64>().map(Self)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(String);

impl ListId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  /// Slug for a user-entered list name.
  pub fn from_name(name: &str) -> Self {
    Self(slugify(name))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ListId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for ListId {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl PartialEq<str> for ListId {
  fn eq(&self, other: &str) -> bool {
    self.0 == other
  }
}

impl PartialEq<&str> for ListId {
  fn eq(&self, other: &&str) -> bool {
    self.0 == *other
  }
}

/// Lowercases the trimmed name and joins its whitespace-separated words
/// with single hyphens.
pub fn slugify(name: &str) -> String {
  name.to_lowercase()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join("-")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
  pub id: TaskId,
  pub text: String,
  #[serde(default)]
  pub completed: bool,
  #[serde(default)]
  pub important: bool,
  #[serde(default)]
  pub due: Option<NaiveDate>,
  #[serde(default)]
  pub notes: Option<String>,
  pub list_id: ListId,
}

impl Task {
  pub fn new(id: TaskId, text: String, list_id: ListId) -> Self {
    Self {
      id,
      text,
      completed: false,
      important: false,
      due: None,
      notes: None,
      list_id,
    }
  }
}

/// A named bucket of tasks. Its open-task count is never stored here; see
/// [`crate::store::TaskStore::count_for`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
  pub id: ListId,
  pub name: String,
  pub icon: String,
  pub gradient: String,
}

impl TodoList {
  pub fn builtin(id: &str, name: &str, icon: &str, gradient: &str) -> Self {
    Self {
      id: ListId::new(id),
      name: name.to_string(),
      icon: icon.to_string(),
      gradient: gradient.to_string(),
    }
  }

  /// A user list named `name`, with the generic icon and gradient.
  pub fn user(name: &str) -> Self {
    let name = name.trim();
    Self {
      id: ListId::from_name(name),
      name: name.to_string(),
      icon: NOTE_ICON.to_string(),
      gradient: DEFAULT_GRADIENT.to_string(),
    }
  }
}
