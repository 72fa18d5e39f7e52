use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Rejection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  #[default]
  Default,
  Colorful,
  Minimal,
}

impl Theme {
  pub fn all() -> [Self; 3] {
    [Self::Default, Self::Colorful, Self::Minimal]
  }

  pub fn as_key(self) -> &'static str {
    match self {
      Self::Default => "default",
      Self::Colorful => "colorful",
      Self::Minimal => "minimal",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Default => "Default",
      Self::Colorful => "Colorful",
      Self::Minimal => "Minimal",
    }
  }

  pub fn from_key(key: &str) -> Option<Self> {
    match key.trim().to_ascii_lowercase().as_str() {
      "default" => Some(Self::Default),
      "colorful" => Some(Self::Colorful),
      "minimal" => Some(Self::Minimal),
      _ => None,
    }
  }
}

impl fmt::Display for Theme {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

impl FromStr for Theme {
  type Err = Rejection;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::from_key(s).ok_or_else(|| Rejection::InvalidSetting {
      key: "theme".to_string(),
      value: s.to_string(),
    })
  }
}

/// Session-scoped preferences. Only presentation reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
  pub notifications: bool,
  pub auto_sort: bool,
  pub theme: Theme,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      notifications: true,
      auto_sort: false,
      theme: Theme::Default,
    }
  }
}

impl Settings {
  pub fn apply(&mut self, change: SettingChange) {
    match change {
      SettingChange::Notifications(on) => self.notifications = on,
      SettingChange::AutoSort(on) => self.auto_sort = on,
      SettingChange::Theme(theme) => self.theme = theme,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingChange {
  Notifications(bool),
  AutoSort(bool),
  Theme(Theme),
}

impl SettingChange {
  /// Parses a `key value` pair as typed by a user.
  pub fn parse(key: &str, value: &str) -> Result<Self, Rejection> {
    let invalid = || Rejection::InvalidSetting {
      key: key.to_string(),
      value: value.to_string(),
    };

    match key.trim().to_ascii_lowercase().as_str() {
      "notifications" => parse_flag(value)
        .map(Self::Notifications)
        .ok_or_else(invalid),
      "autosort" | "auto-sort" | "auto_sort" => {
        parse_flag(value).map(Self::AutoSort).ok_or_else(invalid)
      }
      "theme" => Theme::from_key(value).map(Self::Theme).ok_or_else(invalid),
      _ => Err(Rejection::UnknownSetting(key.to_string())),
    }
  }

  pub fn key(self) -> &'static str {
    match self {
      Self::Notifications(_) => "notifications",
      Self::AutoSort(_) => "autosort",
      Self::Theme(_) => "theme",
    }
  }
}

/// Strict boolean parse: anything outside the known spellings is `None`.
pub fn parse_flag(s: &str) -> Option<bool> {
  match s.trim().to_ascii_lowercase().as_str() {
    "1" | "y" | "yes" | "on" | "true" => Some(true),
    "0" | "n" | "no" | "off" | "false" => Some(false),
    _ => None,
  }
}
