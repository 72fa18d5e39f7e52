use std::io::{self, IsTerminal, Write};

use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

use crate::app::{AppState, Notification, Screen};
use crate::config::Config;
use crate::settings::{Settings, Theme};
use crate::view::{self, PanelBody};

/// Draws the session as plain text, optionally with ANSI colour.
#[derive(Debug, Clone)]
pub struct Renderer {
  color: bool,
}

impl Renderer {
  pub fn new(cfg: &Config) -> anyhow::Result<Self> {
    let color = cfg.color_enabled()? && io::stdout().is_terminal();
    Ok(Self { color })
  }

  /// No escape codes, for captured output.
  pub fn plain() -> Self {
    Self { color: false }
  }

  pub fn render<W: Write>(
    &self,
    out: &mut W,
    state: &AppState,
    today: NaiveDate,
  ) -> anyhow::Result<()> {
    match state.screen() {
      Screen::SignIn => self.render_gate(out, state),
      Screen::Tasks => {
        self.render_sidebar(out, state)?;
        writeln!(out)?;
        self.render_panel(out, state, today)
      }
    }
  }

  pub fn render_gate<W: Write>(&self, out: &mut W, state: &AppState) -> anyhow::Result<()> {
    let mode = state.session().mode();

    writeln!(out, "{}", self.paint(view::APP_TITLE, "1"))?;
    writeln!(out, "{}", view::APP_TAGLINE)?;
    writeln!(out)?;
    writeln!(out, "[ {} ]", self.paint(mode.title(), "1;34"))?;
    writeln!(out, "{}", mode.description())?;
    writeln!(out, "  signin <email> <password>")?;
    writeln!(out, "  mode    {}", mode.toggle_label())?;
    writeln!(out, "{}", self.paint(view::DEMO_HINT, "2"))?;
    Ok(())
  }

  #[tracing::instrument(skip_all)]
  pub fn render_sidebar<W: Write>(&self, out: &mut W, state: &AppState) -> anyhow::Result<()> {
    let headers = vec![
      String::new(),
      "List".to_string(),
      "Id".to_string(),
      "Open".to_string(),
    ];

    let rows = view::sidebar(state)
      .into_iter()
      .map(|entry| {
        let marker = if entry.selected {
          self.paint(">", "34")
        } else {
          String::new()
        };
        let name = format!("{} {}", entry.list.icon, entry.list.name);
        let name = if entry.selected {
          self.paint(&name, "1")
        } else {
          name
        };
        let badge = entry.badge().map(|n| n.to_string()).unwrap_or_default();
        vec![marker, name, entry.list.id.to_string(), badge]
      })
      .collect();

    write_table(out, headers, rows)
  }

  #[tracing::instrument(skip_all)]
  pub fn render_panel<W: Write>(
    &self,
    out: &mut W,
    state: &AppState,
    today: NaiveDate,
  ) -> anyhow::Result<()> {
    let panel = view::panel(state, today);
    let title = panel
      .list
      .map(|list| format!("{} {}", list.icon, list.name))
      .unwrap_or_else(|| "(no list)".to_string());

    writeln!(out, "{}", self.paint(&title, self.theme_code(state.settings().theme)))?;
    writeln!(out, "{}", panel.date_label)?;
    writeln!(out)?;

    let rows = match panel.body {
      PanelBody::Empty => {
        writeln!(out, "  {}", view::EMPTY_STATE_TITLE)?;
        writeln!(out, "  {}", view::EMPTY_STATE_HINT)?;
        return Ok(());
      }
      PanelBody::Tasks(rows) => rows,
    };

    let headers = vec![
      "ID".to_string(),
      "Done".to_string(),
      "Star".to_string(),
      "Task".to_string(),
      "Due".to_string(),
      "Notes".to_string(),
    ];

    let table = rows
      .into_iter()
      .map(|row| {
        let task = row.task;
        let done = if task.completed { "[x]" } else { "[ ]" };
        let star = if task.important {
          self.paint("*", "33")
        } else {
          String::new()
        };
        let text = match row.draft {
          Some(draft) => format!("(editing) {draft}"),
          None if task.completed => self.paint(&task.text, "9"),
          None => task.text.clone(),
        };
        let due = task.due.map(view::due_label).unwrap_or_default();
        let notes = task.notes.clone().unwrap_or_default();
        vec![
          self.paint(&task.id.to_string(), "33"),
          done.to_string(),
          star,
          text,
          due,
          notes,
        ]
      })
      .collect();

    write_table(out, headers, table)
  }

  /// Prints nothing while the notifications setting is off.
  pub fn render_notifications<W: Write>(
    &self,
    out: &mut W,
    settings: &Settings,
    notifications: &[Notification],
  ) -> anyhow::Result<()> {
    if !settings.notifications {
      return Ok(());
    }
    for note in notifications {
      writeln!(out, "{} {}", self.paint("ok", "32"), note.message)?;
    }
    Ok(())
  }

  pub fn render_settings<W: Write>(&self, out: &mut W, settings: &Settings) -> anyhow::Result<()> {
    let themes = Theme::all()
      .iter()
      .map(|theme| theme.as_key())
      .collect::<Vec<_>>()
      .join("|");

    writeln!(out, "notifications  {}", on_off(settings.notifications))?;
    writeln!(out, "autosort       {}", on_off(settings.auto_sort))?;
    writeln!(out, "theme          {} ({themes})", settings.theme.label())?;
    Ok(())
  }

  fn theme_code(&self, theme: Theme) -> &'static str {
    match theme {
      Theme::Default => "1",
      Theme::Colorful => "1;35",
      Theme::Minimal => "0",
    }
  }

  fn paint(&self, text: &str, code: &str) -> String {
    if !self.color {
      return text.to_string();
    }
    format!("\x1b[{code}m{text}\x1b[0m")
  }
}

fn on_off(flag: bool) -> &'static str {
  if flag { "on" } else { "off" }
}

fn write_table<W: Write>(
  out: &mut W,
  headers: Vec<String>,
  rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
  let mut widths: Vec<usize> = headers.iter().map(|h| visible_width(h)).collect();
  for row in &rows {
    for (width, cell) in widths.iter_mut().zip(row) {
      *width = (*width).max(visible_width(cell));
    }
  }

  let write_row = |out: &mut W, cells: &[String]| -> anyhow::Result<()> {
    let line = cells
      .iter()
      .zip(&widths)
      .map(|(cell, width)| {
        let padding = width.saturating_sub(visible_width(cell));
        format!("{cell}{}", " ".repeat(padding))
      })
      .collect::<Vec<_>>()
      .join(" ");
    writeln!(out, "{}", line.trim_end())?;
    Ok(())
  };

  write_row(out, &headers)?;
  let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
  write_row(out, &rule)?;
  for row in &rows {
    write_row(out, row)?;
  }

  Ok(())
}

fn visible_width(s: &str) -> usize {
  UnicodeWidthStr::width(strip_ansi(s).as_str())
}

fn strip_ansi(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut escaped = false;

  for ch in s.chars() {
    if escaped {
      if ch == 'm' {
        escaped = false;
      }
      continue;
    }
    if ch == '\x1b' {
      escaped = true;
      continue;
    }
    out.push(ch);
  }

  out
}
