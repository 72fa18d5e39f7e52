use std::io::{BufRead, Write};

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::app::{Action, AppState, Change};
use crate::model::{ListId, TaskId};
use crate::render::Renderer;
use crate::settings::SettingChange;
use crate::view::Snapshot;

pub const HELP: &str = "\
commands:
  signin <email> <password>   sign in (any non-empty pair)
  mode                        switch between sign in and create account
  signout                     back to the sign-in screen
  lists                       show lists with open counts
  select <list-id>            show a list
  newlist <name>              create a list
  add <text>                  add a task to the shown list
  done <id>                   toggle completed
  star <id>                   toggle important
  edit <id>                   start editing a task's text
  draft <text>                replace the edit draft
  save <id> [text]            commit the edit (draft text if omitted)
  delete <id>                 delete a task
  due <id> <YYYY-MM-DD|none>  set or clear the due date
  note <id> <text|none>       set or clear notes
  set <key> <value>           notifications|autosort on/off, theme default|colorful|minimal
  settings                    show settings
  show                        redraw the current screen
  export                      print the session as JSON
  help                        this text
  quit                        leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Apply(Action),
  /// Commit the current edit draft.
  SaveDraft(TaskId),
  Lists,
  Settings,
  Show,
  Export,
  Help,
  Quit,
}

impl Command {
  /// `None` for blank lines and `#` comments.
  pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
      return Ok(None);
    }

    let (head, rest) = split_word(line);
    let command = match head.to_ascii_lowercase().as_str() {
      "signin" | "signup" => {
        let (email, password) = split_word(rest);
        Self::Apply(Action::SubmitCredentials {
          email: email.to_string(),
          password: password.to_string(),
        })
      }
      "mode" => Self::Apply(Action::ToggleAuthMode),
      "signout" => Self::Apply(Action::SignOut),
      "lists" => Self::Lists,
      "select" => Self::Apply(Action::SelectList(ListId::new(required(rest, "list id")?))),
      "newlist" => Self::Apply(Action::CreateList(rest.to_string())),
      "add" => Self::Apply(Action::AddTask(rest.to_string())),
      "done" => Self::Apply(Action::ToggleCompleted(parse_id(rest)?)),
      "star" => Self::Apply(Action::ToggleImportant(parse_id(rest)?)),
      "edit" => Self::Apply(Action::BeginEdit(parse_id(rest)?)),
      "draft" => Self::Apply(Action::SetEditDraft(rest.to_string())),
      "save" => {
        let (id, text) = split_word(rest);
        let id = parse_id(id)?;
        if text.is_empty() {
          Self::SaveDraft(id)
        } else {
          Self::Apply(Action::CommitEdit {
            id,
            text: text.to_string(),
          })
        }
      }
      "delete" | "rm" => Self::Apply(Action::DeleteTask(parse_id(rest)?)),
      "due" => {
        let (id, value) = split_word(rest);
        let due = match required(value, "due date")? {
          "none" => None,
          date => Some(
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
              .with_context(|| format!("invalid date '{date}', expected YYYY-MM-DD"))?,
          ),
        };
        Self::Apply(Action::SetDueDate {
          id: parse_id(id)?,
          due,
        })
      }
      "note" => {
        let (id, value) = split_word(rest);
        let notes = match required(value, "note text")? {
          "none" => None,
          text => Some(text.to_string()),
        };
        Self::Apply(Action::SetNotes {
          id: parse_id(id)?,
          notes,
        })
      }
      "set" => {
        let (key, value) = split_word(rest);
        let change = SettingChange::parse(required(key, "setting key")?, value)?;
        Self::Apply(Action::ChangeSetting(change))
      }
      "settings" => Self::Settings,
      "show" => Self::Show,
      "export" => Self::Export,
      "help" | "?" => Self::Help,
      "quit" | "exit" => Self::Quit,
      other => return Err(anyhow!("unknown command: {other} (try 'help')")),
    };

    Ok(Some(command))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
  Continue,
  Quit,
}

/// Line-driven front end: every accepted action redraws the screen.
#[derive(Debug)]
pub struct Shell {
  state: AppState,
  renderer: Renderer,
}

impl Shell {
  pub fn new(state: AppState, renderer: Renderer) -> Self {
    Self { state, renderer }
  }

  pub fn state(&self) -> &AppState {
    &self.state
  }

  #[instrument(skip_all)]
  pub fn run<R: BufRead, W: Write>(
    &mut self,
    input: R,
    out: &mut W,
    prompt: bool,
    today: NaiveDate,
  ) -> anyhow::Result<()> {
    self.renderer.render(out, &self.state, today)?;

    let mut lines = input.lines();
    loop {
      if prompt {
        write!(out, "todocal> ")?;
        out.flush()?;
      }
      let Some(line) = lines.next() else {
        break;
      };
      let line = line.context("failed to read command")?;
      if self.execute(&line, out, today)? == Flow::Quit {
        info!("quit requested");
        break;
      }
    }

    Ok(())
  }

  /// Runs one command line. Bad input and rejected actions are reported to
  /// `out`; only write failures end the session with an error.
  pub fn execute<W: Write>(
    &mut self,
    line: &str,
    out: &mut W,
    today: NaiveDate,
  ) -> anyhow::Result<Flow> {
    let command = match Command::parse(line) {
      Ok(Some(command)) => command,
      Ok(None) => return Ok(Flow::Continue),
      Err(err) => {
        warn!(error = %err, "could not parse command");
        writeln!(out, "error: {err:#}")?;
        return Ok(Flow::Continue);
      }
    };
    debug!(?command, "parsed command");

    match command {
      Command::Apply(action) => self.apply(action, out, today)?,
      Command::SaveDraft(id) => {
        let text = self
          .state
          .store()
          .editing()
          .filter(|draft| draft.task_id == id)
          .map(|draft| draft.buffer.clone())
          .unwrap_or_default();
        self.apply(Action::CommitEdit { id, text }, out, today)?;
      }
      Command::Lists => self.renderer.render_sidebar(out, &self.state)?,
      Command::Settings => self.renderer.render_settings(out, self.state.settings())?,
      Command::Show => self.renderer.render(out, &self.state, today)?,
      Command::Export => {
        let json = serde_json::to_string_pretty(&Snapshot::capture(&self.state))
          .context("failed to serialize session")?;
        writeln!(out, "{json}")?;
      }
      Command::Help => writeln!(out, "{HELP}")?,
      Command::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
  }

  fn apply<W: Write>(&mut self, action: Action, out: &mut W, today: NaiveDate) -> anyhow::Result<()> {
    let change = match self.state.apply(action) {
      Ok(change) => change,
      Err(rejection) => {
        writeln!(out, "rejected: {rejection}")?;
        return Ok(());
      }
    };

    if let Some(summary) = summarize(&change) {
      writeln!(out, "{summary}")?;
    }
    let notifications = self.state.take_notifications();
    self
      .renderer
      .render_notifications(out, self.state.settings(), &notifications)?;

    match change {
      Change::DraftUpdated | Change::NotificationDismissed(_) | Change::SettingChanged(_) => {}
      _ => {
        writeln!(out)?;
        self.renderer.render(out, &self.state, today)?;
      }
    }
    Ok(())
  }
}

fn summarize(change: &Change) -> Option<String> {
  let text = match change {
    Change::SignedIn => "Signed in.".to_string(),
    Change::SignedOut => "Signed out.".to_string(),
    Change::ListCreated(id) => format!("Created list {id}."),
    Change::TaskAdded(id) => format!("Created task {id}."),
    Change::TaskDeleted(id) => format!("Deleted task {id}."),
    Change::EditStarted(id) => format!("Editing task {id}; use 'draft' and 'save {id}'."),
    Change::SettingChanged(change) => format!("Set {}.", change.key()),
    _ => return None,
  };
  Some(text)
}

fn split_word(s: &str) -> (&str, &str) {
  let s = s.trim();
  match s.split_once(char::is_whitespace) {
    Some((head, rest)) => (head, rest.trim_start()),
    None => (s, ""),
  }
}

fn required<'a>(value: &'a str, what: &str) -> anyhow::Result<&'a str> {
  let value = value.trim();
  if value.is_empty() {
    return Err(anyhow!("missing {what}"));
  }
  Ok(value)
}

fn parse_id(value: &str) -> anyhow::Result<TaskId> {
  let value = required(value, "task id")?;
  value
    .parse::<TaskId>()
    .with_context(|| format!("invalid task id '{value}'"))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parsed(line: &str) -> Command {
    Command::parse(line).expect("parse").expect("command")
  }

  #[test]
  fn blank_and_comment_lines_are_skipped() {
    assert_eq!(Command::parse("   ").expect("parse"), None);
    assert_eq!(Command::parse("# setup").expect("parse"), None);
  }

  #[test]
  fn text_arguments_keep_inner_spacing() {
    assert_eq!(
      parsed("add   Buy  eggs"),
      Command::Apply(Action::AddTask("Buy  eggs".to_string()))
    );
    assert_eq!(
      parsed("newlist Home Projects"),
      Command::Apply(Action::CreateList("Home Projects".to_string()))
    );
    assert_eq!(
      parsed("save 3 Buy oat milk"),
      Command::Apply(Action::CommitEdit {
        id: TaskId::new(3),
        text: "Buy oat milk".to_string(),
      })
    );
    assert_eq!(parsed("save 3"), Command::SaveDraft(TaskId::new(3)));
  }

  #[test]
  fn password_keeps_everything_after_the_email() {
    assert_eq!(
      parsed("signin me@example.com correct horse  battery"),
      Command::Apply(Action::SubmitCredentials {
        email: "me@example.com".to_string(),
        password: "correct horse  battery".to_string(),
      })
    );
    assert_eq!(
      parsed("signin me@example.com"),
      Command::Apply(Action::SubmitCredentials {
        email: "me@example.com".to_string(),
        password: String::new(),
      })
    );
  }

  #[test]
  fn blank_add_still_reaches_the_store() {
    assert_eq!(
      parsed("add"),
      Command::Apply(Action::AddTask(String::new()))
    );
  }

  #[test]
  fn dates_settings_and_notes() {
    assert_eq!(
      parsed("due 2 2026-01-31"),
      Command::Apply(Action::SetDueDate {
        id: TaskId::new(2),
        due: NaiveDate::from_ymd_opt(2026, 1, 31),
      })
    );
    assert_eq!(
      parsed("due 2 none"),
      Command::Apply(Action::SetDueDate {
        id: TaskId::new(2),
        due: None,
      })
    );
    assert_eq!(
      parsed("note 4 stretch first"),
      Command::Apply(Action::SetNotes {
        id: TaskId::new(4),
        notes: Some("stretch first".to_string()),
      })
    );
    assert_eq!(
      parsed("set theme colorful"),
      Command::Apply(Action::ChangeSetting(SettingChange::Theme(
        crate::settings::Theme::Colorful
      )))
    );
  }

  #[test]
  fn malformed_input_is_an_error() {
    assert!(Command::parse("done x").is_err());
    assert!(Command::parse("due 1 tomorrow").is_err());
    assert!(Command::parse("select").is_err());
    assert!(Command::parse("set volume 11").is_err());
    assert!(Command::parse("frobnicate").is_err());
  }
}
