pub mod app;
#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod config;
pub mod error;
pub mod model;
#[cfg(feature = "cli")]
pub mod render;
pub mod seed;
pub mod session;
pub mod settings;
#[cfg(feature = "cli")]
pub mod shell;
pub mod store;
pub mod view;

pub use app::{Action, AppState, Change, Notification, Screen};
pub use error::Rejection;
pub use model::{ListId, Task, TaskId, TodoList};
pub use settings::{SettingChange, Settings, Theme};
pub use store::TaskStore;

#[cfg(feature = "cli")]
#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<std::ffi::OsString>) -> anyhow::Result<()> {
  use std::fs::File;
  use std::io::{self, BufReader, IsTerminal};

  use anyhow::Context;
  use clap::Parser;
  use tracing::{debug, info, trace};

  let pre = cli::preprocess_args(&raw_args);
  let cli = cli::GlobalCli::parse_from(pre.cleaned_args);

  cli::init_tracing(cli.verbose, cli.quiet)?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting todocal"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(cli.rc_file.as_deref())?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli.rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value)),
    ),
  );
  for (key, value) in cfg.iter() {
    trace!(key = %key, value = %value, "effective config");
  }

  let state = config::build_state(&cfg).context("failed to build session state")?;
  let renderer = render::Renderer::new(&cfg)?;
  let mut shell = shell::Shell::new(state, renderer);

  let today = chrono::Local::now().date_naive();
  let stdout = io::stdout();
  let mut out = stdout.lock();

  match cli.script.as_deref() {
    Some(path) => {
      let file = File::open(path)
        .with_context(|| format!("failed to open script {}", path.display()))?;
      shell.run(BufReader::new(file), &mut out, false, today)?;
    }
    None => {
      let stdin = io::stdin();
      let prompt = stdin.is_terminal();
      shell.run(stdin.lock(), &mut out, prompt, today)?;
    }
  }

  info!("done");
  Ok(())
}
