use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct PreprocessedArgs {
  pub cleaned_args: Vec<OsString>,
  pub rc_overrides: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct KeyVal {
  pub key: String,
  pub value: String,
}

impl std::str::FromStr for KeyVal {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (k, v) = s
      .split_once('=')
      .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
    Ok(Self {
      key: k.trim().to_string(),
      value: v.trim().to_string(),
    })
  }
}

#[derive(Parser, Debug, Clone)]
#[command(
  name = "todocal",
  version,
  about = "Todo Calendar: lists and tasks in an interactive terminal session"
)]
pub struct GlobalCli {
  #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
  pub verbose: u8,

  #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
  pub quiet: u8,

  #[arg(
    long = "rc",
    value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
    action = ArgAction::Append
  )]
  pub rc_overrides: Vec<KeyVal>,

  #[arg(long = "rc-file")]
  pub rc_file: Option<PathBuf>,

  /// Read commands from this file instead of stdin.
  #[arg(long = "script")]
  pub script: Option<PathBuf>,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
  let default_level = if quiet >= 2 {
    "error"
  } else if quiet == 1 {
    "warn"
  } else if verbose >= 3 {
    "trace"
  } else if verbose == 2 {
    "debug"
  } else if verbose == 1 {
    "info"
  } else {
    "warn"
  };

  let env_filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(default_level))
    .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

  let init_result = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .with_target(true)
    .with_level(true)
    .with_ansi(std::io::stderr().is_terminal())
    .try_init();

  if let Err(err) = init_result {
    debug!(error = %err, "tracing subscriber already set, continuing");
  }

  Ok(())
}

/// Pulls positional `rc.key=value` / `rc.key:value` overrides out of the
/// argument list before clap sees it.
#[tracing::instrument(skip_all)]
pub fn preprocess_args(raw: &[OsString]) -> PreprocessedArgs {
  let mut cleaned = Vec::with_capacity(raw.len());
  let mut overrides: Vec<(String, String)> = Vec::new();

  let mut iter = raw.iter().cloned();
  if let Some(bin) = iter.next() {
    cleaned.push(bin);
  }

  for arg in iter {
    let parsed = arg.to_str().and_then(|s| {
      let rest = s.strip_prefix("rc.")?;
      rest.split_once('=')
        .or_else(|| rest.split_once(':'))
        .map(|(k, v)| (format!("rc.{k}"), v.to_string()))
    });

    match parsed {
      Some((k, v)) => {
        debug!(key = %k, value = %v, "captured positional rc override");
        overrides.push((k, v));
      }
      None => cleaned.push(arg),
    }
  }

  PreprocessedArgs {
    cleaned_args: cleaned,
    rc_overrides: overrides,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn args(raw: &[&str]) -> Vec<OsString> {
    raw.iter().map(OsString::from).collect()
  }

  #[test]
  fn positional_overrides_are_extracted() {
    let pre = preprocess_args(&args(&[
      "todocal",
      "rc.theme=colorful",
      "-v",
      "rc.seed:off",
      "rc.bogus",
    ]));

    assert_eq!(
      pre.rc_overrides,
      vec![
        ("rc.theme".to_string(), "colorful".to_string()),
        ("rc.seed".to_string(), "off".to_string()),
      ]
    );
    assert_eq!(pre.cleaned_args, args(&["todocal", "-v", "rc.bogus"]));
  }

  #[test]
  fn global_flags_parse() {
    let cli = GlobalCli::parse_from(args(&[
      "todocal",
      "-vv",
      "--rc",
      "notifications=off",
      "--rc-file",
      "/tmp/rc",
    ]));
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.rc_overrides.len(), 1);
    assert_eq!(cli.rc_overrides[0].key, "notifications");
    assert_eq!(cli.rc_overrides[0].value, "off");
    assert_eq!(cli.rc_file, Some(PathBuf::from("/tmp/rc")));
  }

  #[test]
  fn key_val_requires_equals() {
    assert!("theme".parse::<KeyVal>().is_err());
  }
}
