use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use tracing::{debug, info, trace, warn};

use crate::app::AppState;
use crate::settings::{SettingChange, Settings, parse_flag};
use crate::store::TaskStore;

/// Keys the rc file understands. Anything else is kept but ignored.
pub const KNOWN_KEYS: &[&str] = &["notifications", "autosort", "theme", "seed", "color"];

#[derive(Debug, Clone)]
pub struct Config {
  map: HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>,
}

impl Default for Config {
  fn default() -> Self {
    let map = [
      ("notifications", "on"),
      ("autosort", "off"),
      ("theme", "default"),
      ("seed", "on"),
      ("color", "on"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    Self {
      map,
      loaded_files: vec![],
    }
  }
}

impl Config {
  /// Defaults, then the first rc file found: `rc_override`, `$TODOCALRC`,
  /// `~/.todocalrc`.
  #[tracing::instrument(skip(rc_override))]
  pub fn load(rc_override: Option<&Path>) -> anyhow::Result<Self> {
    let mut cfg = Self::default();

    match resolve_rc_path(rc_override) {
      Some(path) => {
        info!(rc = %path.display(), "loading todocalrc");
        cfg.load_file(&path, &mut Vec::new())?;
      }
      None => warn!("no todocalrc found; using defaults"),
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(self, overrides))]
  pub fn apply_overrides<I>(&mut self, overrides: I)
  where
    I: IntoIterator<Item = (String, String)>,
  {
    for (k, v) in overrides {
      let key = k.strip_prefix("rc.").unwrap_or(&k).to_string();
      if !KNOWN_KEYS.contains(&key.as_str()) {
        warn!(key = %key, "ignoring unknown override");
      }
      debug!(key = %key, value = %v, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.map.get(key).map(String::as_str)
  }

  pub fn get_bool(&self, key: &str) -> anyhow::Result<Option<bool>> {
    self.get(key)
      .map(|value| {
        parse_flag(value)
          .ok_or_else(|| anyhow!("invalid boolean for '{key}': {value}"))
      })
      .transpose()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
    self.map.iter()
  }

  /// Starting preferences for the session.
  pub fn settings(&self) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    for key in ["notifications", "autosort", "theme"] {
      if let Some(value) = self.get(key) {
        let change = SettingChange::parse(key, value)
          .with_context(|| format!("invalid config value for '{key}'"))?;
        settings.apply(change);
      }
    }
    Ok(settings)
  }

  pub fn seed_enabled(&self) -> anyhow::Result<bool> {
    Ok(self.get_bool("seed")?.unwrap_or(true))
  }

  pub fn color_enabled(&self) -> anyhow::Result<bool> {
    Ok(self.get_bool("color")?.unwrap_or(true))
  }

  /// `chain` holds the canonical paths of the files currently being read,
  /// outermost first.
  #[tracing::instrument(skip(self, chain))]
  fn load_file(&mut self, path: &Path, chain: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text = fs::read_to_string(&path)
      .with_context(|| format!("failed to read {}", path.display()))?;

    let canonical = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
    if chain.contains(&canonical) {
      bail!("include cycle: {} is already being loaded", path.display());
    }
    chain.push(canonical);

    self.loaded_files.push(path.clone());

    let base_dir = path
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_else(|| PathBuf::from("."));

    for (line_num, raw_line) in text.lines().enumerate() {
      let line = raw_line
        .split_once('#')
        .map_or(raw_line, |(before, _)| before)
        .trim();
      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) = line.strip_prefix("include ") {
        let include_path = resolve_include_path(&base_dir, include_rest.trim())?;
        debug!(
          file = %path.display(),
          include = %include_path.display(),
          line = line_num + 1,
          "processing include"
        );
        if include_path.exists() {
          self.load_file(&include_path, chain)?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line.split_once('=').ok_or_else(|| {
        anyhow!(
          "invalid config line {}:{}: {}",
          path.display(),
          line_num + 1,
          raw_line
        )
      })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      if !KNOWN_KEYS.contains(&key.as_str()) {
        warn!(key = %key, file = %path.display(), "unknown config key");
      }
      trace!(key = %key, value = %value, "loaded config key");
      self.map.insert(key, value);
    }

    chain.pop();
    Ok(())
  }
}

/// Fresh session state as configured: demo data unless `seed` is off.
pub fn build_state(cfg: &Config) -> anyhow::Result<AppState> {
  let store = if cfg.seed_enabled()? {
    TaskStore::with_demo_data()
  } else {
    TaskStore::new()
  };
  Ok(AppState::new(store, cfg.settings()?))
}

fn resolve_rc_path(override_path: Option<&Path>) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }

  if let Ok(rc_env) = std::env::var("TODOCALRC") {
    if rc_env == "/dev/null" {
      return None;
    }
    return Some(PathBuf::from(rc_env));
  }

  let candidate = dirs::home_dir()?.join(".todocalrc");
  candidate.exists().then_some(candidate)
}

fn resolve_include_path(base_dir: &Path, include: &str) -> anyhow::Result<PathBuf> {
  if include.is_empty() {
    return Err(anyhow!("include path cannot be empty"));
  }

  let expanded = expand_tilde(Path::new(include));
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(path: &Path) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) = text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}
