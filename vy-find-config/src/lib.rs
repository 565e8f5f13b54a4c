//! Configuration for the find/replace session and its driver.

pub mod error;

use std::{
  collections::HashMap,
  fs,
  path::{Path, PathBuf},
};

use error::ConfigError;
use serde::{Deserialize, Serialize};

/// Configuration object used by the session and the driver.
///
/// User configuration being opt-in for every option, a different type is used, [`UserConfig`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Config {
  pub highlight: HighlightConfig,
  pub options: OptionsConfig,
  pub keys: KeysConfig,
}

impl Config {
  /// Load the configuration from a given path.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    log::debug!("loading configuration at {path}", path = path.display());

    let content = fs::read_to_string(path).map_err(|err| ConfigError::CannotReadConfig {
      path: path.to_owned(),
      err,
    })?;

    let config: Self = toml::from_str(&content).map_err(|err| ConfigError::CannotParseConfig {
      err: err.to_string(),
    })?;
    config.validate()?;

    Ok(config)
  }

  /// Default configuration using the `default-config.toml` file.
  const DEFAULT_CONFIG_CONTENT: &'static str = include_str!("../../default-config.toml");

  pub fn load_default_config() -> Result<Self, ConfigError> {
    log::debug!("loading default configuration");

    toml::from_str(Self::DEFAULT_CONFIG_CONTENT).map_err(|err| ConfigError::CannotParseConfig {
      err: err.to_string(),
    })
  }

  /// Load the default configuration, the user configuration, and merge both.
  pub fn load_default_user() -> Result<Self, ConfigError> {
    let config = Self::load_default_config()?;

    match UserConfig::load_from_xdg() {
      Ok(user_config) => Ok(config.with_user_config(user_config)),

      Err(err) => {
        log::warn!("cannot load user config: {err}");
        Ok(config)
      }
    }
  }

  /// Merge a user config on top of this one, keeping this one as-is if the result does not validate.
  pub fn with_user_config(self, user_config: UserConfig) -> Self {
    let mut merged = self.clone();
    merged.merge_user_config(user_config);

    match merged.validate() {
      Ok(()) => merged,

      Err(err) => {
        log::warn!("ignoring user config: {err}");
        self
      }
    }
  }

  /// Merge the config with a user-provided one.
  pub fn merge_user_config(&mut self, user_config: UserConfig) {
    if let Some(user_highlight) = user_config.highlight {
      self.highlight.merge_user_config(user_highlight);
    }

    if let Some(user_options) = user_config.options {
      self.options.merge_user_config(user_options);
    }

    if let Some(user_keys) = user_config.keys {
      self.keys.merge_user_config(user_keys);
    }
  }

  /// Check that no value was left empty and that every key binding names a known command.
  pub fn validate(&self) -> Result<(), ConfigError> {
    self.highlight.validate()?;
    self.keys.validate()
  }
}

/// Highlight configuration.
///
/// Style applied to the matched spans of a session. It is handed once to the session when it is created and never
/// changes afterwards.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HighlightConfig {
  pub background: String,
  pub foreground: String,
}

impl HighlightConfig {
  fn merge_user_config(&mut self, user_config: UserHighlightConfig) {
    if let Some(background) = user_config.background {
      self.background = background;
    }

    if let Some(foreground) = user_config.foreground {
      self.foreground = foreground;
    }
  }

  fn validate(&self) -> Result<(), ConfigError> {
    if self.background.trim().is_empty() {
      return Err(ConfigError::empty_style("background"));
    }

    if self.foreground.trim().is_empty() {
      return Err(ConfigError::empty_style("foreground"));
    }

    Ok(())
  }
}

/// Initial values of the search options.
///
/// Those are the values a fresh session starts with; they can be toggled afterwards.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OptionsConfig {
  /// Allow matches to span several lines.
  pub no_line_stop: bool,

  /// Interpret patterns as regular expressions.
  pub regex_expr: bool,

  /// Case-insensitive matching.
  pub no_case: bool,

  /// Whole-word matching.
  pub exact: bool,

  /// Search elided text as well.
  pub elide: bool,
}

impl Default for OptionsConfig {
  fn default() -> Self {
    Self {
      no_line_stop: false,
      regex_expr: true,
      no_case: true,
      exact: false,
      elide: false,
    }
  }
}

impl OptionsConfig {
  fn merge_user_config(&mut self, user_config: UserOptionsConfig) {
    self.no_line_stop = user_config.no_line_stop.unwrap_or(self.no_line_stop);
    self.regex_expr = user_config.regex_expr.unwrap_or(self.regex_expr);
    self.no_case = user_config.no_case.unwrap_or(self.no_case);
    self.exact = user_config.exact.unwrap_or(self.exact);
    self.elide = user_config.elide.unwrap_or(self.elide);
  }
}

/// Key bindings.
///
/// `begin` and `set_replacement` are installed in the host view; `prompt` maps keys of the pattern prompt to command
/// names.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeysConfig {
  pub begin: String,
  pub set_replacement: String,
  pub prompt: HashMap<String, String>,
}

impl KeysConfig {
  /// Names of the commands prompt keys can be bound to.
  pub const COMMANDS: [&'static str; 13] = [
    "confirm_pattern",
    "cancel",
    "pick_prev",
    "pick_next",
    "highlight",
    "replace_at_cursor",
    "replace_in_selection",
    "replace_all",
    "toggle_no_line_stop",
    "toggle_regex_expr",
    "toggle_no_case",
    "toggle_exact",
    "toggle_elide",
  ];

  fn merge_user_config(&mut self, user_config: UserKeysConfig) {
    if let Some(begin) = user_config.begin {
      self.begin = begin;
    }

    if let Some(set_replacement) = user_config.set_replacement {
      self.set_replacement = set_replacement;
    }

    if let Some(prompt) = user_config.prompt {
      self.prompt.extend(prompt);
    }
  }

  fn validate(&self) -> Result<(), ConfigError> {
    if self.begin.trim().is_empty() {
      return Err(ConfigError::empty_binding("begin"));
    }

    if self.set_replacement.trim().is_empty() {
      return Err(ConfigError::empty_binding("set_replacement"));
    }

    for (key, command) in &self.prompt {
      let command = command.trim();

      if command.is_empty() {
        return Err(ConfigError::empty_binding(key));
      }

      if !Self::COMMANDS.contains(&command) {
        return Err(ConfigError::unknown_command(key, command));
      }
    }

    Ok(())
  }
}

/// User version of configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UserConfig {
  pub highlight: Option<UserHighlightConfig>,
  pub options: Option<UserOptionsConfig>,
  pub keys: Option<UserKeysConfig>,
}

impl UserConfig {
  /// Path of the user configuration file, if the system knows about a configuration directory.
  pub fn xdg_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vy-find/config.toml"))
  }

  /// Load the config from the default user location (XDG).
  pub fn load_from_xdg() -> Result<Self, ConfigError> {
    log::debug!("loading user configuration");

    let path = Self::xdg_path().ok_or(ConfigError::NoConfigDir)?;
    Self::load(path)
  }

  /// Load the configuration from a given path.
  fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();

    log::debug!("loading configuration at {path}", path = path.display());

    let content = fs::read_to_string(path).map_err(|err| ConfigError::CannotReadConfig {
      path: path.to_owned(),
      err,
    })?;

    toml::from_str(&content).map_err(|err| ConfigError::CannotParseConfig {
      err: err.to_string(),
    })
  }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UserHighlightConfig {
  pub background: Option<String>,
  pub foreground: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UserOptionsConfig {
  pub no_line_stop: Option<bool>,
  pub regex_expr: Option<bool>,
  pub no_case: Option<bool>,
  pub exact: Option<bool>,
  pub elide: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UserKeysConfig {
  pub begin: Option<String>,
  pub set_replacement: Option<String>,
  pub prompt: Option<HashMap<String, String>>,
}
