use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("no configuration directory known for your system; please adjust XDG_CONFIG_HOME")]
  NoConfigDir,

  #[error("cannot read configuration at {path}: {err}")]
  CannotReadConfig { path: PathBuf, err: io::Error },

  #[error("cannot parse configuration: {err}")]
  CannotParseConfig { err: String },

  #[error("key binding {key} has no command")]
  EmptyBinding { key: String },

  #[error("key binding {key} names unknown command {command}")]
  UnknownCommand { key: String, command: String },

  #[error("highlight attribute {attr} cannot be empty")]
  EmptyStyle { attr: String },
}

impl ConfigError {
  pub fn empty_binding(key: impl Into<String>) -> Self {
    Self::EmptyBinding { key: key.into() }
  }

  pub fn unknown_command(key: impl Into<String>, command: impl Into<String>) -> Self {
    Self::UnknownCommand {
      key: key.into(),
      command: command.into(),
    }
  }

  pub fn empty_style(attr: impl Into<String>) -> Self {
    Self::EmptyStyle { attr: attr.into() }
  }
}
