use std::{io, path::PathBuf};

use log::SetLoggerError;
use thiserror::Error;
use vy_find_config::error::ConfigError;

use crate::{text::Pos, views::ViewId};

#[derive(Debug, Error)]
pub enum OhNo {
  #[error("no search pattern; confirm one first")]
  NoPattern,

  #[error("no match")]
  NoMatch,

  #[error("no active selection")]
  InvalidRange,

  #[error("invalid pattern {pattern}: {err}")]
  InvalidPattern { pattern: String, err: String },

  #[error("index {index} is outside of the buffer")]
  InvalidIndex { index: Pos },

  #[error("no command bound to key {key}")]
  UnknownKey { key: String },

  #[error("unknown command {command}")]
  UnknownCommand { command: String },

  #[error("no search session for view {view}")]
  UnknownView { view: ViewId },

  #[error("bad escape sequence: {err}")]
  BadEscape { err: String },

  #[error("invalid request {req}: {err}")]
  InvalidRequest { req: String, err: String },

  #[error("cannot read file {file}: {err}")]
  CannotReadFile { file: PathBuf, err: io::Error },

  #[error("cannot write to file {file}: {err}")]
  CannotWriteFile { file: PathBuf, err: io::Error },

  #[error("cannot initialize logging: {err}")]
  LoggerInit {
    #[from]
    err: SetLoggerError,
  },

  #[error("configuration error: {err}")]
  ConfigError {
    #[from]
    err: ConfigError,
  },
}

impl OhNo {
  /// Whether the error leaves the session usable as-is.
  ///
  /// Every session-level condition is recoverable; only driver errors (I/O, logging, configuration) are not.
  pub fn is_recoverable(&self) -> bool {
    !matches!(
      self,
      OhNo::CannotReadFile { .. }
        | OhNo::CannotWriteFile { .. }
        | OhNo::LoggerInit { .. }
        | OhNo::ConfigError { .. }
    )
  }
}
