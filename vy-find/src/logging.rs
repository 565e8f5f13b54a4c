//! Logging related module.
//!
//! Everything is logged to stderr, as stdout is reserved to the buffer content.

use log::LevelFilter;
use simple_logger::SimpleLogger;

use crate::error::OhNo;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Verbosity {
  #[default]
  Off,
  Error,
  Warn,
  Info,
  Debug,
  Trace,
}

impl Verbosity {
  /// Map the number of `-v` flags to a verbosity.
  pub fn from_count(count: u8) -> Self {
    match count {
      0 => Self::Off,
      1 => Self::Error,
      2 => Self::Warn,
      3 => Self::Info,
      4 => Self::Debug,
      _ => Self::Trace,
    }
  }

  pub fn to_level_filter(self) -> LevelFilter {
    match self {
      Verbosity::Off => LevelFilter::Off,
      Verbosity::Error => LevelFilter::Error,
      Verbosity::Warn => LevelFilter::Warn,
      Verbosity::Info => LevelFilter::Info,
      Verbosity::Debug => LevelFilter::Debug,
      Verbosity::Trace => LevelFilter::Trace,
    }
  }

  /// Install the logger; nothing is installed when logging is off.
  pub fn init(self) -> Result<(), OhNo> {
    let level = self.to_level_filter();

    if level == LevelFilter::Off {
      return Ok(());
    }

    SimpleLogger::new()
      .with_level(level)
      .without_timestamps()
      .init()?;

    log::debug!("logging at {level}");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use log::LevelFilter;

  use super::Verbosity;

  #[test]
  fn verbosity_from_count() {
    assert_eq!(Verbosity::from_count(0), Verbosity::Off);
    assert_eq!(Verbosity::from_count(1), Verbosity::Error);
    assert_eq!(Verbosity::from_count(3), Verbosity::Info);
    assert_eq!(Verbosity::from_count(5), Verbosity::Trace);
    assert_eq!(Verbosity::from_count(42), Verbosity::Trace);
  }

  #[test]
  fn level_filters() {
    assert_eq!(Verbosity::default().to_level_filter(), LevelFilter::Off);
    assert_eq!(Verbosity::Warn.to_level_filter(), LevelFilter::Warn);
    assert_eq!(Verbosity::Debug.to_level_filter(), LevelFilter::Debug);

    // off never installs a logger, so this cannot clash with another test
    assert!(Verbosity::Off.init().is_ok());
  }
}
