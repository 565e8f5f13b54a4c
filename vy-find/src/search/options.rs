//! Search options.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use vy_find_config::OptionsConfig;

/// The five switches a pattern is matched under.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SearchOptions {
  /// Matches may span line boundaries.
  pub no_line_stop: bool,

  /// The pattern is a regular expression; otherwise it is literal text.
  pub regex_expr: bool,

  /// Case-insensitive matching.
  pub no_case: bool,

  /// Whole-word matching.
  pub exact: bool,

  /// Elided (hidden) text is part of the search space.
  pub elide: bool,
}

impl Default for SearchOptions {
  fn default() -> Self {
    OptionsConfig::default().into()
  }
}

impl From<OptionsConfig> for SearchOptions {
  fn from(config: OptionsConfig) -> Self {
    Self {
      no_line_stop: config.no_line_stop,
      regex_expr: config.regex_expr,
      no_case: config.no_case,
      exact: config.exact,
      elide: config.elide,
    }
  }
}

impl SearchOptions {
  pub fn get(&self, opt: SearchOpt) -> bool {
    match opt {
      SearchOpt::NoLineStop => self.no_line_stop,
      SearchOpt::RegexExpr => self.regex_expr,
      SearchOpt::NoCase => self.no_case,
      SearchOpt::Exact => self.exact,
      SearchOpt::Elide => self.elide,
    }
  }

  /// Flip a single option and return its new value.
  pub fn toggle(&mut self, opt: SearchOpt) -> bool {
    let flag = match opt {
      SearchOpt::NoLineStop => &mut self.no_line_stop,
      SearchOpt::RegexExpr => &mut self.regex_expr,
      SearchOpt::NoCase => &mut self.no_case,
      SearchOpt::Exact => &mut self.exact,
      SearchOpt::Elide => &mut self.elide,
    };

    *flag = !*flag;
    *flag
  }
}

/// Name of a single search option.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOpt {
  NoLineStop,
  RegexExpr,
  NoCase,
  Exact,
  Elide,
}

impl SearchOpt {
  pub const ALL: [SearchOpt; 5] = [
    SearchOpt::NoLineStop,
    SearchOpt::RegexExpr,
    SearchOpt::NoCase,
    SearchOpt::Exact,
    SearchOpt::Elide,
  ];

  /// Label used in status messages.
  pub fn label(self) -> &'static str {
    match self {
      SearchOpt::NoLineStop => "nolinestop",
      SearchOpt::RegexExpr => "regexp",
      SearchOpt::NoCase => "nocase",
      SearchOpt::Exact => "exact",
      SearchOpt::Elide => "elide",
    }
  }

  /// Name as found in configuration and requests.
  pub fn name(self) -> &'static str {
    match self {
      SearchOpt::NoLineStop => "no_line_stop",
      SearchOpt::RegexExpr => "regex_expr",
      SearchOpt::NoCase => "no_case",
      SearchOpt::Exact => "exact",
      SearchOpt::Elide => "elide",
    }
  }
}

impl fmt::Display for SearchOpt {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for SearchOpt {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|opt| opt.name() == s)
      .ok_or(())
  }
}

#[cfg(test)]
mod tests {
  use super::{SearchOpt, SearchOptions};

  #[test]
  fn defaults() {
    let opts = SearchOptions::default();
    assert!(!opts.no_line_stop);
    assert!(opts.regex_expr);
    assert!(opts.no_case);
    assert!(!opts.exact);
    assert!(!opts.elide);
  }

  #[test]
  fn toggle_touches_one_option() {
    for opt in SearchOpt::ALL {
      let before = SearchOptions::default();
      let mut after = before;
      let value = after.toggle(opt);

      assert_eq!(value, !before.get(opt));
      assert_eq!(after.get(opt), value);

      for other in SearchOpt::ALL.into_iter().filter(|other| *other != opt) {
        assert_eq!(after.get(other), before.get(other));
      }
    }
  }

  #[test]
  fn toggle_twice_restores() {
    for opt in SearchOpt::ALL {
      let mut opts = SearchOptions::default();
      opts.toggle(opt);
      opts.toggle(opt);
      assert_eq!(opts, SearchOptions::default());
    }
  }

  #[test]
  fn names() {
    assert_eq!("no_case".parse::<SearchOpt>(), Ok(SearchOpt::NoCase));
    assert!("nocase".parse::<SearchOpt>().is_err());
    assert_eq!(SearchOpt::NoLineStop.to_string(), "nolinestop");
    assert_eq!(
      serde_json::from_str::<SearchOpt>("\"regex_expr\"").unwrap(),
      SearchOpt::RegexExpr
    );
  }
}
