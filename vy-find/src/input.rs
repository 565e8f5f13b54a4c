//! Commands a search session answers to, and the host capabilities that deliver them.
//!
//! The host owns the key handling. It opens a single-line prompt (the [`InputCollector`]), translates key strokes to
//! [`Command`] through a [`KeyMap`], and feeds them to the session along with the live prompt content.

use std::{collections::HashMap, fmt, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use vy_find_config::KeysConfig;

use crate::{error::OhNo, search::options::SearchOpt, text::Span};

/// Every command a session registers with the prompt.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Command {
  ConfirmPattern,
  Cancel,
  PickPrev,
  PickNext,
  Highlight,
  ReplaceAtCursor,
  ReplaceInSelection,
  ReplaceAll,
  Toggle(SearchOpt),
}

impl Command {
  pub const ALL: [Command; 13] = [
    Command::ConfirmPattern,
    Command::Cancel,
    Command::PickPrev,
    Command::PickNext,
    Command::Highlight,
    Command::ReplaceAtCursor,
    Command::ReplaceInSelection,
    Command::ReplaceAll,
    Command::Toggle(SearchOpt::NoLineStop),
    Command::Toggle(SearchOpt::RegexExpr),
    Command::Toggle(SearchOpt::NoCase),
    Command::Toggle(SearchOpt::Exact),
    Command::Toggle(SearchOpt::Elide),
  ];
}

impl fmt::Display for Command {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Command::ConfirmPattern => f.write_str("confirm_pattern"),
      Command::Cancel => f.write_str("cancel"),
      Command::PickPrev => f.write_str("pick_prev"),
      Command::PickNext => f.write_str("pick_next"),
      Command::Highlight => f.write_str("highlight"),
      Command::ReplaceAtCursor => f.write_str("replace_at_cursor"),
      Command::ReplaceInSelection => f.write_str("replace_in_selection"),
      Command::ReplaceAll => f.write_str("replace_all"),
      Command::Toggle(opt) => write!(f, "toggle_{}", opt.name()),
    }
  }
}

impl FromStr for Command {
  type Err = OhNo;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|command| command.to_string() == s)
      .ok_or_else(|| OhNo::UnknownCommand {
        command: s.to_owned(),
      })
  }
}

impl TryFrom<String> for Command {
  type Error = OhNo;

  fn try_from(s: String) -> Result<Self, Self::Error> {
    s.parse()
  }
}

impl From<Command> for String {
  fn from(command: Command) -> Self {
    command.to_string()
  }
}

/// What the prompt should do once a command has been handled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
  /// Keep the prompt open.
  Continue,

  /// Close the prompt; the session state is kept for later commands.
  Close,
}

/// Result of a handled command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Effect {
  /// The pattern was confirmed.
  Committed { pattern: String },

  /// The session was cancelled.
  Cancelled,

  /// A match was picked and is now the anchor.
  Picked { span: Span },

  /// Matches within the selection were highlighted.
  Highlighted { spans: Vec<Span> },

  /// The anchored match was replaced; `span` covers the inserted text.
  ReplacedAnchor { span: Span },

  /// Several matches were replaced.
  Replaced { count: usize },

  /// An option was toggled.
  Toggled { opt: SearchOpt, value: bool },
}

impl Effect {
  pub fn outcome(&self) -> Outcome {
    match self {
      Effect::Committed { .. } | Effect::Cancelled => Outcome::Close,
      _ => Outcome::Continue,
    }
  }
}

/// Host prompt used to collect text from the user.
pub trait InputCollector {
  /// Open a single-line prompt seeded with `default`, dispatching the keys of `keys`.
  fn open(&mut self, default: &str, keys: &KeyMap);

  /// Close the prompt.
  fn close(&mut self);
}

/// Host status line.
pub trait Status {
  fn set_msg(&mut self, msg: &str);
}

/// Mapping between key names and commands.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyMap {
  begin: String,
  set_replacement: String,
  prompt: HashMap<String, Command>,
}

impl KeyMap {
  /// Build the key map from configuration, rejecting keys bound to unknown commands.
  pub fn from_config(config: &KeysConfig) -> Result<Self, OhNo> {
    let prompt = config
      .prompt
      .iter()
      .map(|(key, command)| Ok((key.clone(), command.trim().parse::<Command>()?)))
      .collect::<Result<HashMap<_, _>, OhNo>>()?;

    Ok(Self {
      begin: config.begin.clone(),
      set_replacement: config.set_replacement.clone(),
      prompt,
    })
  }

  /// Key beginning a search in the host view.
  pub fn begin(&self) -> &str {
    &self.begin
  }

  /// Key setting the replacement in the host view.
  pub fn set_replacement(&self) -> &str {
    &self.set_replacement
  }

  /// Find the command bound to a prompt key.
  pub fn resolve(&self, key: &str) -> Result<Command, OhNo> {
    self
      .prompt
      .get(key)
      .copied()
      .ok_or_else(|| OhNo::UnknownKey {
        key: key.to_owned(),
      })
  }

  /// Keys bound to a command, sorted.
  pub fn keys_for(&self, command: Command) -> Vec<&str> {
    self
      .prompt
      .iter()
      .filter(|(_, bound)| **bound == command)
      .map(|(key, _)| key.as_str())
      .sorted()
      .collect()
  }

  /// Prompt bindings, sorted by key.
  pub fn bindings(&self) -> impl Iterator<Item = (&str, Command)> {
    self
      .prompt
      .iter()
      .map(|(key, command)| (key.as_str(), *command))
      .sorted_by(|a, b| a.0.cmp(b.0))
  }
}

#[cfg(test)]
mod tests {
  use vy_find_config::{Config, KeysConfig};

  use super::{Command, Effect, KeyMap, Outcome};
  use crate::{error::OhNo, search::options::SearchOpt};

  #[test]
  fn command_names() {
    for command in Command::ALL {
      assert_eq!(command.to_string().parse::<Command>().unwrap(), command);
    }

    assert_eq!(
      "toggle_no_line_stop".parse::<Command>().unwrap(),
      Command::Toggle(SearchOpt::NoLineStop)
    );
    assert!(matches!(
      "toggle_everything".parse::<Command>(),
      Err(OhNo::UnknownCommand { .. })
    ));
    assert_eq!(
      serde_json::from_str::<Command>("\"replace_all\"").unwrap(),
      Command::ReplaceAll
    );
  }

  #[test]
  fn config_knows_every_command() {
    let names = Command::ALL.map(|command| command.to_string());
    assert_eq!(names, KeysConfig::COMMANDS.map(str::to_owned));
  }

  #[test]
  fn outcomes() {
    assert_eq!(
      Effect::Committed {
        pattern: "x".to_owned()
      }
      .outcome(),
      Outcome::Close
    );
    assert_eq!(Effect::Cancelled.outcome(), Outcome::Close);
    assert_eq!(Effect::Replaced { count: 0 }.outcome(), Outcome::Continue);
  }

  #[test]
  fn default_key_map() {
    let config = Config::load_default_config().unwrap();
    let keys = KeyMap::from_config(&config.keys).unwrap();

    assert_eq!(keys.resolve("<Return>").unwrap(), Command::ConfirmPattern);
    assert_eq!(keys.resolve("<Alt-o>").unwrap(), Command::PickPrev);
    assert_eq!(keys.resolve("<Alt-p>").unwrap(), Command::PickNext);
    assert_eq!(
      keys.resolve("<Control-n>").unwrap(),
      Command::Toggle(SearchOpt::NoCase)
    );
    assert!(matches!(keys.resolve("<F1>"), Err(OhNo::UnknownKey { .. })));
    assert_eq!(keys.begin(), "<Alt-slash>");
    assert_eq!(keys.set_replacement(), "<Alt-bracketright>");

    // every command is reachable from the default bindings
    for command in Command::ALL {
      assert!(!keys.keys_for(command).is_empty(), "{command} is not bound");
    }
  }

  #[test]
  fn unknown_command_in_config() {
    let mut config = Config::load_default_config().unwrap();
    config
      .keys
      .prompt
      .insert("<F2>".to_owned(), "explode".to_owned());

    assert!(matches!(
      KeyMap::from_config(&config.keys),
      Err(OhNo::UnknownCommand { command }) if command == "explode"
    ));
  }
}
