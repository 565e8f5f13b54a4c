//! Per-view session tracking.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use vy_find_config::Config;

use crate::{
  error::OhNo,
  input::KeyMap,
  search::SearchSession,
  text::{TagStyle, TextModel},
};

/// A unique way to identify a text view.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ViewId(String);

impl ViewId {
  pub fn new(name: impl Into<String>) -> Self {
    Self(name.into())
  }

  pub fn name(&self) -> &str {
    &self.0
  }
}

impl Default for ViewId {
  fn default() -> Self {
    Self::new("main")
  }
}

impl fmt::Display for ViewId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Session tracker.
///
/// Responsible for keeping exactly one [`SearchSession`] per view. Sessions are created lazily, the first time a view
/// needs one, and live until the view goes away. Key bindings are resolved once, up front, and shared by every session.
#[derive(Debug)]
pub struct ViewSessions {
  config: Config,
  keys: KeyMap,
  sessions: HashMap<ViewId, SearchSession>,
}

impl ViewSessions {
  pub fn new(config: Config) -> Result<Self, OhNo> {
    let keys = KeyMap::from_config(&config.keys)?;

    Ok(Self {
      config,
      keys,
      sessions: HashMap::new(),
    })
  }

  pub fn keys(&self) -> &KeyMap {
    &self.keys
  }

  pub fn is_empty(&self) -> bool {
    self.sessions.is_empty()
  }

  /// Check whether a view already has a session.
  pub fn tracks(&self, view: &ViewId) -> bool {
    self.sessions.contains_key(view)
  }

  /// Get the session of a view, creating it if needed.
  pub fn session_for(
    &mut self,
    view: &ViewId,
    model: &mut impl TextModel,
  ) -> Result<&mut SearchSession, OhNo> {
    if !self.sessions.contains_key(view) {
      log::debug!("creating search session for view {view}");
      let session = SearchSession::new(
        model,
        TagStyle::from(&self.config.highlight),
        self.config.options.into(),
        self.keys.clone(),
      );
      self.sessions.insert(view.clone(), session);
    }

    self
      .sessions
      .get_mut(view)
      .ok_or_else(|| OhNo::UnknownView { view: view.clone() })
  }

  /// Get the session of a view that must already have one.
  pub fn get_mut(&mut self, view: &ViewId) -> Result<&mut SearchSession, OhNo> {
    self
      .sessions
      .get_mut(view)
      .ok_or_else(|| OhNo::UnknownView { view: view.clone() })
  }

  /// Drop the session of a view.
  pub fn untrack(&mut self, view: &ViewId) -> Option<SearchSession> {
    log::debug!("dropping search session for view {view}");
    self.sessions.remove(view)
  }

  pub fn views(&self) -> impl Iterator<Item = &ViewId> {
    self.sessions.keys()
  }
}

#[cfg(test)]
mod tests {
  use vy_find_config::Config;

  use super::{ViewId, ViewSessions};
  use crate::{error::OhNo, text::memory::MemoryBuffer};

  #[test]
  fn one_session_per_view() {
    let mut views = ViewSessions::new(Config::load_default_config().unwrap()).unwrap();
    let mut left = MemoryBuffer::new("left");
    let mut right = MemoryBuffer::new("right");
    let (a, b) = (ViewId::new("a"), ViewId::new("b"));

    assert!(views.is_empty());
    assert!(matches!(views.get_mut(&a), Err(OhNo::UnknownView { .. })));

    views
      .session_for(&a, &mut left)
      .unwrap()
      .commit_pattern(&mut left, "l")
      .unwrap();
    views.session_for(&b, &mut right).unwrap();

    // the same view gets its session back, not a new one
    assert_eq!(views.session_for(&a, &mut left).unwrap().pattern(), "l");
    assert_eq!(views.get_mut(&b).unwrap().pattern(), "");
    assert_eq!(views.views().count(), 2);

    assert!(views.untrack(&a).is_some());
    assert!(!views.tracks(&a));
    assert!(views.tracks(&b));
  }

  #[test]
  fn bad_bindings_fail_before_any_session() {
    let mut config = Config::load_default_config().unwrap();
    config
      .keys
      .prompt
      .insert("<F2>".to_owned(), "pick_nxt".to_owned());

    assert!(matches!(
      ViewSessions::new(config),
      Err(OhNo::UnknownCommand { command }) if command == "pick_nxt"
    ));
  }

  #[test]
  fn view_ids() {
    assert_eq!(ViewId::default().name(), "main");
    assert_eq!(
      serde_json::from_str::<ViewId>("\"side\"").unwrap(),
      ViewId::new("side")
    );
  }
}
