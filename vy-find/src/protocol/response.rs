//! Responses sent back to the host.

use itertools::Itertools;

use crate::{
  input::Effect,
  text::{Pos, Span},
  views::ViewId,
};

/// Response sent back to the host after a request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Response {
  view: ViewId,
  payload: Payload,
}

impl Response {
  pub fn new(view: ViewId, payload: Payload) -> Self {
    Self { view, payload }
  }

  pub fn view(&self) -> &ViewId {
    &self.view
  }

  pub fn payload(&self) -> &Payload {
    &self.payload
  }

  /// Status line describing the response.
  pub fn to_status(&self) -> String {
    format!("[{view}] {payload}", view = self.view, payload = self.payload.to_status())
  }
}

/// Response payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Payload {
  /// The pattern prompt was opened, seeded with `default`.
  PromptOpened { default: String },

  /// The replacement changed; `entry` is its escaped form.
  ReplacementSet { entry: String },

  /// The cursor moved.
  CursorMoved { pos: Pos },

  /// The selection changed.
  SelectionChanged { sel: Option<Span> },

  /// A session command ran.
  ///
  /// `prompt_open` tells whether the pattern prompt is still open afterwards.
  Command { effect: Effect, prompt_open: bool },

  /// The view and its session are gone.
  ViewClosed,
}

impl Payload {
  pub fn to_status(&self) -> String {
    match self {
      Payload::PromptOpened { default } => format!("search: {default}"),
      Payload::ReplacementSet { entry } => format!("replacement: {entry}"),
      Payload::CursorMoved { pos } => format!("cursor at {pos}"),
      Payload::SelectionChanged { sel: Some(sel) } => format!("selected {sel}"),
      Payload::SelectionChanged { sel: None } => "no selection".to_owned(),

      Payload::Command {
        effect,
        prompt_open,
      } => {
        let status = Self::effect_status(effect);
        if *prompt_open {
          status
        } else {
          format!("{status} (prompt closed)")
        }
      }

      Payload::ViewClosed => "view closed".to_owned(),
    }
  }

  fn effect_status(effect: &Effect) -> String {
    match effect {
      Effect::Committed { pattern } => format!("pattern: {pattern}"),
      Effect::Cancelled => "search cancelled".to_owned(),
      Effect::Picked { span } => format!("match at {span}"),
      Effect::Highlighted { spans } if spans.is_empty() => "no match in selection".to_owned(),
      Effect::Highlighted { spans } => format!(
        "{count} matches: {spans}",
        count = spans.len(),
        spans = spans.iter().join(" ")
      ),
      Effect::ReplacedAnchor { span } => format!("replaced at {span}"),
      Effect::Replaced { count } => format!("{count} replaced"),
      Effect::Toggled { opt, value } => format!("{opt}={value}"),
    }
  }
}
