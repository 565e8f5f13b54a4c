//! Requests that can be sent to the handler by the host.

use serde::{Deserialize, Serialize};

use crate::{
  error::OhNo,
  input::Command,
  text::{Pos, Span},
  views::ViewId,
};

use super::response::{self, Response};

/// Request.
#[derive(Debug, Deserialize, Serialize)]
pub struct Request {
  #[serde(default)]
  view: ViewId,
  payload: Payload,
}

impl Request {
  pub fn new(view: ViewId, payload: Payload) -> Self {
    Self { view, payload }
  }

  /// Parse a [`Request`] from a JSON string.
  pub fn from_json(s: impl AsRef<str>) -> Result<Self, OhNo> {
    let s = s.as_ref();
    serde_json::from_str(s).map_err(|err| OhNo::InvalidRequest {
      req: s.to_owned(),
      err: err.to_string(),
    })
  }

  /// Parse a JSON array of [`Request`].
  pub fn many_from_json(s: impl AsRef<str>) -> Result<Vec<Self>, OhNo> {
    let s = s.as_ref();
    serde_json::from_str(s).map_err(|err| OhNo::InvalidRequest {
      req: s.to_owned(),
      err: err.to_string(),
    })
  }

  pub fn view(&self) -> &ViewId {
    &self.view
  }

  pub fn payload(&self) -> &Payload {
    &self.payload
  }

  pub fn reply(&self, payload: response::Payload) -> Response {
    Response::new(self.view.clone(), payload)
  }
}

/// Request payload.
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
  /// Begin a search; this opens the pattern prompt.
  Begin,

  /// Set the replacement, as typed in the replacement prompt (escape sequences allowed).
  SetReplacement { data: String },

  /// Move the cursor of the view.
  MoveCursor { pos: Pos },

  /// Select a region of the view.
  Select { sel: Span },

  /// Drop the selection of the view.
  ClearSelection,

  /// A key stroke in the pattern prompt, along with the prompt content.
  Key {
    key: String,
    #[serde(default)]
    entry: String,
  },

  /// A command, bypassing key bindings.
  Command {
    command: Command,
    #[serde(default)]
    entry: String,
  },

  /// The view goes away; its session is dropped.
  CloseView,
}
