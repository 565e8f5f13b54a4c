use std::collections::HashMap;

use vy_find_config::Config;

use crate::{
  error::OhNo,
  input::{Command, InputCollector, KeyMap, Outcome, Status},
  protocol::{
    request::{self, Request},
    response::{self, Response},
  },
  text::{memory::MemoryBuffer, TextModel},
  views::{ViewId, ViewSessions},
};

/// Pattern prompt of a view.
///
/// It only records whether it is open and what it was seeded with; the actual text comes with every request.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
  default: Option<String>,
  open: bool,
}

impl ScriptedPrompt {
  pub fn is_open(&self) -> bool {
    self.open
  }

  pub fn default_data(&self) -> Option<&str> {
    self.default.as_deref()
  }
}

impl InputCollector for ScriptedPrompt {
  fn open(&mut self, default: &str, keys: &KeyMap) {
    log::debug!(
      "prompt opened with {default:?}; confirm with {:?}",
      keys.keys_for(Command::ConfirmPattern)
    );
    self.default = Some(default.to_owned());
    self.open = true;
  }

  fn close(&mut self) {
    self.open = false;
  }
}

/// Status line keeping every message it was given.
#[derive(Debug, Default)]
pub struct StatusLine {
  messages: Vec<String>,
}

impl StatusLine {
  pub fn messages(&self) -> &[String] {
    &self.messages
  }
}

impl Status for StatusLine {
  fn set_msg(&mut self, msg: &str) {
    log::info!("{msg}");
    self.messages.push(msg.to_owned());
  }
}

/// Type responsible for handling requests.
///
/// It owns the buffer of every view, along with their prompt, and dispatches requests to the session of the view they
/// target.
#[derive(Debug)]
pub struct Handler {
  views: ViewSessions,
  buffers: HashMap<ViewId, MemoryBuffer>,
  prompts: HashMap<ViewId, ScriptedPrompt>,
  status: StatusLine,
}

impl Handler {
  pub fn new(config: Config) -> Result<Self, OhNo> {
    Ok(Self {
      views: ViewSessions::new(config)?,
      buffers: HashMap::new(),
      prompts: HashMap::new(),
      status: StatusLine::default(),
    })
  }

  /// Attach a buffer to a view.
  pub fn open_view(&mut self, view: ViewId, buffer: MemoryBuffer) {
    log::debug!("opening view {view}");
    self.buffers.insert(view, buffer);
  }

  pub fn buffer(&self, view: &ViewId) -> Option<&MemoryBuffer> {
    self.buffers.get(view)
  }

  pub fn take_buffer(&mut self, view: &ViewId) -> Option<MemoryBuffer> {
    self.prompts.remove(view);
    self.views.untrack(view);
    self.buffers.remove(view)
  }

  pub fn prompt(&self, view: &ViewId) -> Option<&ScriptedPrompt> {
    self.prompts.get(view)
  }

  pub fn status(&self) -> &StatusLine {
    &self.status
  }

  pub fn handle(&mut self, req: &Request) -> Result<Response, OhNo> {
    let view = req.view();
    log::debug!("request for view {view}: {:?}", req.payload());

    let buffer = self
      .buffers
      .get_mut(view)
      .ok_or_else(|| OhNo::UnknownView { view: view.clone() })?;

    let payload = match req.payload() {
      request::Payload::Begin => {
        let session = self.views.session_for(view, buffer)?;
        let prompt = self.prompts.entry(view.clone()).or_default();
        session.start(buffer, prompt)?;

        response::Payload::PromptOpened {
          default: session.pattern().to_owned(),
        }
      }

      request::Payload::SetReplacement { data } => {
        let session = self.views.session_for(view, buffer)?;
        session.set_replacement_from_entry(data)?;

        response::Payload::ReplacementSet {
          entry: session.replacement_entry(),
        }
      }

      request::Payload::MoveCursor { pos } => {
        buffer.set_cursor(*pos)?;
        response::Payload::CursorMoved {
          pos: buffer.cursor(),
        }
      }

      request::Payload::Select { sel } => {
        buffer.select(*sel)?;
        response::Payload::SelectionChanged {
          sel: buffer.selection(),
        }
      }

      request::Payload::ClearSelection => {
        buffer.clear_selection();
        response::Payload::SelectionChanged { sel: None }
      }

      request::Payload::Key { key, entry } => {
        let command = self.views.keys().resolve(key)?;
        self.run_command(view, command, entry)?
      }

      request::Payload::Command { command, entry } => self.run_command(view, *command, entry)?,

      request::Payload::CloseView => {
        self.views.untrack(view);
        self.prompts.remove(view);
        response::Payload::ViewClosed
      }
    };

    Ok(req.reply(payload))
  }

  fn run_command(
    &mut self,
    view: &ViewId,
    command: Command,
    entry: &str,
  ) -> Result<response::Payload, OhNo> {
    let buffer = self
      .buffers
      .get_mut(view)
      .ok_or_else(|| OhNo::UnknownView { view: view.clone() })?;
    let session = self.views.session_for(view, buffer)?;
    let prompt = self.prompts.entry(view.clone()).or_default();

    if !prompt.is_open() {
      log::debug!("{command} outside of an open prompt");
    }

    let effect = session.handle(command, entry, buffer, &mut self.status)?;
    if effect.outcome() == Outcome::Close {
      prompt.close();
    }

    Ok(response::Payload::Command {
      effect,
      prompt_open: prompt.is_open(),
    })
  }
}
