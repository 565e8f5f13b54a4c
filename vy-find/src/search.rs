//! Find/replace session.
//!
//! A [`SearchSession`] holds the pattern, the replacement, the anchor and the search options of a single view, and
//! drives the view’s [`TextModel`] in answer to user commands.

pub mod escape;
pub mod options;

use vy_find_config::Config;

use crate::{
  error::OhNo,
  input::{Command, Effect, InputCollector, KeyMap, Status},
  text::{Pos, RangeSelector, Span, TagStyle, TextModel, CATCHED_TAG},
};
use options::{SearchOpt, SearchOptions};

#[derive(Debug)]
pub struct SearchSession {
  /// Confirmed pattern; empty means no pattern.
  pattern: String,

  /// Unescaped replacement text.
  replacement: String,

  /// Last picked match, or the cursor position at session start.
  anchor: Option<Span>,

  options: SearchOptions,
  style: TagStyle,
  keys: KeyMap,
}

impl SearchSession {
  /// Create a session for a view, registering the match style with its model.
  pub fn new(
    model: &mut impl TextModel,
    style: TagStyle,
    options: SearchOptions,
    keys: KeyMap,
  ) -> Self {
    model.tag_configure(CATCHED_TAG, &style);

    Self {
      pattern: String::new(),
      replacement: String::new(),
      anchor: None,
      options,
      style,
      keys,
    }
  }

  pub fn from_config(model: &mut impl TextModel, config: &Config) -> Result<Self, OhNo> {
    let keys = KeyMap::from_config(&config.keys)?;
    Ok(Self::new(
      model,
      TagStyle::from(&config.highlight),
      config.options.into(),
      keys,
    ))
  }

  pub fn pattern(&self) -> &str {
    &self.pattern
  }

  pub fn replacement(&self) -> &str {
    &self.replacement
  }

  pub fn anchor(&self) -> Option<Span> {
    self.anchor
  }

  pub fn options(&self) -> &SearchOptions {
    &self.options
  }

  pub fn style(&self) -> &TagStyle {
    &self.style
  }

  pub fn keys(&self) -> &KeyMap {
    &self.keys
  }

  /// Begin a search.
  ///
  /// The anchor is reset to the cursor and previous highlights are dropped; the prompt is seeded with the current
  /// pattern. Pattern, replacement and options carry over from the previous search.
  pub fn start(
    &mut self,
    model: &mut impl TextModel,
    input: &mut impl InputCollector,
  ) -> Result<(), OhNo> {
    log::debug!("starting search session (pattern: {:?})", self.pattern);

    Self::clear_highlights(model)?;
    self.anchor = Some(Span::collapsed(model.cursor()));
    input.open(&self.pattern, &self.keys);

    Ok(())
  }

  /// Drop the pattern and every highlight.
  pub fn cancel(&mut self, model: &mut impl TextModel) -> Result<Effect, OhNo> {
    log::debug!("cancelling search session");

    Self::clear_highlights(model)?;
    self.pattern.clear();
    self.anchor = Some(Span::collapsed(model.cursor()));

    Ok(Effect::Cancelled)
  }

  /// Confirm the pattern typed in the prompt.
  pub fn commit_pattern(
    &mut self,
    model: &mut impl TextModel,
    candidate: &str,
  ) -> Result<Effect, OhNo> {
    log::debug!("committing pattern {candidate:?}");

    Self::clear_highlights(model)?;
    candidate.clone_into(&mut self.pattern);

    Ok(Effect::Committed {
      pattern: self.pattern.clone(),
    })
  }

  /// Replace the replacement text, as-is.
  pub fn set_replacement_data(&mut self, replacement: impl Into<String>) {
    self.replacement = replacement.into();
    log::debug!("replacement set to {:?}", self.replacement);
  }

  /// Replace the replacement text with the decoded content of the replacement prompt.
  ///
  /// The replacement is left untouched if `entry` has a bad escape sequence.
  pub fn set_replacement_from_entry(&mut self, entry: &str) -> Result<(), OhNo> {
    let replacement = escape::unescape(entry)?;
    self.set_replacement_data(replacement);
    Ok(())
  }

  /// Text to seed the replacement prompt with.
  pub fn replacement_entry(&self) -> String {
    escape::escape(&self.replacement)
  }

  /// Flip a search option and return its new value.
  pub fn toggle_option(&mut self, opt: SearchOpt) -> bool {
    let value = self.options.toggle(opt);
    log::debug!("{opt}={value}");
    value
  }

  /// Pick the first match starting at or after `from`.
  pub fn down(&mut self, model: &mut impl TextModel, from: Pos) -> Result<Span, OhNo> {
    self.ensure_pattern()?;

    let stop = model.end();
    let span = model
      .find_next(CATCHED_TAG, &self.pattern, from, stop, &self.options)?
      .ok_or(OhNo::NoMatch)?;
    log::trace!("picked {span} after {from}");

    self.anchor = Some(span);
    Ok(span)
  }

  /// Pick the last match starting before `from`.
  pub fn up(&mut self, model: &mut impl TextModel, from: Pos) -> Result<Span, OhNo> {
    self.ensure_pattern()?;

    let stop = model.start();
    let span = model
      .find_prev(CATCHED_TAG, &self.pattern, from, stop, &self.options)?
      .ok_or(OhNo::NoMatch)?;
    log::trace!("picked {span} before {from}");

    self.anchor = Some(span);
    Ok(span)
  }

  /// Highlight every match within the selection and return them.
  pub fn pick_matches(&mut self, model: &mut impl TextModel) -> Result<Vec<Span>, OhNo> {
    self.ensure_pattern()?;

    let selection = model.selection().ok_or(OhNo::InvalidRange)?;
    let spans = model.collect_matches(selection, &self.pattern, &self.options)?;
    model.apply_tag(CATCHED_TAG, &spans)?;
    log::trace!("{} matches in {selection}", spans.len());

    Ok(spans)
  }

  /// Replace the anchored match.
  ///
  /// Return the span of the inserted text. The anchor collapses at its end, so that the next replacement needs a new
  /// pick.
  pub fn replace_at_cursor(&mut self, model: &mut impl TextModel) -> Result<Span, OhNo> {
    self.ensure_pattern()?;

    let anchor = self
      .anchor
      .filter(|anchor| !anchor.is_collapsed())
      .ok_or(OhNo::NoMatch)?;
    let span = model
      .replace_span(&self.pattern, &self.replacement, anchor.start, &self.options)?
      .ok_or(OhNo::NoMatch)?;
    log::trace!("replaced {anchor} with {span}");

    self.anchor = Some(Span::collapsed(span.end));
    Ok(span)
  }

  /// Replace every match within the selection.
  pub fn replace_on_selection(&mut self, model: &mut impl TextModel) -> Result<usize, OhNo> {
    self.ensure_pattern()?;

    if model.selection().is_none() {
      return Err(OhNo::InvalidRange);
    }

    let count = model.replace_within_ranges(
      RangeSelector::Selection,
      &self.pattern,
      &self.replacement,
      &self.options,
    )?;
    log::trace!("replaced {count} matches in selection");

    Ok(count)
  }

  /// Replace every match of the buffer.
  pub fn replace_all_matches(&mut self, model: &mut impl TextModel) -> Result<usize, OhNo> {
    self.ensure_pattern()?;

    let (start, end) = (model.start(), model.end());
    let count = model.replace_all_in_range(
      &self.pattern,
      &self.replacement,
      start,
      end,
      &self.options,
    )?;
    log::trace!("replaced {count} matches");

    Ok(count)
  }

  /// Run a command coming from the prompt.
  ///
  /// `entry` is the live content of the prompt; only [`Command::ConfirmPattern`] reads it. Navigation starts from the
  /// model’s cursor. Toggles are reported on `status`.
  pub fn handle(
    &mut self,
    command: Command,
    entry: &str,
    model: &mut impl TextModel,
    status: &mut impl Status,
  ) -> Result<Effect, OhNo> {
    log::debug!("handling {command}");

    match command {
      Command::ConfirmPattern => self.commit_pattern(model, entry),
      Command::Cancel => self.cancel(model),

      Command::PickPrev => {
        let from = model.cursor();
        let span = self.up(model, from)?;
        Ok(Effect::Picked { span })
      }

      Command::PickNext => {
        let from = model.cursor();
        let span = self.down(model, from)?;
        Ok(Effect::Picked { span })
      }

      Command::Highlight => {
        let spans = self.pick_matches(model)?;
        Ok(Effect::Highlighted { spans })
      }

      Command::ReplaceAtCursor => {
        let span = self.replace_at_cursor(model)?;
        Ok(Effect::ReplacedAnchor { span })
      }

      Command::ReplaceInSelection => {
        let count = self.replace_on_selection(model)?;
        Ok(Effect::Replaced { count })
      }

      Command::ReplaceAll => {
        let count = self.replace_all_matches(model)?;
        Ok(Effect::Replaced { count })
      }

      Command::Toggle(opt) => {
        let value = self.toggle_option(opt);
        status.set_msg(&format!("{opt}={value}"));
        Ok(Effect::Toggled { opt, value })
      }
    }
  }

  /// Resolve a prompt key and run its command.
  pub fn handle_key(
    &mut self,
    key: &str,
    entry: &str,
    model: &mut impl TextModel,
    status: &mut impl Status,
  ) -> Result<Effect, OhNo> {
    let command = self.keys.resolve(key)?;
    self.handle(command, entry, model, status)
  }

  fn ensure_pattern(&self) -> Result<(), OhNo> {
    if self.pattern.is_empty() {
      Err(OhNo::NoPattern)
    } else {
      Ok(())
    }
  }

  fn clear_highlights(model: &mut impl TextModel) -> Result<(), OhNo> {
    let (start, end) = (model.start(), model.end());
    model.tag_remove(CATCHED_TAG, start, end)
  }
}
