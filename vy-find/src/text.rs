//! Text model capability.
//!
//! A search session never touches buffer text itself. Matching, tagging and mutation all go through a [`TextModel`],
//! which is typically the editor widget a session is attached to. [`memory::MemoryBuffer`] is a complete in-memory
//! implementation.

pub mod memory;
pub mod pos;

pub use pos::{Pos, Span};
use vy_find_config::HighlightConfig;

use crate::{error::OhNo, search::options::SearchOptions};

/// Tag marking matched spans.
pub const CATCHED_TAG: &str = "(CATCHED)";

/// Tag marking elided (hidden) text.
pub const ELIDE_TAG: &str = "elide";

/// Visual style of a tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TagStyle {
  pub background: String,
  pub foreground: String,
}

impl From<&HighlightConfig> for TagStyle {
  fn from(config: &HighlightConfig) -> Self {
    Self {
      background: config.background.clone(),
      foreground: config.foreground.clone(),
    }
  }
}

/// Ranges a bulk replacement is restricted to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RangeSelector<'a> {
  /// The active selection.
  Selection,

  /// Every range tagged with the given name.
  Tag(&'a str),
}

/// Capabilities a buffer must offer to be driven by a search session.
///
/// Every pattern is interpreted under a [`SearchOptions`]. An invalid pattern is reported as
/// [`OhNo::InvalidPattern`], and a position outside of the buffer as [`OhNo::InvalidIndex`]; in both cases nothing is
/// modified.
pub trait TextModel {
  /// Register the visual style of a tag.
  fn tag_configure(&mut self, tag: &str, style: &TagStyle);

  /// Remove a tag from `[start, end)`.
  fn tag_remove(&mut self, tag: &str, start: Pos, end: Pos) -> Result<(), OhNo>;

  /// Find the first match starting at or after `from` and ending before `stop`.
  ///
  /// The match, if any, is tagged with `tag` (dropping any previous use of that tag) and the cursor moves to its end,
  /// so that searching forward again from the cursor finds the next match.
  fn find_next(
    &mut self,
    tag: &str,
    pattern: &str,
    from: Pos,
    stop: Pos,
    opts: &SearchOptions,
  ) -> Result<Option<Span>, OhNo>;

  /// Find the last match starting strictly before `from` and at or after `stop`.
  ///
  /// Tagging behaves as with [`TextModel::find_next`]; the cursor moves to the start of the match.
  fn find_prev(
    &mut self,
    tag: &str,
    pattern: &str,
    from: Pos,
    stop: Pos,
    opts: &SearchOptions,
  ) -> Result<Option<Span>, OhNo>;

  /// All matches lying entirely within `range`, in buffer order.
  fn collect_matches(
    &self,
    range: Span,
    pattern: &str,
    opts: &SearchOptions,
  ) -> Result<Vec<Span>, OhNo>;

  /// Tag exactly `spans` with `tag`, dropping any previous use of that tag.
  fn apply_tag(&mut self, tag: &str, spans: &[Span]) -> Result<(), OhNo>;

  /// Replace the match beginning exactly at `from`.
  ///
  /// Return the span of the inserted text, or [`None`] if no match begins there.
  fn replace_span(
    &mut self,
    pattern: &str,
    replacement: &str,
    from: Pos,
    opts: &SearchOptions,
  ) -> Result<Option<Span>, OhNo>;

  /// Replace every match within the selected ranges and return how many were replaced.
  ///
  /// The ranges follow the edits: a replacement of a different length moves the bounds of the ranges after it.
  fn replace_within_ranges(
    &mut self,
    ranges: RangeSelector,
    pattern: &str,
    replacement: &str,
    opts: &SearchOptions,
  ) -> Result<usize, OhNo>;

  /// Replace every match within `[start, end)` and return how many were replaced.
  fn replace_all_in_range(
    &mut self,
    pattern: &str,
    replacement: &str,
    start: Pos,
    end: Pos,
    opts: &SearchOptions,
  ) -> Result<usize, OhNo>;

  /// Position of the cursor.
  fn cursor(&self) -> Pos;

  /// The active selection, if any.
  fn selection(&self) -> Option<Span>;

  /// First position of the buffer.
  fn start(&self) -> Pos {
    Pos::START
  }

  /// Position right after the last character of the buffer.
  fn end(&self) -> Pos;
}
