//! In-memory text model.

use std::{collections::HashMap, ops::Range};

use itertools::Itertools;
use regex::{Regex, RegexBuilder};
use unicode_segmentation::UnicodeSegmentation;

use super::{Pos, RangeSelector, Span, TagStyle, TextModel, ELIDE_TAG};
use crate::{error::OhNo, search::options::SearchOptions};

/// A [`TextModel`] over a plain string.
///
/// Positions are stored as byte offsets and converted to and from [`Pos`] on the fly. Tags, the cursor and the
/// selection follow the edits made to the text.
#[derive(Clone, Debug, Default)]
pub struct MemoryBuffer {
  text: String,
  cursor: usize,
  selection: Option<Range<usize>>,
  tags: HashMap<String, Vec<Range<usize>>>,
  styles: HashMap<String, TagStyle>,
}

impl MemoryBuffer {
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      ..Self::default()
    }
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn into_text(self) -> String {
    self.text
  }

  pub fn set_cursor(&mut self, pos: Pos) -> Result<(), OhNo> {
    self.cursor = self.byte_of(pos)?;
    Ok(())
  }

  /// Select `span`; selecting an empty span clears the selection.
  pub fn select(&mut self, span: Span) -> Result<(), OhNo> {
    let range = self.range_of(span)?;
    self.selection = (!range.is_empty()).then_some(range);
    Ok(())
  }

  pub fn clear_selection(&mut self) {
    self.selection = None;
  }

  /// Add `span` to the ranges tagged with `tag`.
  pub fn tag_add(&mut self, tag: &str, span: Span) -> Result<(), OhNo> {
    let range = self.range_of(span)?;

    if !range.is_empty() {
      let ranges = self.tags.entry(tag.to_owned()).or_default();
      ranges.push(range);
      ranges.sort_by_key(|range| (range.start, range.end));
    }

    Ok(())
  }

  /// Spans currently tagged with `tag`, in buffer order.
  pub fn tagged(&self, tag: &str) -> Vec<Span> {
    self
      .tags
      .get(tag)
      .map(|ranges| self.spans_of(ranges))
      .unwrap_or_default()
  }

  pub fn tag_style(&self, tag: &str) -> Option<&TagStyle> {
    self.styles.get(tag)
  }

  /// Lines of the buffer along with the byte offset they start at.
  fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
    self.text.split('\n').scan(0, |offset, line| {
      let start = *offset;
      *offset += line.len() + 1;
      Some((start, line))
    })
  }

  /// Convert a position to a byte offset.
  ///
  /// Columns past the end of a line stick to the end of that line; lines past the end of the buffer are an error.
  fn byte_of(&self, pos: Pos) -> Result<usize, OhNo> {
    let (start, line) = pos
      .line
      .checked_sub(1)
      .and_then(|idx| self.lines().nth(idx))
      .ok_or(OhNo::InvalidIndex { index: pos })?;

    let col = line
      .grapheme_indices(true)
      .nth(pos.col)
      .map(|(idx, _)| idx)
      .unwrap_or(line.len());

    Ok(start + col)
  }

  /// Convert a byte offset to a position.
  fn pos_of(&self, byte: usize) -> Pos {
    let before = &self.text[..byte.min(self.text.len())];
    let line_start = before.rfind('\n').map(|idx| idx + 1).unwrap_or(0);

    Pos {
      line: before.matches('\n').count() + 1,
      col: before[line_start..].graphemes(true).count(),
    }
  }

  fn range_of(&self, span: Span) -> Result<Range<usize>, OhNo> {
    Ok(self.byte_of(span.start)?..self.byte_of(span.end)?)
  }

  fn span_of(&self, range: &Range<usize>) -> Span {
    Span::new(self.pos_of(range.start), self.pos_of(range.end))
  }

  /// Convert many ranges at once, walking the text a single time.
  fn spans_of(&self, ranges: &[Range<usize>]) -> Vec<Span> {
    let mut offsets = ranges
      .iter()
      .flat_map(|range| [range.start, range.end])
      .sorted()
      .dedup()
      .peekable();
    let mut positions = HashMap::new();

    for (idx, (start, line)) in self.lines().enumerate() {
      let end = start + line.len();
      let mut graphemes = line
        .grapheme_indices(true)
        .map(|(col, _)| start + col)
        .peekable();
      let mut col = 0;

      while let Some(offset) = offsets.next_if(|offset| *offset <= end) {
        while graphemes.next_if(|grapheme| *grapheme < offset).is_some() {
          col += 1;
        }

        positions.insert(offset, Pos::new(idx + 1, col));
      }
    }

    let end = self.end();
    let pos_at = |offset: usize| positions.get(&offset).copied().unwrap_or(end);

    ranges
      .iter()
      .map(|range| Span::new(pos_at(range.start), pos_at(range.end)))
      .collect()
  }

  /// Byte offsets a column can point at: grapheme starts and line ends, in order.
  fn boundaries(&self) -> Vec<usize> {
    self
      .lines()
      .flat_map(|(start, line)| {
        line
          .grapheme_indices(true)
          .map(move |(col, _)| start + col)
          .chain([start + line.len()])
      })
      .collect()
  }

  /// Every non-empty match of `pattern` in the buffer, in buffer order.
  fn matches(&self, pattern: &str, opts: &SearchOptions) -> Result<Vec<Range<usize>>, OhNo> {
    let regex = compile(pattern, opts)?;
    let mut found = Vec::new();

    if opts.no_line_stop {
      found.extend(regex.find_iter(&self.text).map(|m| m.range()));
    } else {
      for (offset, line) in self.lines() {
        found.extend(
          regex
            .find_iter(line)
            .map(|m| offset + m.start()..offset + m.end()),
        );
      }
    }

    // a match cutting through a grapheme cluster cannot be expressed in columns
    let boundaries = self.boundaries();
    found.retain(|range| {
      !range.is_empty()
        && boundaries.binary_search(&range.start).is_ok()
        && boundaries.binary_search(&range.end).is_ok()
    });

    if !opts.elide {
      if let Some(elided) = self.tags.get(ELIDE_TAG) {
        found.retain(|range| !elided.iter().any(|hidden| overlaps(range, hidden)));
      }
    }

    Ok(found)
  }

  /// Make `range` the only range tagged with `tag` and move the cursor to the given end of it.
  fn pick(&mut self, tag: &str, range: Option<Range<usize>>, forward: bool) -> Option<Span> {
    let range = range?;
    let span = self.span_of(&range);

    self.cursor = if forward { range.end } else { range.start };
    self.tags.insert(tag.to_owned(), vec![range]);

    Some(span)
  }

  /// Replace `range` with `with`, moving the cursor, the selection and the tags accordingly.
  fn edit(&mut self, range: Range<usize>, with: &str) {
    let inserted_end = range.start + with.len();
    let shift = |p: usize| {
      if p <= range.start {
        p
      } else if p >= range.end {
        p - range.end + inserted_end
      } else {
        range.start
      }
    };

    self.text.replace_range(range.clone(), with);
    self.cursor = shift(self.cursor);
    self.selection = self
      .selection
      .take()
      .map(|sel| shift(sel.start)..shift(sel.end))
      .filter(|sel| !sel.is_empty());

    for ranges in self.tags.values_mut() {
      // tagged text that is entirely replaced loses its tag
      ranges.retain(|tagged| !(range.start <= tagged.start && tagged.end <= range.end));

      for tagged in ranges.iter_mut() {
        *tagged = shift(tagged.start)..shift(tagged.end);
      }

      ranges.retain(|tagged| !tagged.is_empty());
    }
  }

  /// Replace all `targets`, last first so that earlier offsets stay valid.
  fn replace_ranges(&mut self, mut targets: Vec<Range<usize>>, with: &str) -> usize {
    targets.sort_by_key(|range| (range.start, range.end));
    targets.dedup();

    for range in targets.iter().rev() {
      self.edit(range.clone(), with);
    }

    targets.len()
  }
}

/// Build the regex matching `pattern` under `opts`.
fn compile(pattern: &str, opts: &SearchOptions) -> Result<Regex, OhNo> {
  let source = if opts.regex_expr {
    pattern.to_owned()
  } else {
    regex::escape(pattern)
  };

  let source = if opts.exact {
    format!(r"\b(?:{source})\b")
  } else {
    source
  };

  RegexBuilder::new(&source)
    .case_insensitive(opts.no_case)
    .multi_line(true)
    .dot_matches_new_line(opts.no_line_stop)
    .build()
    .map_err(|err| OhNo::InvalidPattern {
      pattern: pattern.to_owned(),
      err: err.to_string(),
    })
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
  a.start < b.end && b.start < a.end
}

fn within(outer: &Range<usize>, inner: &Range<usize>) -> bool {
  outer.start <= inner.start && inner.end <= outer.end
}

impl TextModel for MemoryBuffer {
  fn tag_configure(&mut self, tag: &str, style: &TagStyle) {
    log::trace!("configuring tag {tag}: {style:?}");
    self.styles.insert(tag.to_owned(), style.clone());
  }

  fn tag_remove(&mut self, tag: &str, start: Pos, end: Pos) -> Result<(), OhNo> {
    let (a, b) = (self.byte_of(start)?, self.byte_of(end)?);
    let (start, end) = (a.min(b), a.max(b));

    if let Some(ranges) = self.tags.get_mut(tag) {
      let previous = std::mem::take(ranges);
      *ranges = previous
        .into_iter()
        .flat_map(|tagged| {
          let left = tagged.start..tagged.end.min(start);
          let right = tagged.start.max(end)..tagged.end;
          [left, right]
        })
        .filter(|part| !part.is_empty())
        .collect();
    }

    Ok(())
  }

  fn find_next(
    &mut self,
    tag: &str,
    pattern: &str,
    from: Pos,
    stop: Pos,
    opts: &SearchOptions,
  ) -> Result<Option<Span>, OhNo> {
    let (from, stop) = (self.byte_of(from)?, self.byte_of(stop)?);
    let found = self
      .matches(pattern, opts)?
      .into_iter()
      .find(|m| m.start >= from && m.end <= stop);

    Ok(self.pick(tag, found, true))
  }

  fn find_prev(
    &mut self,
    tag: &str,
    pattern: &str,
    from: Pos,
    stop: Pos,
    opts: &SearchOptions,
  ) -> Result<Option<Span>, OhNo> {
    let (from, stop) = (self.byte_of(from)?, self.byte_of(stop)?);
    let found = self
      .matches(pattern, opts)?
      .into_iter()
      .rev()
      .find(|m| m.start < from && m.start >= stop);

    Ok(self.pick(tag, found, false))
  }

  fn collect_matches(
    &self,
    range: Span,
    pattern: &str,
    opts: &SearchOptions,
  ) -> Result<Vec<Span>, OhNo> {
    let range = self.range_of(range)?;
    let found = self
      .matches(pattern, opts)?
      .into_iter()
      .filter(|m| within(&range, m))
      .collect_vec();

    Ok(self.spans_of(&found))
  }

  fn apply_tag(&mut self, tag: &str, spans: &[Span]) -> Result<(), OhNo> {
    let mut ranges = spans
      .iter()
      .map(|span| self.range_of(*span))
      .collect::<Result<Vec<_>, _>>()?;
    ranges.retain(|range| !range.is_empty());
    ranges.sort_by_key(|range| (range.start, range.end));

    self.tags.insert(tag.to_owned(), ranges);
    Ok(())
  }

  fn replace_span(
    &mut self,
    pattern: &str,
    replacement: &str,
    from: Pos,
    opts: &SearchOptions,
  ) -> Result<Option<Span>, OhNo> {
    let from = self.byte_of(from)?;
    let Some(found) = self
      .matches(pattern, opts)?
      .into_iter()
      .find(|m| m.start == from)
    else {
      return Ok(None);
    };

    self.edit(found, replacement);
    Ok(Some(self.span_of(&(from..from + replacement.len()))))
  }

  fn replace_within_ranges(
    &mut self,
    ranges: RangeSelector,
    pattern: &str,
    replacement: &str,
    opts: &SearchOptions,
  ) -> Result<usize, OhNo> {
    let ranges = match ranges {
      RangeSelector::Selection => self.selection.iter().cloned().collect(),
      RangeSelector::Tag(tag) => self.tags.get(tag).cloned().unwrap_or_default(),
    };

    let targets = self
      .matches(pattern, opts)?
      .into_iter()
      .filter(|m| ranges.iter().any(|range| within(range, m)))
      .collect();

    Ok(self.replace_ranges(targets, replacement))
  }

  fn replace_all_in_range(
    &mut self,
    pattern: &str,
    replacement: &str,
    start: Pos,
    end: Pos,
    opts: &SearchOptions,
  ) -> Result<usize, OhNo> {
    let range = self.range_of(Span::new(start, end))?;
    let targets = self
      .matches(pattern, opts)?
      .into_iter()
      .filter(|m| within(&range, m))
      .collect();

    Ok(self.replace_ranges(targets, replacement))
  }

  fn cursor(&self) -> Pos {
    self.pos_of(self.cursor)
  }

  fn selection(&self) -> Option<Span> {
    self.selection.as_ref().map(|sel| self.span_of(sel))
  }

  fn end(&self) -> Pos {
    self.pos_of(self.text.len())
  }
}

#[cfg(test)]
mod tests {
  use super::MemoryBuffer;
  use crate::{
    error::OhNo,
    search::options::SearchOptions,
    text::{Pos, RangeSelector, Span, TextModel, CATCHED_TAG, ELIDE_TAG},
  };

  fn span(a: (usize, usize), b: (usize, usize)) -> Span {
    Span::new(Pos::new(a.0, a.1), Pos::new(b.0, b.1))
  }

  fn literal() -> SearchOptions {
    SearchOptions {
      regex_expr: false,
      no_case: false,
      ..SearchOptions::default()
    }
  }

  #[test]
  fn positions() {
    let buf = MemoryBuffer::new("héllo\nwörld\n");

    assert_eq!(buf.end(), Pos::new(3, 0));
    assert_eq!(buf.byte_of(Pos::new(1, 2)).unwrap(), 3);
    assert_eq!(buf.byte_of(Pos::new(2, 2)).unwrap(), 10);
    assert_eq!(buf.pos_of(10), Pos::new(2, 2));
    assert_eq!(buf.byte_of(Pos::new(1, 99)).unwrap(), 6);
    assert!(matches!(
      buf.byte_of(Pos::new(4, 0)),
      Err(OhNo::InvalidIndex { .. })
    ));
  }

  #[test]
  fn grapheme_columns() {
    // e followed by a combining acute accent is a single column
    let buf = MemoryBuffer::new("e\u{301}x");
    assert_eq!(buf.end(), Pos::new(1, 2));
    assert_eq!(buf.byte_of(Pos::new(1, 1)).unwrap(), 3);
  }

  #[test]
  fn find_moves_cursor_and_tag() {
    let mut buf = MemoryBuffer::new("foo bar foo\nfoo");
    let opts = literal();
    let end = buf.end();

    // a match right at the starting position is found
    let first = buf
      .find_next(CATCHED_TAG, "foo", Pos::START, end, &opts)
      .unwrap();
    assert_eq!(first, Some(span((1, 0), (1, 3))));
    assert_eq!(buf.cursor(), Pos::new(1, 3));
    assert_eq!(buf.tagged(CATCHED_TAG), vec![span((1, 0), (1, 3))]);

    let second = buf
      .find_next(CATCHED_TAG, "foo", buf.cursor(), end, &opts)
      .unwrap();
    assert_eq!(second, Some(span((1, 8), (1, 11))));
    assert_eq!(buf.tagged(CATCHED_TAG), vec![span((1, 8), (1, 11))]);

    let third = buf
      .find_next(CATCHED_TAG, "foo", buf.cursor(), end, &opts)
      .unwrap();
    assert_eq!(third, Some(span((2, 0), (2, 3))));
    assert_eq!(buf.cursor(), Pos::new(2, 3));

    let none = buf
      .find_next(CATCHED_TAG, "foo", buf.cursor(), end, &opts)
      .unwrap();
    assert_eq!(none, None);
    assert_eq!(buf.cursor(), Pos::new(2, 3));

    // backward picks leave the cursor at the match start
    let back = buf
      .find_prev(CATCHED_TAG, "foo", buf.cursor(), Pos::START, &opts)
      .unwrap();
    assert_eq!(back, Some(span((2, 0), (2, 3))));
    assert_eq!(buf.cursor(), Pos::new(2, 0));

    let back = buf
      .find_prev(CATCHED_TAG, "foo", buf.cursor(), Pos::START, &opts)
      .unwrap();
    assert_eq!(back, Some(span((1, 8), (1, 11))));
    assert_eq!(buf.tagged(CATCHED_TAG), vec![span((1, 8), (1, 11))]);
  }

  #[test]
  fn matches_stop_at_grapheme_boundaries() {
    let buf = MemoryBuffer::new("e\u{301}x e");
    let all = span((1, 0), (1, 4));
    let opts = literal();

    // the accent alone and the bare e both cut through the first cluster
    assert!(buf.collect_matches(all, "\u{301}", &opts).unwrap().is_empty());
    assert_eq!(
      buf.collect_matches(all, "e", &opts).unwrap(),
      vec![span((1, 3), (1, 4))]
    );
    assert_eq!(
      buf.collect_matches(all, "e\u{301}", &opts).unwrap(),
      vec![span((1, 0), (1, 1))]
    );
    assert_eq!(
      buf.collect_matches(all, "x", &opts).unwrap(),
      vec![span((1, 1), (1, 2))]
    );
  }

  #[test]
  fn bulk_positions_agree_with_single_ones() {
    let mut buf = MemoryBuffer::new("héllo\nwörld e\u{301}\n\nlast");
    let spans = [
      span((1, 1), (2, 3)),
      span((2, 0), (2, 5)),
      span((2, 6), (2, 7)),
      span((3, 0), (4, 2)),
      span((4, 4), (4, 4)),
    ];

    for s in spans {
      buf.tag_add("t", s).unwrap();
    }

    let ranges = buf.tags["t"].clone();
    let one_by_one = ranges.iter().map(|range| buf.span_of(range)).collect::<Vec<_>>();
    assert_eq!(buf.tagged("t"), one_by_one);
    assert_eq!(buf.tagged("t").len(), 4);
  }

  #[test]
  fn options() {
    let buf = MemoryBuffer::new("Foo food\nfo\no");
    let all = span((1, 0), (3, 1));

    let sensitive = literal();
    assert_eq!(buf.collect_matches(all, "foo", &sensitive).unwrap().len(), 1);

    let nocase = SearchOptions {
      no_case: true,
      ..sensitive
    };
    assert_eq!(buf.collect_matches(all, "foo", &nocase).unwrap().len(), 2);

    let exact = SearchOptions {
      exact: true,
      ..nocase
    };
    assert_eq!(
      buf.collect_matches(all, "foo", &exact).unwrap(),
      vec![span((1, 0), (1, 3))]
    );

    let regex = SearchOptions {
      regex_expr: true,
      ..nocase
    };
    assert_eq!(buf.collect_matches(all, "fo+d", &regex).unwrap().len(), 1);
    assert!(buf.collect_matches(all, "fo+d", &nocase).unwrap().is_empty());

    // matches only span lines when asked to
    assert!(buf.collect_matches(all, "fo\no", &sensitive).unwrap().is_empty());
    let multi_line = SearchOptions {
      no_line_stop: true,
      ..sensitive
    };
    assert_eq!(
      buf.collect_matches(all, "fo\no", &multi_line).unwrap(),
      vec![span((2, 0), (3, 1))]
    );
  }

  #[test]
  fn elided_text() {
    let mut buf = MemoryBuffer::new("ab ab ab");
    buf.tag_add(ELIDE_TAG, span((1, 3), (1, 5))).unwrap();
    let all = span((1, 0), (1, 8));

    let opts = literal();
    assert_eq!(
      buf.collect_matches(all, "ab", &opts).unwrap(),
      vec![span((1, 0), (1, 2)), span((1, 6), (1, 8))]
    );

    let with_elided = SearchOptions {
      elide: true,
      ..opts
    };
    assert_eq!(buf.collect_matches(all, "ab", &with_elided).unwrap().len(), 3);
  }

  #[test]
  fn invalid_pattern() {
    let buf = MemoryBuffer::new("abc");
    let res = buf.collect_matches(span((1, 0), (1, 3)), "[a-", &SearchOptions::default());
    assert!(matches!(res, Err(OhNo::InvalidPattern { pattern, .. }) if pattern == "[a-"));
  }

  #[test]
  fn tag_remove_splits() {
    let mut buf = MemoryBuffer::new("0123456789");
    buf.tag_add("t", span((1, 1), (1, 9))).unwrap();
    buf.tag_remove("t", Pos::new(1, 3), Pos::new(1, 5)).unwrap();
    assert_eq!(
      buf.tagged("t"),
      vec![span((1, 1), (1, 3)), span((1, 5), (1, 9))]
    );

    let end = buf.end();
    buf.tag_remove("t", Pos::START, end).unwrap();
    assert!(buf.tagged("t").is_empty());
  }

  #[test]
  fn replace_span_only_at_position() {
    let mut buf = MemoryBuffer::new("aXbXc");
    let opts = literal();

    assert_eq!(
      buf.replace_span("X", "Y", Pos::new(1, 0), &opts).unwrap(),
      None
    );
    assert_eq!(buf.text(), "aXbXc");

    assert_eq!(
      buf.replace_span("X", "YY", Pos::new(1, 1), &opts).unwrap(),
      Some(span((1, 1), (1, 3)))
    );
    assert_eq!(buf.text(), "aYYbXc");
  }

  #[test]
  fn replace_within_selection_follows_edits() {
    let mut buf = MemoryBuffer::new("xx a a a xx\na");
    buf.select(span((1, 3), (1, 8))).unwrap();
    buf.set_cursor(Pos::new(2, 0)).unwrap();

    let count = buf
      .replace_within_ranges(RangeSelector::Selection, "a", "bbb", &literal())
      .unwrap();

    assert_eq!(count, 3);
    assert_eq!(buf.text(), "xx bbb bbb bbb xx\na");
    assert_eq!(buf.selection(), Some(span((1, 3), (1, 14))));
    assert_eq!(buf.cursor(), Pos::new(2, 0));
  }

  #[test]
  fn replace_within_tag() {
    let mut buf = MemoryBuffer::new("a a a");
    buf.tag_add("region", span((1, 2), (1, 5))).unwrap();

    let count = buf
      .replace_within_ranges(RangeSelector::Tag("region"), "a", "", &literal())
      .unwrap();

    assert_eq!(count, 2);
    assert_eq!(buf.text(), "a  ");
  }

  #[test]
  fn replace_all() {
    let mut buf = MemoryBuffer::new("aXbXc");
    let (start, end) = (buf.start(), buf.end());

    let count = buf
      .replace_all_in_range("X", "", start, end, &literal())
      .unwrap();

    assert_eq!(count, 2);
    assert_eq!(buf.text(), "abc");
  }

  #[test]
  fn replaced_text_loses_tag() {
    let mut buf = MemoryBuffer::new("aXbXc");
    let opts = literal();
    let end = buf.end();

    buf
      .find_next(CATCHED_TAG, "X", Pos::START, end, &opts)
      .unwrap();
    buf.replace_span("X", "Y", Pos::new(1, 1), &opts).unwrap();

    assert!(buf.tagged(CATCHED_TAG).is_empty());
  }
}
