//! Buffer positions and spans, as handed to and returned by a [`TextModel`](super::TextModel).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single position in a buffer.
///
/// Lines are _1-based_ and columns are _0-based_; `1.0` is thus the very first character of a buffer. Columns count
/// user-perceived characters (grapheme clusters), not bytes.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos {
  pub line: usize,
  pub col: usize,
}

impl Pos {
  /// Start of any buffer.
  pub const START: Self = Self { line: 1, col: 0 };

  pub fn new(line: usize, col: usize) -> Self {
    Self { line, col }
  }

  /// Read a [`Pos`] from a string; i.e. <line>.<col>.
  ///
  /// Return [`None`] if parsing failed, or if the line is `0`.
  pub fn parse_str(s: &str) -> Option<Self> {
    let (line, col) = s.trim().split_once('.')?;
    let line = line.parse().ok().filter(|line| *line > 0)?;
    let col = col.parse().ok()?;

    Some(Self { line, col })
  }
}

impl fmt::Display for Pos {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.line, self.col)
  }
}

impl Serialize for Pos {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for Pos {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Self::parse_str(&s)
      .ok_or_else(|| serde::de::Error::custom(format!("invalid position {s:?}; expected <line>.<col>")))
  }
}

/// A half-open range of a buffer, `[start, end)`.
///
/// Match spans, anchors and selections are all represented as [`Span`]. Unlike cursor/anchor selections, a span is
/// always ordered; [`Span::new`] swaps its bounds if needed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Span {
  pub start: Pos,
  pub end: Pos,
}

impl Span {
  pub fn new(a: Pos, b: Pos) -> Self {
    if a <= b {
      Self { start: a, end: b }
    } else {
      Self { start: b, end: a }
    }
  }

  /// Empty span located at `pos`.
  pub fn collapsed(pos: Pos) -> Self {
    Self {
      start: pos,
      end: pos,
    }
  }

  pub fn is_collapsed(&self) -> bool {
    self.start == self.end
  }

  /// Check whether `other` lies entirely within this span.
  pub fn contains(&self, other: &Span) -> bool {
    self.start <= other.start && other.end <= self.end
  }

  /// Read a [`Span`] from a string; i.e. <start_line>.<start_col>,<end_line>.<end_col>.
  ///
  /// Return [`None`] if parsing failed.
  pub fn parse_str(s: &str) -> Option<Self> {
    let (a, b) = s.split_once(',')?;
    Some(Self::new(Pos::parse_str(a)?, Pos::parse_str(b)?))
  }
}

impl fmt::Display for Span {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{},{}", self.start, self.end)
  }
}

impl Serialize for Span {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for Span {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Self::parse_str(&s).ok_or_else(|| {
      serde::de::Error::custom(format!(
        "invalid span {s:?}; expected <line>.<col>,<line>.<col>"
      ))
    })
  }
}

#[cfg(test)]
mod tests {
  use super::{Pos, Span};

  #[test]
  fn pos_parsing() {
    assert_eq!(Pos::parse_str("123.456"), Some(Pos::new(123, 456)));
    assert_eq!(Pos::parse_str("1.0"), Some(Pos::START));
    assert_eq!(Pos::parse_str("0.3"), None);
    assert_eq!(Pos::parse_str("12"), None);
    assert_eq!(Pos::parse_str("a.b"), None);
    assert_eq!(Pos::new(3, 14).to_string(), "3.14");
  }

  #[test]
  fn pos_ordering() {
    assert!(Pos::new(1, 9) < Pos::new(2, 0));
    assert!(Pos::new(2, 1) < Pos::new(2, 2));
  }

  #[test]
  fn span_parsing() {
    let span = Span::parse_str("1.4,1.2").unwrap();
    assert_eq!(span.start, Pos::new(1, 2));
    assert_eq!(span.end, Pos::new(1, 4));
    assert_eq!(span.to_string(), "1.2,1.4");
    assert_eq!(Span::parse_str("1.2"), None);
  }

  #[test]
  fn span_containment() {
    let outer = Span::new(Pos::new(1, 0), Pos::new(3, 0));
    assert!(outer.contains(&Span::new(Pos::new(1, 0), Pos::new(2, 5))));
    assert!(!outer.contains(&Span::new(Pos::new(2, 0), Pos::new(3, 1))));
    assert!(Span::collapsed(Pos::new(2, 2)).is_collapsed());
  }

  #[test]
  fn serde_as_strings() {
    let span: Span = serde_json::from_str("\"2.1,2.3\"").unwrap();
    assert_eq!(span, Span::new(Pos::new(2, 1), Pos::new(2, 3)));
    assert_eq!(serde_json::to_string(&span.start).unwrap(), "\"2.1\"");
    assert!(serde_json::from_str::<Pos>("\"nope\"").is_err());
  }
}
