//! Escaping of replacement text.
//!
//! The replacement prompt is a single line, so control characters are typed as escape sequences (`\n`, `\t`, …) and
//! the replacement shown back to the user is escaped the same way.

use crate::error::OhNo;

/// Escape `s` so that it fits in a single-line prompt.
pub fn escape(s: &str) -> String {
  let mut escaped = String::with_capacity(s.len());

  for c in s.chars() {
    match c {
      '\\' => escaped.push_str(r"\\"),
      '\'' => escaped.push_str(r"\'"),
      '\n' => escaped.push_str(r"\n"),
      '\t' => escaped.push_str(r"\t"),
      '\r' => escaped.push_str(r"\r"),
      '\0' => escaped.push_str(r"\0"),
      c if c.is_ascii_control() => escaped.push_str(&format!(r"\x{:02x}", c as u32)),
      c => escaped.push(c),
    }
  }

  escaped
}

/// Decode the escape sequences of `s`.
pub fn unescape(s: &str) -> Result<String, OhNo> {
  let mut unescaped = String::with_capacity(s.len());
  let mut chars = s.chars();

  while let Some(c) = chars.next() {
    if c != '\\' {
      unescaped.push(c);
      continue;
    }

    let decoded = match chars.next() {
      Some('\\') => '\\',
      Some('\'') => '\'',
      Some('"') => '"',
      Some('n') => '\n',
      Some('t') => '\t',
      Some('r') => '\r',
      Some('0') => '\0',

      Some('x') => {
        let hex: String = chars.by_ref().take(2).collect();
        if hex.len() != 2 {
          return Err(OhNo::BadEscape {
            err: format!(r"truncated \x{hex} sequence"),
          });
        }

        u8::from_str_radix(&hex, 16)
          .ok()
          .filter(u8::is_ascii)
          .map(char::from)
          .ok_or_else(|| OhNo::BadEscape {
            err: format!(r"\x{hex} is not an ASCII character"),
          })?
      }

      Some(other) => {
        return Err(OhNo::BadEscape {
          err: format!(r"unknown sequence \{other}"),
        })
      }

      None => {
        return Err(OhNo::BadEscape {
          err: "trailing backslash".to_owned(),
        })
      }
    };

    unescaped.push(decoded);
  }

  Ok(unescaped)
}
