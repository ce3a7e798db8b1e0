//! Line-indexed source text, used to map between [`Position`]s and byte offsets
//! and to cut out whole lines when rendering diagnostics.

use crate::{u32_as_usize, Position, Span};
use std::ops::{Deref, Index};

/// Source text together with the byte offsets at which each line begins.
#[derive(Default, Clone, Debug)]
pub struct LinedString {
  s: String,
  /// Offset just past every `'\n'`.
  lines: Vec<usize>,
}

impl Index<Span> for LinedString {
  type Output = str;
  fn index(&self, s: Span) -> &str { &self.s[s.start..s.end] }
}

impl LinedString {
  /// The byte index of the start of the (zero-based) line `n`.
  fn line_start(&self, n: usize) -> usize {
    n.checked_sub(1).map_or(0, |i| self.lines.get(i).copied().unwrap_or(self.s.len()))
  }

  /// Turn a [`Position`] back into a byte index, or `None` if it is past the end of the string.
  #[must_use]
  pub fn to_idx(&self, pos: Position) -> Option<usize> {
    let line = u32_as_usize(pos.line).checked_sub(1)?;
    if line > self.lines.len() { return None }
    let start = self.line_start(line);
    self.s[start..].char_indices().map(|(i, _)| start + i)
      .chain(std::iter::once(self.s.len()))
      .nth(u32_as_usize(pos.column))
  }

  /// The span of the line containing byte index `idx`, not including the line terminator.
  #[must_use]
  pub fn line_span(&self, idx: usize) -> Span {
    let line = match self.lines.binary_search(&idx.min(self.s.len())) {
      Ok(n) => n + 1,
      Err(n) => n,
    };
    let start = self.line_start(line);
    let end = self.lines.get(line).map_or(self.s.len(), |&next| next - 1);
    (start..end.max(start)).into()
  }
}

impl Deref for LinedString {
  type Target = String;
  fn deref(&self) -> &String { &self.s }
}

impl From<String> for LinedString {
  fn from(s: String) -> LinedString {
    let lines = s.match_indices('\n').map(|(i, _)| i + 1).collect();
    LinedString { s, lines }
  }
}

impl From<&str> for LinedString {
  fn from(s: &str) -> LinedString { s.to_owned().into() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn positions_and_lines() {
    let s = LinedString::from("ab\nλx y\n\nz");
    assert_eq!(s.to_idx(Position::new(1, 0)), Some(0));
    assert_eq!(s.to_idx(Position::new(2, 2)), Some(6));
    assert_eq!(s.to_idx(Position::new(2, 4)), Some(8));
    assert_eq!(s.to_idx(Position::new(4, 1)), Some(11));
    assert_eq!(s.to_idx(Position::new(5, 0)), None);
    assert_eq!(&s[s.line_span(4)], "λx y");
    assert_eq!(&s[s.line_span(2)], "ab");
    assert_eq!(s.line_span(9), Span::from(9));
    assert_eq!(&s[s.line_span(10)], "z");
    assert_eq!(&s[s.line_span(11)], "z");
  }
}
