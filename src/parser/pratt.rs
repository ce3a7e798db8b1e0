//! Precedence climbing, shared by the expression and tactic parsers.

use std::ops::DerefMut;
use super::{Parser, Result};

/// Stack space that must be left before descending another level.
const RED_ZONE: usize = 64 * 1024;

/// Size of each new stack segment when the red zone is reached.
const STACK_SEGMENT: usize = 1024 * 1024;

/// A grammar driven by binding powers. Implementations wrap a [`Parser`] and decide
/// what the current token means for one kind of syntax tree.
pub(super) trait Pratt: DerefMut<Target = Parser> {
  /// The kind of tree being built.
  type Node;

  /// Parse a term which starts at the current token (the "null denotation").
  fn nud(&mut self) -> Result<Self::Node>;

  /// The left binding power of the current token: how strongly it binds to a
  /// term on its left. Zero means it cannot continue a term.
  fn lbp(&self) -> u32;

  /// Continue the term `left` with the current token (the "left denotation").
  fn led(&mut self, left: Self::Node) -> Result<Self::Node>;

  /// Parse a term, consuming continuations while they bind more tightly than `rbp`.
  /// Each call is one level of nesting, and runs on a freshly grown stack segment
  /// when the current one is nearly used up.
  fn climb(&mut self, rbp: u32) -> Result<Self::Node> {
    self.enter()?;
    let res = stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || self.climb_inner(rbp));
    self.leave();
    res
  }

  #[doc(hidden)]
  fn climb_inner(&mut self, rbp: u32) -> Result<Self::Node> {
    let mut left = self.nud()?;
    while self.lbp() > rbp {
      left = self.led(left)?;
    }
    Ok(left)
  }
}
