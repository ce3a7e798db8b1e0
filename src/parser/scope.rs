//! The stack of local variable bindings.

use crate::expr::Expr;
use crate::name::Name;

/// Local variables in scope, stored as an arena of bindings plus a stack of frame marks.
///
/// A new binding of a name shadows any earlier one; popping a frame drops the bindings
/// made since the matching push, which makes the shadowed bindings visible again.
#[derive(Clone, Debug, Default)]
pub struct ScopeStack {
  entries: Vec<(Name, Expr, u32)>,
  frames: Vec<usize>,
}

impl ScopeStack {
  /// Open a new frame.
  pub fn push(&mut self) { self.frames.push(self.entries.len()) }

  /// Close the innermost frame, dropping its bindings.
  pub fn pop(&mut self) {
    debug_assert!(!self.frames.is_empty(), "scope stack underflow");
    if let Some(n) = self.frames.pop() { self.entries.truncate(n) }
  }

  /// Bind `name` to the placeholder `e` with disambiguation index `idx`
  /// in the innermost frame.
  pub fn insert(&mut self, name: Name, e: Expr, idx: u32) { self.entries.push((name, e, idx)) }

  /// The most recent binding of `name`, if any.
  #[must_use] pub fn lookup(&self, name: &Name) -> Option<(&Expr, u32)> {
    self.entries.iter().rev().find(|(x, _, _)| x == name).map(|(_, e, i)| (e, *i))
  }

  /// The number of open frames.
  #[must_use] pub fn depth(&self) -> usize { self.frames.len() }

  /// The number of bindings in all frames.
  #[must_use] pub fn len(&self) -> usize { self.entries.len() }

  /// Returns true if there are no bindings.
  #[must_use] pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
