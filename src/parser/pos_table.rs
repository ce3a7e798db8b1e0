//! The table from expression nodes to source positions.
//!
//! Nodes are identified by address, not structure: two occurrences of `x` in the
//! same term are different nodes and get different tags. The table keeps a handle to
//! every node it has seen, so an address can never be reused by a later node while
//! the table is alive.

use std::collections::HashMap;
use front_util::{Position, Tag, TagVec};
use crate::expr::{Expr, ExprKind};

/// Maps expression nodes to [`Tag`]s, and tags to positions.
#[derive(Debug, Default)]
pub struct PosTable {
  tags: HashMap<*const ExprKind, Tag>,
  nodes: TagVec<(Expr, Option<Position>)>,
}

impl PosTable {
  /// The tag of `e`, allocating one if `e` has not been seen before.
  pub fn get_tag(&mut self, e: &Expr) -> Tag {
    let nodes = &mut self.nodes;
    *self.tags.entry(e.as_ptr()).or_insert_with(|| nodes.push((e.clone(), None)))
  }

  /// Record the position of `e`.
  pub fn save_pos(&mut self, e: &Expr, pos: Position) {
    let t = self.get_tag(e);
    self.nodes[t].1 = Some(pos);
  }

  /// The tag of `e`, if it has one.
  #[must_use] pub fn tag_of(&self, e: &Expr) -> Option<Tag> { self.tags.get(&e.as_ptr()).copied() }

  /// The position recorded for `e`.
  #[must_use] pub fn pos_of(&self, e: &Expr) -> Option<Position> {
    self.tag_of(e).and_then(|t| self.pos_of_tag(t))
  }

  /// The position recorded for the node with tag `t`.
  #[must_use] pub fn pos_of_tag(&self, t: Tag) -> Option<Position> { self.nodes.get(t)?.1 }

  /// The number of tagged nodes.
  #[must_use] pub fn len(&self) -> usize { self.nodes.len() }

  /// Returns true if no node has been tagged.
  #[must_use] pub fn is_empty(&self) -> bool { self.nodes.is_empty() }
}
