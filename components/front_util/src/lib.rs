//! Utilities shared by the `lean-front` crates: source spans and positions,
//! a line-indexed source string, and some newtype definitions.

// rust lints we want
#![warn(
  bare_trait_objects,
  elided_lifetimes_in_paths,
  missing_copy_implementations,
  missing_debug_implementations,
  future_incompatible,
  rust_2018_idioms,
  trivial_numeric_casts,
  variant_size_differences,
  unreachable_pub,
  unused,
  missing_docs
)]
#![deny(unsafe_op_in_unsafe_fn)]
// all the clippy
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
// all the clippy::restriction lints we want
#![warn(
  clippy::else_if_without_else,
  clippy::float_arithmetic,
  clippy::get_unwrap,
  clippy::integer_division,
  clippy::rc_buffer,
  clippy::rest_pat_in_fully_bound_structs,
  clippy::string_add,
  clippy::unwrap_used
)]
// all the clippy lints we don't want
#![allow(
  clippy::cognitive_complexity,
  clippy::comparison_chain,
  clippy::default_trait_access,
  clippy::inline_always,
  clippy::missing_const_for_fn,
  clippy::missing_errors_doc,
  clippy::missing_panics_doc,
  clippy::module_name_repetitions,
  clippy::multiple_crate_versions,
  clippy::option_if_let_else,
  clippy::redundant_pub_crate,
  clippy::semicolon_if_nothing_returned,
  clippy::shadow_unrelated,
  clippy::too_many_lines,
  clippy::use_self
)]

use std::collections::{
  hash_map::{Entry, OccupiedEntry},
  HashMap,
};
use std::error::Error;
use std::fmt;
use std::hash::{BuildHasher, Hash};

mod ids;
mod lined_string;

pub use {ids::*, lined_string::*};

/// Newtype for `Box<dyn Error + Send + Sync>`
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Insertion into a [`HashMap`] that hands back the existing entry on a collision.
pub trait HashMapExt<K, V> {
  /// Insert `v` at `k` if the key is vacant. Otherwise nothing is inserted, and `v`
  /// comes back together with the occupied entry, so the caller can decide what to keep.
  fn try_insert_ext(&mut self, k: K, v: V) -> Option<(V, OccupiedEntry<'_, K, V>)>;
}

impl<K: Hash + Eq, V, S: BuildHasher> HashMapExt<K, V> for HashMap<K, V, S> {
  fn try_insert_ext(&mut self, k: K, v: V) -> Option<(V, OccupiedEntry<'_, K, V>)> {
    match self.entry(k) {
      Entry::Occupied(e) => Some((v, e)),
      Entry::Vacant(e) => {
        e.insert(v);
        None
      }
    }
  }
}

/// A half-open range of byte offsets into a source string.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Span {
  /// First byte covered.
  pub start: usize,
  /// One past the last byte covered.
  pub end: usize,
}

impl Span {
  /// The smallest span covering both `self` and `other`.
  #[must_use]
  pub fn join(self, other: Span) -> Span {
    Span { start: self.start.min(other.start), end: self.end.max(other.end) }
  }
}

impl From<std::ops::Range<usize>> for Span {
  fn from(r: std::ops::Range<usize>) -> Self { Span { start: r.start, end: r.end } }
}

/// The empty span at an offset.
impl From<usize> for Span {
  fn from(n: usize) -> Self { Span { start: n, end: n } }
}

impl fmt::Debug for Span {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}..{}", self.start, self.end) }
}

/// Position in a source stream expressed as a one-based line and a zero-based
/// column, counted in characters.
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash)]
pub struct Position {
  /// Line position in a document (one-based).
  pub line: u32,
  /// Character offset on a line in a document (zero-based).
  pub column: u32,
}

impl Default for Position {
  fn default() -> Self { Position { line: 1, column: 0 } }
}

impl Position {
  /// Construct a position from a line and column.
  #[must_use]
  pub const fn new(line: u32, column: u32) -> Self { Position { line, column } }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.line, self.column)
  }
}

impl fmt::Debug for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(self, f) }
}

/// Widen a `u32` to `usize`.
#[must_use]
pub fn u32_as_usize(n: u32) -> usize {
  n.try_into().expect("usize is at least 32 bits")
}
