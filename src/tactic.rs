//! Tactic syntax trees. Only the syntax is defined here; running tactics is the
//! business of the elaborator.

use std::fmt;
use std::rc::Rc;
use itertools::Itertools;
use crate::expr::Expr;
use crate::name::Name;

/// An argument to a primitive tactic.
#[derive(Clone, Debug)]
pub enum TacticArg {
  /// A term, parsed with the full expression grammar.
  Expr(Expr),
  /// A name to be introduced, such as the `x` in `intro x`.
  Ident(Name),
}

/// The tactic combinators. Each one is registered in the
/// [`Environment`](crate::environment::Environment) under some token, together with
/// its binding powers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Combinator {
  /// `t1 ; t2`: run `t1`, then `t2` on the resulting goals.
  Then,
  /// `t1 | t2`: run `t1`, or `t2` if `t1` fails.
  OrElse,
  /// `repeat t`: run `t` until it fails.
  Repeat,
  /// `try t`: run `t`, succeeding even if it fails.
  Try,
}

impl Combinator {
  fn name(self) -> &'static str {
    match self {
      Combinator::Then => "then",
      Combinator::OrElse => "orelse",
      Combinator::Repeat => "repeat",
      Combinator::Try => "try",
    }
  }
}

/// The different kinds of tactic node.
#[derive(Clone, Debug)]
pub enum TacticKind {
  /// A primitive tactic applied to its arguments, like `exact h`.
  Atom(Name, Box<[TacticArg]>),
  /// A unary combinator applied to a tactic.
  Unary(Combinator, Tactic),
  /// A binary combinator applied to two tactics.
  Binary(Combinator, Tactic, Tactic),
}

/// A shared, immutable tactic node.
#[derive(Clone, Debug)]
pub struct Tactic(Rc<TacticKind>);

impl Tactic {
  /// Allocate a new node.
  #[must_use] pub fn new(k: TacticKind) -> Tactic { Tactic(Rc::new(k)) }

  /// The node kind.
  #[must_use] pub fn kind(&self) -> &TacticKind { &self.0 }
}

impl fmt::Display for TacticArg {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TacticArg::Expr(e) => fmt::Display::fmt(e, f),
      TacticArg::Ident(x) => fmt::Display::fmt(x, f),
    }
  }
}

impl fmt::Display for Tactic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.kind() {
      TacticKind::Atom(x, args) if args.is_empty() => fmt::Display::fmt(x, f),
      TacticKind::Atom(x, args) => write!(f, "({} {})", x, args.iter().format(" ")),
      TacticKind::Unary(c, t) => write!(f, "({} {})", c.name(), t),
      TacticKind::Binary(c, t1, t2) => write!(f, "({} {} {})", c.name(), t1, t2),
    }
  }
}
