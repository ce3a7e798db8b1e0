//! The expression trees handed to the kernel.
//!
//! The kernel itself (type checking, elaboration) lives elsewhere; this module only defines
//! the shape of the trees the parser produces. Every [`Expr`] is a reference counted node,
//! and node *identity* (not structure) is what the position table in
//! [`PosTable`](crate::parser::PosTable) keys on.

use std::fmt;
use std::rc::Rc;
use num::BigRational;
use itertools::Itertools;
use crate::name::Name;
use crate::tactic::Tactic;

/// The role a parameter plays at use sites.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinderKind {
  /// `(x : A)`: supplied explicitly.
  Explicit,
  /// `{x : A}`: inferred from later arguments.
  Implicit,
  /// `{{x : A}}`: inferred, but only once a later explicit argument is supplied.
  StrictImplicit,
  /// `[x : A]`: resolved by instance search.
  InstImplicit,
}

impl BinderKind {
  /// The delimiters this kind is printed with.
  #[must_use] pub fn delims(self) -> (&'static str, &'static str) {
    match self {
      BinderKind::Explicit => ("(", ")"),
      BinderKind::Implicit => ("{", "}"),
      BinderKind::StrictImplicit => ("{{", "}}"),
      BinderKind::InstImplicit => ("[", "]"),
    }
  }
}

/// A bound variable in a [`ExprKind::Lambda`], [`ExprKind::Pi`] or [`ExprKind::Let`] node.
#[derive(Clone, Debug)]
pub struct Binder {
  /// The user facing name of the variable.
  pub name: Name,
  /// The disambiguation index of the variable; occurrences in the body are
  /// [`ExprKind::Local`] nodes carrying the same name and index.
  pub idx: u32,
  /// How the variable is supplied.
  pub kind: BinderKind,
  /// The type of the variable, [`ExprKind::Hole`] if none was given.
  pub ty: Expr,
}

/// The different kinds of expression node.
#[derive(Clone, Debug)]
pub enum ExprKind {
  /// A reference to a locally bound variable.
  Local(Name, u32),
  /// A reference to a global declaration, by fully qualified name.
  Const(Name),
  /// Function application `f a1 ... an`, with `n >= 1`.
  App(Expr, Box<[Expr]>),
  /// `fun (x : A), b`
  Lambda(Binder, Expr),
  /// `Pi (x : A), B`, also produced by the arrow `A → B`.
  Pi(Binder, Expr),
  /// `let x : A := v in b`
  Let(Binder, Expr, Expr),
  /// A numeral.
  Num(BigRational),
  /// A string literal.
  Str(Rc<str>),
  /// `_`, a placeholder to be filled in by elaboration.
  Hole,
  /// `by tac`, a term to be produced by running a tactic.
  By(Tactic),
}

/// A shared, immutable expression node.
#[derive(Clone)]
pub struct Expr(Rc<ExprKind>);

impl Expr {
  /// Allocate a new node.
  #[must_use] pub fn new(k: ExprKind) -> Expr { Expr(Rc::new(k)) }

  /// Allocate a new local variable reference.
  #[must_use] pub fn local(name: Name, idx: u32) -> Expr { Expr::new(ExprKind::Local(name, idx)) }

  /// Allocate a new constant reference.
  #[must_use] pub fn constant(name: Name) -> Expr { Expr::new(ExprKind::Const(name)) }

  /// Allocate a new hole.
  #[must_use] pub fn hole() -> Expr { Expr::new(ExprKind::Hole) }

  /// Allocate an application node. If `f` is itself an application, the arguments are
  /// appended to it, so that `(f a) b` and `f a b` produce the same shape.
  #[must_use] pub fn app(f: Expr, args: Vec<Expr>) -> Expr {
    if args.is_empty() { return f }
    if let ExprKind::App(g, args0) = &*f.0 {
      let args = args0.iter().cloned().chain(args).collect();
      return Expr::new(ExprKind::App(g.clone(), args))
    }
    Expr::new(ExprKind::App(f, args.into()))
  }

  /// The node kind.
  #[must_use] pub fn kind(&self) -> &ExprKind { &self.0 }

  /// A freshly allocated copy of this node (same structure, new identity).
  #[must_use] pub fn fresh(&self) -> Expr { Expr::new((*self.0).clone()) }

  /// Returns the name and index if this is a local variable reference.
  #[must_use] pub fn as_local(&self) -> Option<(&Name, u32)> {
    if let ExprKind::Local(x, i) = &*self.0 { Some((x, *i)) } else { None }
  }

  /// The address of the node, used as an identity key.
  #[must_use] pub fn as_ptr(&self) -> *const ExprKind { Rc::as_ptr(&self.0) }
}

impl std::ops::Deref for Expr {
  type Target = ExprKind;
  fn deref(&self) -> &ExprKind { &self.0 }
}

fn fmt_binder(f: &mut fmt::Formatter<'_>, head: &str, b: &Binder, body: &Expr) -> fmt::Result {
  let (l, r) = b.kind.delims();
  if b.name.is_anonymous() {
    write!(f, "({} {}_ : {}{} {})", head, l, b.ty, r, body)
  } else {
    write!(f, "({} {}{} : {}{} {})", head, l, b.name, b.ty, r, body)
  }
}

/// Prints expressions as s-expressions, e.g. `(add a (mul b c))`.
impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.kind() {
      ExprKind::Local(x, _) | ExprKind::Const(x) => fmt::Display::fmt(x, f),
      ExprKind::App(g, args) => write!(f, "({} {})", g, args.iter().format(" ")),
      ExprKind::Lambda(b, e) => fmt_binder(f, "fun", b, e),
      ExprKind::Pi(b, e) => fmt_binder(f, "Pi", b, e),
      ExprKind::Let(b, v, e) => write!(f, "(let {} : {} := {} in {})", b.name, b.ty, v, e),
      ExprKind::Num(n) => fmt::Display::fmt(n, f),
      ExprKind::Str(s) => write!(f, "{:?}", s),
      ExprKind::Hole => f.write_str("_"),
      ExprKind::By(t) => write!(f, "(by {})", t),
    }
  }
}

impl fmt::Debug for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(self, f) }
}
