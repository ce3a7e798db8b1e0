//! The environment: everything the parser knows about the language at a given point
//! of the input.
//!
//! Because the grammar is extensible (commands like `infixl` and `notation` add new
//! tokens and parsing rules as the file is processed), the token table and the notation
//! tables live here next to the declarations. The environment is a persistent value:
//! all tables are [`im`] maps, so cloning is cheap and a handler can build a modified
//! copy and install it with [`Parser::set_env`](crate::parser::Parser::set_env).

use std::rc::Rc;
use front_util::Position;
use crate::expr::{BinderKind, Expr};
use crate::name::Name;
use crate::tactic::Combinator;

/// The highest precedence, used for function application and its arguments.
pub const MAX_PREC: u32 = 1024;

/// The left binding power of the builtin arrow `A → B`.
pub const ARROW_PREC: u32 = 25;

/// Information about a registered token.
#[derive(Clone, Debug)]
pub struct TokenInfo {
  /// The text of the token.
  pub text: Rc<str>,
}

/// One piece of a notation, after the leading token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal {
  /// A sub-expression, parsed with the given right binding power.
  Var(u32),
  /// An expected token.
  Const(Rc<str>),
}

/// A parsing rule triggered by a token.
///
/// The result of the rule is the application of the constant `action` to the
/// sub-expressions (and, for infix and postfix rules, the left operand first).
#[derive(Clone, Debug)]
pub struct NotaInfo {
  /// The fully qualified name of the constant the notation stands for.
  pub action: Name,
  /// What to parse after the leading token.
  pub lits: Rc<[Literal]>,
}

/// A parsing rule triggered by a token in infix or postfix position.
#[derive(Clone, Debug)]
pub struct LedInfo {
  /// The left binding power. The rule fires only if this is strictly greater than
  /// the right binding power of the enclosing context.
  pub lbp: u32,
  /// The rule to run after the left operand and the token.
  pub nota: NotaInfo,
}

/// The argument shape of a primitive tactic.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TacticArgSpec {
  /// A single expression, as in `exact e`.
  Expr,
  /// A list of zero or more identifiers, as in `intro x y`.
  Idents,
}

/// A registered primitive tactic.
#[derive(Clone, Debug)]
pub struct TacticInfo {
  /// The name of the tactic.
  pub name: Name,
  /// The arguments it takes.
  pub args: Rc<[TacticArgSpec]>,
}

/// A tactic combinator in infix position.
#[derive(Copy, Clone, Debug)]
pub struct TacticLed {
  /// The combinator.
  pub comb: Combinator,
  /// Left binding power.
  pub lbp: u32,
  /// Right binding power used for the right operand.
  pub rbp: u32,
}

/// The kind of a global declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
  /// `axiom`
  Axiom,
  /// `constant`, and the builtin sorts.
  Constant,
  /// `definition` / `def`
  Definition,
  /// `theorem`
  Theorem,
}

/// A global declaration. The binders of the declaration have already been abstracted,
/// so `ty` is a `Pi` over them and `value` a `fun`.
#[derive(Clone, Debug)]
pub struct Declaration {
  /// The fully qualified name.
  pub name: Name,
  /// The kind of declaration.
  pub kind: DeclKind,
  /// The declared type.
  pub ty: Expr,
  /// The value, for definitions and theorems.
  pub value: Option<Expr>,
  /// Where the name was declared, if it came from source.
  pub pos: Option<Position>,
}

/// Returned by [`Environment::add_decl`] when the name is already taken.
#[derive(Clone, Debug)]
pub struct Redeclaration {
  /// The error message.
  pub msg: String,
  /// The location of the earlier declaration, if known.
  pub other: Option<Position>,
}

/// The parsing tables and declarations.
#[derive(Clone, Debug, Default)]
pub struct Environment {
  tokens: im::HashMap<Rc<str>, TokenInfo>,
  /// The length in characters of the longest token, used to bound the longest-match search.
  max_token_len: usize,
  nud: im::HashMap<Rc<str>, NotaInfo>,
  led: im::HashMap<Rc<str>, LedInfo>,
  binder_delims: im::HashMap<Rc<str>, (Rc<str>, BinderKind)>,
  tactics: im::HashMap<Rc<str>, TacticInfo>,
  tactic_nud: im::HashMap<Rc<str>, Combinator>,
  tactic_led: im::HashMap<Rc<str>, TacticLed>,
  decls: im::HashMap<Name, Declaration>,
}

/// The symbols of the builtin expression syntax.
const BUILTIN_TOKENS: &[&str] = &[
  "(", ")", "{", "}", "{{", "}}", "⦃", "⦄", "[", "]",
  ":", ":=", ",", "_", "λ", "fun", "Π", "Pi", "∀", "forall", "let", "in", "by", "→", "->",
];

impl Environment {
  /// An environment with nothing in it, not even the builtin tokens.
  #[must_use] pub fn empty() -> Environment { Environment::default() }

  /// The environment files are processed in by default: builtin tokens and binder
  /// delimiters, the sorts `Type` and `Prop`, and the standard tactics.
  #[must_use] pub fn new() -> Environment {
    let mut env = Environment::default();
    for &tk in BUILTIN_TOKENS { env.add_token(tk) }
    env.add_binder_delim("(", ")", BinderKind::Explicit);
    env.add_binder_delim("{", "}", BinderKind::Implicit);
    env.add_binder_delim("{{", "}}", BinderKind::StrictImplicit);
    env.add_binder_delim("⦃", "⦄", BinderKind::StrictImplicit);
    env.add_binder_delim("[", "]", BinderKind::InstImplicit);
    for s in ["Type", "Prop"] {
      let name = Name::atom(s);
      env.decls.insert(name.clone(), Declaration {
        name, kind: DeclKind::Constant, ty: Expr::constant(Name::atom("Type")), value: None, pos: None
      });
    }
    for tac in ["exact", "apply", "rewrite"] { env.add_tactic(tac, &[TacticArgSpec::Expr]) }
    env.add_tactic("intro", &[TacticArgSpec::Idents]);
    for tac in ["assumption", "id", "fail"] { env.add_tactic(tac, &[]) }
    env.add_tactic_nud("repeat", Combinator::Repeat);
    env.add_tactic_nud("try", Combinator::Try);
    env.add_tactic_led(";", Combinator::Then, 10, 10);
    env.add_tactic_led("|", Combinator::OrElse, 5, 4);
    env
  }

  /// Register a token. Registering a token twice has no further effect. Binding powers
  /// live in the notation tables, not here.
  pub fn add_token(&mut self, text: &str) {
    if self.tokens.contains_key(text) { return }
    let text: Rc<str> = text.into();
    self.max_token_len = self.max_token_len.max(text.chars().count());
    self.tokens.insert(text.clone(), TokenInfo { text });
  }

  /// Look up a token by its exact text.
  #[must_use] pub fn token(&self, text: &str) -> Option<&TokenInfo> { self.tokens.get(text) }

  /// The longest registered token which is a prefix of `s`.
  #[must_use] pub fn longest_token(&self, s: &str) -> Option<&TokenInfo> {
    let ends = s.char_indices().skip(1).map(|(i, _)| i).chain(std::iter::once(s.len()));
    let ends: Vec<usize> = ends.take(self.max_token_len).collect();
    ends.into_iter().rev().find_map(|end| self.tokens.get(&s[..end]))
  }

  /// The prefix or mixfix rule led by `tk`, if any.
  #[must_use] pub fn nud(&self, tk: &str) -> Option<&NotaInfo> { self.nud.get(tk) }

  /// The infix or postfix rule led by `tk`, if any.
  #[must_use] pub fn led(&self, tk: &str) -> Option<&LedInfo> { self.led.get(tk) }

  /// Register a prefix operator `tk e`, where `e` is parsed at precedence `prec`.
  pub fn add_prefix(&mut self, tk: &str, prec: u32, action: Name) {
    self.add_token(tk);
    self.nud.insert(tk.into(), NotaInfo { action, lits: Rc::new([Literal::Var(prec)]) });
  }

  /// Register an infix operator `a tk b` with left binding power `lbp`, where `b` is
  /// parsed at `rbp`.
  pub fn add_infix(&mut self, tk: &str, lbp: u32, rbp: u32, action: Name) {
    self.add_token(tk);
    let nota = NotaInfo { action, lits: Rc::new([Literal::Var(rbp)]) };
    self.led.insert(tk.into(), LedInfo { lbp, nota });
  }

  /// Register a postfix operator `a tk`.
  pub fn add_postfix(&mut self, tk: &str, lbp: u32, action: Name) {
    self.add_token(tk);
    let nota = NotaInfo { action, lits: Rc::new([]) };
    self.led.insert(tk.into(), LedInfo { lbp, nota });
  }

  /// Register a mixfix notation led by `tk`. Every token named in `lits` is registered too.
  pub fn add_mixfix(&mut self, tk: &str, lits: Vec<Literal>, action: Name) {
    self.add_token(tk);
    for lit in &lits {
      if let Literal::Const(c) = lit { self.add_token(c) }
    }
    self.nud.insert(tk.into(), NotaInfo { action, lits: lits.into() });
  }

  /// Register a pair of binder delimiters.
  pub fn add_binder_delim(&mut self, open: &str, close: &str, kind: BinderKind) {
    self.add_token(open);
    self.add_token(close);
    self.binder_delims.insert(open.into(), (close.into(), kind));
  }

  /// If `open` opens a binder group, the matching closing token and the binder kind.
  #[must_use] pub fn binder_delim(&self, open: &str) -> Option<(&str, BinderKind)> {
    self.binder_delims.get(open).map(|(close, k)| (&**close, *k))
  }

  /// Register a primitive tactic. Tactic names are matched against identifiers,
  /// so they are not added to the token table.
  pub fn add_tactic(&mut self, name: &str, args: &[TacticArgSpec]) {
    self.tactics.insert(name.into(), TacticInfo { name: Name::atom(name), args: args.into() });
  }

  /// Look up a primitive tactic.
  #[must_use] pub fn tactic(&self, name: &str) -> Option<&TacticInfo> { self.tactics.get(name) }

  /// Register a prefix tactic combinator such as `repeat`.
  pub fn add_tactic_nud(&mut self, name: &str, comb: Combinator) {
    self.tactic_nud.insert(name.into(), comb);
  }

  /// Look up a prefix tactic combinator.
  #[must_use] pub fn tactic_nud(&self, name: &str) -> Option<Combinator> {
    self.tactic_nud.get(name).copied()
  }

  /// Register an infix tactic combinator such as `;`.
  pub fn add_tactic_led(&mut self, tk: &str, comb: Combinator, lbp: u32, rbp: u32) {
    self.add_token(tk);
    self.tactic_led.insert(tk.into(), TacticLed { comb, lbp, rbp });
  }

  /// Look up an infix tactic combinator.
  #[must_use] pub fn tactic_led(&self, tk: &str) -> Option<TacticLed> {
    self.tactic_led.get(tk).copied()
  }

  /// Add a declaration, failing if the name is already declared.
  pub fn add_decl(&mut self, decl: Declaration) -> Result<(), Redeclaration> {
    if let Some(other) = self.decls.get(&decl.name) {
      return Err(Redeclaration {
        msg: format!("'{}' has already been declared", decl.name),
        other: other.pos,
      })
    }
    self.decls.insert(decl.name.clone(), decl);
    Ok(())
  }

  /// Look up a declaration by its fully qualified name.
  #[must_use] pub fn get_decl(&self, name: &Name) -> Option<&Declaration> { self.decls.get(name) }

  /// Resolve `id` as written inside the namespace `prefix`: the first of `prefix.id`,
  /// then the same with each shorter prefix of `prefix`, down to plain `id`, that is declared.
  #[must_use] pub fn resolve(&self, prefix: &Name, id: &Name) -> Option<Name> {
    prefix.prefixes().map(|p| p.join(id)).find(|n| self.decls.contains_key(n))
  }
}
