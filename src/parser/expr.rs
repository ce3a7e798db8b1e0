//! The expression parser.
//!
//! Expressions are parsed by precedence climbing over the notation tables of the
//! environment. Besides registered notation, the following are built in:
//!
//! * numerals, strings, `_`, identifiers and `( e )`;
//! * `fun xs, e` / `λ xs, e` and `Pi xs, e` / `Π xs, e` / `∀ xs, e` / `forall xs, e`;
//! * `let x : A := v in e` (the type is optional);
//! * `by tac`;
//! * the arrow `A → B` (or `A -> B`), right associative at precedence 25;
//! * application `f a`, which binds tighter than any notation.

use std::ops::{Deref, DerefMut};
use front_util::Position;
use crate::environment::{ARROW_PREC, Literal, MAX_PREC};
use crate::expr::{Binder, BinderKind, Expr, ExprKind};
use crate::name::Name;
use super::pratt::Pratt;
use super::{ErrorKind, Parser, Result, TokenKind};

fn is_arrow(tk: &str) -> bool { matches!(tk, "→" | "->") }

/// Keywords with a builtin meaning at the start of an expression.
fn is_builtin_nud(tk: &str) -> bool {
  matches!(tk, "(" | "_" | "fun" | "λ" | "Pi" | "Π" | "∀" | "forall" | "let" | "by")
}

struct ExprParser<'a>(&'a mut Parser);

impl Deref for ExprParser<'_> {
  type Target = Parser;
  fn deref(&self) -> &Parser { self.0 }
}
impl DerefMut for ExprParser<'_> {
  fn deref_mut(&mut self) -> &mut Parser { self.0 }
}

impl Parser {
  /// Parse an expression, continuing while the next token binds more tightly than `rbp`.
  pub fn parse_expr(&mut self, rbp: u32) -> Result<Expr> { ExprParser(self).climb(rbp) }

  /// Parse an expression with the local variables `locals` in scope. They are removed
  /// from scope again afterwards, whether or not parsing succeeds.
  pub fn parse_scoped_expr(&mut self, locals: &[Expr], rbp: u32) -> Result<Expr> {
    self.scoped(|p| {
      for e in locals {
        let Some((x, i)) = e.as_local() else {
          return Err(p.error(ErrorKind::Syntax, format!("invalid local '{e}', local variable expected")))
        };
        p.locals.insert(x.clone(), e.clone(), i);
      }
      p.parse_expr(rbp)
    })
  }

  /// Allocate a node and record its position.
  pub(crate) fn mk_expr(&mut self, k: ExprKind, pos: Position) -> Expr {
    let e = Expr::new(k);
    self.save_pos(&e, pos);
    e
  }

  /// Parse the remainder of a notation: sub-expressions and expected tokens.
  fn notation_args(&mut self, lits: &[Literal]) -> Result<Vec<Expr>> {
    let mut args = vec![];
    for lit in lits {
      match lit {
        Literal::Var(prec) => args.push(self.parse_expr(*prec)?),
        Literal::Const(tk) => self.check_token(tk)?,
      }
    }
    Ok(args)
  }

  /// The application of the constant `action` to `args`, or the constant itself
  /// if there are no arguments.
  fn notation_app(&mut self, action: Name, args: Vec<Expr>, pos: Position) -> Expr {
    let f = self.mk_expr(ExprKind::Const(action), pos);
    if args.is_empty() { return f }
    let e = Expr::app(f, args);
    self.save_pos(&e, pos);
    e
  }

  fn ident_expr(&mut self, x: &Name, pos: Position) -> Result<Expr> {
    if let Some(e) = self.lookup_local(x).map(|(e, _)| e.fresh()) {
      self.next()?;
      self.save_pos(&e, pos);
      return Ok(e)
    }
    let Some(c) = self.env.resolve(&self.prefix(), x) else {
      return Err(self.error(ErrorKind::NameResolution, format!("unknown identifier '{x}'")))
    };
    self.next()?;
    Ok(self.mk_expr(ExprKind::Const(c), pos))
  }

  /// `fun xs, e` or `Pi xs, e`, with the keyword already consumed.
  fn binder_expr(&mut self, pi: bool, pos: Position) -> Result<Expr> {
    self.scoped(|p| {
      let mut params = vec![];
      p.parse_binders(&mut params)?;
      if params.is_empty() { return Err(p.unexpected("binder")) }
      p.check_token(",")?;
      let body = p.parse_expr(0)?;
      let e = p.abstract_params(&params, body, pi);
      p.save_pos(&e, pos);
      Ok(e)
    })
  }

  /// `let x : A := v in e`, with the keyword already consumed. `x` is not in scope in `A` or `v`.
  fn let_expr(&mut self, pos: Position) -> Result<Expr> {
    let (xpos, name) = self.binder_name()?;
    let ty = if self.curr_is(":") {
      self.next()?;
      self.parse_expr(0)?
    } else {
      self.mk_expr(ExprKind::Hole, xpos)
    };
    self.check_token(":=")?;
    let val = self.parse_expr(0)?;
    self.check_token("in")?;
    self.scoped(|p| {
      let x = p.bind_local(xpos, name, ty, BinderKind::Explicit);
      let body = p.parse_expr(0)?;
      Ok(p.mk_expr(ExprKind::Let(x.to_binder(), val, body), pos))
    })
  }

  fn keyword_nud(&mut self, tk: &str, pos: Position) -> Result<Expr> {
    match tk {
      "_" => {
        self.next()?;
        Ok(self.mk_expr(ExprKind::Hole, pos))
      }
      "(" => {
        self.next()?;
        let e = self.parse_expr(0)?;
        self.check_token(")")?;
        Ok(e)
      }
      "fun" | "λ" => { self.next()?; self.binder_expr(false, pos) }
      "Pi" | "Π" | "∀" | "forall" => { self.next()?; self.binder_expr(true, pos) }
      "let" => { self.next()?; self.let_expr(pos) }
      "by" => {
        self.next()?;
        let tac = self.scoped(|p| p.parse_tactic(0))?;
        Ok(self.mk_expr(ExprKind::By(tac), pos))
      }
      _ => {
        let Some(nota) = self.env.nud(tk).cloned() else { return Err(self.unexpected("expression")) };
        self.next()?;
        let args = self.notation_args(&nota.lits)?;
        Ok(self.notation_app(nota.action, args, pos))
      }
    }
  }
}

impl Pratt for ExprParser<'_> {
  type Node = Expr;

  fn nud(&mut self) -> Result<Expr> {
    let pos = self.pos();
    match self.curr().clone() {
      TokenKind::Num(n) => {
        self.next()?;
        Ok(self.mk_expr(ExprKind::Num(n), pos))
      }
      TokenKind::Str(s) => {
        self.next()?;
        Ok(self.mk_expr(ExprKind::Str(s), pos))
      }
      TokenKind::Ident(x) => self.ident_expr(&x, pos),
      TokenKind::Keyword(info) => self.keyword_nud(&info.text, pos),
      TokenKind::Eof | TokenKind::Invalid => Err(self.unexpected("expression")),
    }
  }

  fn lbp(&self) -> u32 {
    match self.curr() {
      TokenKind::Eof | TokenKind::Invalid => 0,
      TokenKind::Ident(_) | TokenKind::Num(_) | TokenKind::Str(_) => MAX_PREC,
      TokenKind::Keyword(info) => {
        if let Some(led) = self.env.led(&info.text) { led.lbp }
        else if is_arrow(&info.text) { ARROW_PREC }
        else if is_builtin_nud(&info.text) || self.env.nud(&info.text).is_some() { MAX_PREC }
        else { 0 }
      }
    }
  }

  fn led(&mut self, left: Expr) -> Result<Expr> {
    let pos = self.pos();
    if let Some(info) = self.token_info() {
      let tk = info.text.clone();
      if let Some(led) = self.env.led(&tk).cloned() {
        self.next()?;
        let mut args = vec![left];
        args.extend(self.notation_args(&led.nota.lits)?);
        return Ok(self.notation_app(led.nota.action, args, pos))
      }
      if is_arrow(&tk) {
        self.next()?;
        let rhs = self.parse_expr(ARROW_PREC - 1)?;
        let b = Binder { name: Name::anonymous(), idx: self.fresh_idx(), kind: BinderKind::Explicit, ty: left };
        return Ok(self.mk_expr(ExprKind::Pi(b, rhs), pos))
      }
    }
    let start = self.pos_table.pos_of(&left).unwrap_or(pos);
    let arg = self.parse_expr(MAX_PREC)?;
    let e = Expr::app(left, vec![arg]);
    self.save_pos(&e, start);
    Ok(e)
  }
}
