//! Binders: the `x`, `(x y : A)`, `{x : A}`, `[inst : C]` parameter groups which
//! follow `fun`, `Pi` and the name of a declaration.

use front_util::Position;
use crate::expr::{Binder, BinderKind, Expr, ExprKind};
use crate::name::Name;
use super::{ErrorKind, Parser, Result, TokenKind};

/// A parsed parameter. The name is bound in the scope of the parser as soon as the
/// parameter is parsed, to the placeholder `Local(name, idx)`.
#[derive(Clone, Debug)]
pub struct Parameter {
  /// Where the name was written.
  pub pos: Position,
  /// The name, anonymous for `_`.
  pub name: Name,
  /// The type, a hole if none was written.
  pub ty: Expr,
  /// How the parameter is supplied.
  pub kind: BinderKind,
  /// The disambiguation index of the placeholder.
  pub idx: u32,
}

impl Parameter {
  /// The [`Binder`] for this parameter, to be used in a `fun` or `Pi` node.
  #[must_use] pub fn to_binder(&self) -> Binder {
    Binder { name: self.name.clone(), idx: self.idx, kind: self.kind, ty: self.ty.clone() }
  }
}

impl Parser {
  /// Parse the name of a binder: an identifier, or `_` for an anonymous binder.
  pub(crate) fn binder_name(&mut self) -> Result<(Position, Name)> {
    let pos = self.pos();
    if self.curr_is("_") {
      self.next()?;
      return Ok((pos, Name::anonymous()))
    }
    match self.name_val() {
      Some(x) if x.is_atomic() => {
        let x = x.clone();
        self.next()?;
        Ok((pos, x))
      }
      Some(x) => Err(self.error(ErrorKind::Syntax, format!("invalid binder name '{x}', atomic identifier expected"))),
      None => Err(self.unexpected("binder name")),
    }
  }

  /// Allocate the placeholder for a new local variable and bring it into scope.
  pub(crate) fn bind_local(&mut self, pos: Position, name: Name, ty: Expr, kind: BinderKind) -> Parameter {
    let idx = self.fresh_idx();
    if !name.is_anonymous() {
      let e = Expr::local(name.clone(), idx);
      self.save_pos(&e, pos);
      self.locals.insert(name.clone(), e, idx);
    }
    Parameter { pos, name, ty, kind, idx }
  }

  /// If the current token opens a binder group, the closing token and the binder kind.
  fn binder_group_start(&self) -> Option<(String, BinderKind)> {
    let info = self.token_info()?;
    self.env.binder_delim(&info.text).map(|(close, k)| (close.to_owned(), k))
  }

  /// Parse the names and type of a delimited group, the opening token already consumed.
  /// The type is parsed before any of the names are bound.
  fn binder_group(&mut self, close: &str, kind: BinderKind, out: &mut Vec<Parameter>, single: bool) -> Result<()> {
    let mut names = vec![self.binder_name()?];
    while self.name_val().is_some() || self.curr_is("_") {
      if single {
        return Err(self.error(ErrorKind::Syntax, "invalid binder, only one name expected"))
      }
      names.push(self.binder_name()?);
    }
    let ty = if self.curr_is(":") {
      self.next()?;
      self.parse_expr(0)?
    } else {
      let ty = Expr::hole();
      self.save_pos(&ty, self.pos());
      ty
    };
    self.check_token(close)?;
    for (pos, name) in names {
      out.push(self.bind_local(pos, name, ty.clone(), kind));
    }
    Ok(())
  }

  /// Parse a single binder: a bare identifier (explicit, with no type), or a delimited
  /// group with exactly one name.
  pub fn parse_binder(&mut self) -> Result<Parameter> {
    let mut out = Vec::with_capacity(1);
    if let Some((close, kind)) = self.binder_group_start() {
      self.next()?;
      self.binder_group(&close, kind, &mut out, true)?;
    } else {
      let (pos, name) = self.binder_name()?;
      let ty = Expr::hole();
      self.save_pos(&ty, pos);
      out.push(self.bind_local(pos, name, ty, BinderKind::Explicit));
    }
    out.pop().ok_or_else(|| self.unexpected("binder"))
  }

  /// Parse zero or more binders, appending them to `out`. Each name is in scope for the
  /// binders after it.
  pub fn parse_binders(&mut self, out: &mut Vec<Parameter>) -> Result<()> {
    loop {
      if let Some((close, kind)) = self.binder_group_start() {
        self.next()?;
        self.binder_group(&close, kind, out, false)?;
      } else if matches!(self.curr(), TokenKind::Ident(_)) || self.curr_is("_") {
        let (pos, name) = self.binder_name()?;
        let ty = Expr::hole();
        self.save_pos(&ty, pos);
        out.push(self.bind_local(pos, name, ty, BinderKind::Explicit));
      } else {
        return Ok(())
      }
    }
  }

  /// Abstract `body` over `params`, innermost last, building `fun` nodes
  /// (if `pi` is false) or `Pi` nodes.
  pub fn abstract_params(&mut self, params: &[Parameter], body: Expr, pi: bool) -> Expr {
    params.iter().rev().fold(body, |body, x| {
      let b = x.to_binder();
      let e = Expr::new(if pi { ExprKind::Pi(b, body) } else { ExprKind::Lambda(b, body) });
      self.save_pos(&e, x.pos);
      e
    })
  }
}
