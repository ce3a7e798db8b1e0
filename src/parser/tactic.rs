//! The tactic parser, the same precedence climbing loop as for expressions but over the
//! tactic tables of the environment.

use std::ops::{Deref, DerefMut};
use crate::environment::{MAX_PREC, TacticArgSpec};
use crate::expr::{BinderKind, ExprKind};
use crate::tactic::{Tactic, TacticArg, TacticKind};
use super::pratt::Pratt;
use super::{ErrorKind, Parser, Result};

struct TacticParser<'a>(&'a mut Parser);

impl Deref for TacticParser<'_> {
  type Target = Parser;
  fn deref(&self) -> &Parser { self.0 }
}
impl DerefMut for TacticParser<'_> {
  fn deref_mut(&mut self) -> &mut Parser { self.0 }
}

impl Parser {
  /// Parse a tactic, continuing while the next combinator binds more tightly than `rbp`.
  /// Names introduced by a tactic such as `intro x` are bound as locals in the current
  /// frame, so the tactics after it can refer to them.
  pub fn parse_tactic(&mut self, rbp: u32) -> Result<Tactic> { TacticParser(self).climb(rbp) }
}

impl Pratt for TacticParser<'_> {
  type Node = Tactic;

  fn nud(&mut self) -> Result<Tactic> {
    if self.curr_is("(") {
      self.next()?;
      let t = self.parse_tactic(0)?;
      self.check_token(")")?;
      return Ok(t)
    }
    let Some(x) = self.name_val().cloned() else { return Err(self.unexpected("tactic")) };
    let key = x.to_string();
    if let Some(comb) = self.env.tactic_nud(&key) {
      self.next()?;
      let t = self.parse_tactic(MAX_PREC)?;
      return Ok(Tactic::new(TacticKind::Unary(comb, t)))
    }
    let Some(info) = self.env.tactic(&key).cloned() else {
      return Err(self.error(ErrorKind::Syntax, format!("unknown tactic '{x}'")))
    };
    self.next()?;
    let mut args = vec![];
    for spec in &*info.args {
      match spec {
        TacticArgSpec::Expr => args.push(TacticArg::Expr(self.parse_expr(0)?)),
        TacticArgSpec::Idents => while let Some(y) = self.name_val().cloned() {
          let pos = self.pos();
          self.next()?;
          let ty = self.mk_expr(ExprKind::Hole, pos);
          self.bind_local(pos, y.clone(), ty, BinderKind::Explicit);
          args.push(TacticArg::Ident(y));
        },
      }
    }
    Ok(Tactic::new(TacticKind::Atom(info.name, args.into())))
  }

  fn lbp(&self) -> u32 {
    self.token_info().and_then(|info| self.env.tactic_led(&info.text)).map_or(0, |led| led.lbp)
  }

  fn led(&mut self, left: Tactic) -> Result<Tactic> {
    let led = self.token_info().and_then(|info| self.env.tactic_led(&info.text));
    let Some(led) = led else { return Err(self.unexpected("tactic combinator")) };
    self.next()?;
    let right = self.parse_tactic(led.rbp)?;
    Ok(Tactic::new(TacticKind::Binary(led.comb, left, right)))
  }
}
