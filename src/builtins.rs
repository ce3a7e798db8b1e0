//! The builtin commands.
//!
//! Every handler is called with its keyword already consumed, parses the rest of
//! the command, and applies its effect to the parser (namespace stack, scope) or to
//! the environment.

use log::debug;
use num::ToPrimitive;
use front_util::{Position, Span};
use crate::command::CmdTable;
use crate::environment::{DeclKind, Declaration, Literal};
use crate::expr::{Expr, ExprKind};
use crate::ios::Options;
use crate::name::Name;
use crate::parser::{ErrorKind, ParseError, Parser, Result, ScopeKind, TokenKind};

/// The table of builtin commands.
#[must_use] pub fn builtin_cmds() -> CmdTable {
  let mut cmds = CmdTable::default();
  cmds.add("namespace", namespace_cmd);
  cmds.add("scope", scope_cmd);
  cmds.add("structure", structure_cmd);
  cmds.add("end", end_cmd);
  cmds.add("variable", variable_cmd);
  cmds.add("parameter", variable_cmd);
  cmds.add("axiom", axiom_cmd);
  cmds.add("constant", constant_cmd);
  cmds.add("definition", definition_cmd);
  cmds.add("def", definition_cmd);
  cmds.add("theorem", theorem_cmd);
  cmds.add("check", check_cmd);
  cmds.add("infixl", infixl_cmd);
  cmds.add("infixr", infixr_cmd);
  cmds.add("infix", infix_cmd);
  cmds.add("prefix", prefix_cmd);
  cmds.add("postfix", postfix_cmd);
  cmds.add("notation", notation_cmd);
  cmds.add("set_option", set_option_cmd);
  cmds.add("script", script_cmd);
  cmds.add("exit", exit_cmd);
  cmds
}

fn namespace_cmd(p: &mut Parser) -> Result<()> {
  let (_, n) = p.check_ident()?;
  p.push_scope(ScopeKind::Namespace, Some(n));
  Ok(())
}

fn scope_cmd(p: &mut Parser) -> Result<()> {
  p.push_scope(ScopeKind::Scope, None);
  Ok(())
}

fn structure_cmd(p: &mut Parser) -> Result<()> {
  let (_, n) = p.check_ident()?;
  p.push_scope(ScopeKind::Structure, Some(n));
  Ok(())
}

fn end_cmd(p: &mut Parser) -> Result<()> {
  let pos = p.cmd_pos();
  let name = p.name_val().cloned();
  if name.is_some() { p.next()? }
  p.pop_scope(None, name.as_ref(), pos)
}

fn variable_cmd(p: &mut Parser) -> Result<()> {
  if p.namespaces().innermost() != Some(ScopeKind::Structure) {
    return Err(p.cmd_error(ErrorKind::Scope, "variables can only be declared inside a structure"))
  }
  let mut params = vec![];
  p.parse_binders(&mut params)?;
  if params.is_empty() { return Err(p.unexpected("binder")) }
  for x in &params { debug!("{}: variable {} : {}", x.pos, x.name, x.ty) }
  Ok(())
}

/// The name of a declaration, with its position and span.
fn decl_name(p: &mut Parser) -> Result<(Position, Span, Name)> {
  let span = p.span();
  let (pos, n) = p.check_ident()?;
  Ok((pos, span, n))
}

fn add_decl(p: &mut Parser, (pos, span, name): (Position, Span, Name),
    kind: DeclKind, ty: Expr, value: Option<Expr>) -> Result<()> {
  let name = p.prefix().join(&name);
  debug!("{pos}: declare {name}");
  let mut env = p.env().clone();
  let decl = Declaration { name: name.clone(), kind, ty: ty.clone(), value, pos: Some(pos) };
  env.add_decl(decl).map_err(|r| {
    let msg = match r.other {
      Some(o) => format!("{}, previously declared at {o}", r.msg),
      None => r.msg,
    };
    ParseError::new(ErrorKind::Syntax, pos, span, msg)
  })?;
  p.set_env(env);
  if p.ios().options.contains(Options::VERBOSE) {
    p.ios_mut().println(format_args!("{name} : {ty}"));
  }
  Ok(())
}

fn axiom_like(p: &mut Parser, kind: DeclKind) -> Result<()> {
  let header = decl_name(p)?;
  let ty = p.scoped(|p| {
    let mut params = vec![];
    p.parse_binders(&mut params)?;
    p.check_token(":")?;
    let ty = p.parse_expr(0)?;
    Ok(p.abstract_params(&params, ty, true))
  })?;
  add_decl(p, header, kind, ty, None)
}

fn axiom_cmd(p: &mut Parser) -> Result<()> { axiom_like(p, DeclKind::Axiom) }

fn constant_cmd(p: &mut Parser) -> Result<()> { axiom_like(p, DeclKind::Constant) }

fn definition_like(p: &mut Parser, kind: DeclKind) -> Result<()> {
  let header = decl_name(p)?;
  let (ty, val) = p.scoped(|p| {
    let mut params = vec![];
    p.parse_binders(&mut params)?;
    let ty = if kind == DeclKind::Theorem || p.curr_is(":") {
      p.check_token(":")?;
      p.parse_expr(0)?
    } else {
      p.mk_expr(ExprKind::Hole, header.0)
    };
    p.check_token(":=")?;
    let val = p.parse_expr(0)?;
    Ok((p.abstract_params(&params, ty, true), p.abstract_params(&params, val, false)))
  })?;
  add_decl(p, header, kind, ty, Some(val))
}

fn definition_cmd(p: &mut Parser) -> Result<()> { definition_like(p, DeclKind::Definition) }

fn theorem_cmd(p: &mut Parser) -> Result<()> { definition_like(p, DeclKind::Theorem) }

fn check_cmd(p: &mut Parser) -> Result<()> {
  let e = p.parse_expr(0)?;
  p.ios_mut().println(format_args!("{e}"));
  Ok(())
}

/// A token to be declared, as a string literal.
fn notation_token(p: &mut Parser) -> Result<String> {
  let err = p.error(ErrorKind::Syntax, "invalid token, must be nonempty and contain no whitespace");
  let tk = p.check_str()?;
  if tk.is_empty() || tk.contains(char::is_whitespace) { return Err(err) }
  Ok(tk.to_string())
}

/// A precedence, a natural number.
fn precedence(p: &mut Parser) -> Result<u32> {
  let prec = p.num_val().and_then(|n| if n.is_integer() { n.to_integer().to_u32() } else { None });
  let Some(prec) = prec else { return Err(p.unexpected("precedence (a natural number)")) };
  p.next()?;
  Ok(prec)
}

/// `:= c`, the constant a notation stands for.
fn notation_action(p: &mut Parser) -> Result<Name> {
  p.check_token(":=")?;
  let span = p.span();
  let (pos, x) = p.check_ident()?;
  p.env().resolve(&p.prefix(), &x).ok_or_else(||
    ParseError::new(ErrorKind::NameResolution, pos, span, format!("unknown identifier '{x}'")))
}

/// `"tk" : prec := c`
fn simple_notation(p: &mut Parser) -> Result<(String, u32, Name)> {
  let tk = notation_token(p)?;
  p.check_token(":")?;
  let prec = precedence(p)?;
  let action = notation_action(p)?;
  Ok((tk, prec, action))
}

fn infix_like(p: &mut Parser, rbp: impl FnOnce(u32) -> u32) -> Result<()> {
  let (tk, prec, action) = simple_notation(p)?;
  debug!("infix '{tk}' : {prec} := {action}");
  let mut env = p.env().clone();
  env.add_infix(&tk, prec, rbp(prec), action);
  p.set_env(env);
  Ok(())
}

fn infixl_cmd(p: &mut Parser) -> Result<()> { infix_like(p, |prec| prec) }

fn infixr_cmd(p: &mut Parser) -> Result<()> { infix_like(p, |prec| prec.saturating_sub(1)) }

fn infix_cmd(p: &mut Parser) -> Result<()> { infix_like(p, |prec| prec) }

fn prefix_cmd(p: &mut Parser) -> Result<()> {
  let (tk, prec, action) = simple_notation(p)?;
  debug!("prefix '{tk}' : {prec} := {action}");
  let mut env = p.env().clone();
  env.add_prefix(&tk, prec, action);
  p.set_env(env);
  Ok(())
}

fn postfix_cmd(p: &mut Parser) -> Result<()> {
  let (tk, prec, action) = simple_notation(p)?;
  debug!("postfix '{tk}' : {prec} := {action}");
  let mut env = p.env().clone();
  env.add_postfix(&tk, prec, action);
  p.set_env(env);
  Ok(())
}

/// `notation "tk" (x[:prec] | "tk")* := c`
fn notation_cmd(p: &mut Parser) -> Result<()> {
  let tk = notation_token(p)?;
  let mut lits = vec![];
  while !p.curr_is(":=") {
    match p.curr() {
      TokenKind::Str(_) => lits.push(Literal::Const(notation_token(p)?.into())),
      TokenKind::Ident(_) => {
        p.next()?;
        let prec = if p.curr_is(":") { p.next()?; precedence(p)? } else { 0 };
        lits.push(Literal::Var(prec));
      }
      _ => return Err(p.unexpected("notation item or ':='")),
    }
  }
  let action = notation_action(p)?;
  debug!("notation '{tk}' {lits:?} := {action}");
  let mut env = p.env().clone();
  env.add_mixfix(&tk, lits, action);
  p.set_env(env);
  Ok(())
}

fn set_option_cmd(p: &mut Parser) -> Result<()> {
  let span = p.span();
  let (pos, name) = p.check_ident()?;
  let value = match p.name_val().and_then(|v| v.last()) {
    Some("true") => true,
    Some("false") => false,
    _ => return Err(p.unexpected("'true' or 'false'")),
  };
  p.next()?;
  if !p.ios_mut().set_option(&name.to_string(), value) {
    return Err(ParseError::new(ErrorKind::Syntax, pos, span, format!("unknown option '{name}'")))
  }
  debug!("set_option {name} {value}");
  Ok(())
}

fn script_cmd(p: &mut Parser) -> Result<()> {
  let (pos, span) = (p.pos(), p.span());
  let code = p.check_str()?;
  let Some(engine) = p.script() else {
    return Err(p.cmd_error(ErrorKind::Syntax, "no scripting engine is available"))
  };
  engine.exec(&code).map_err(|msg| ParseError::new(ErrorKind::Syntax, pos, span, msg))
}

fn exit_cmd(p: &mut Parser) -> Result<()> {
  p.halt();
  Ok(())
}
