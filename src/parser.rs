//! The parser for the surface language.
//!
//! A [`Parser`] owns one input stream and one [`Environment`], and is driven by
//! [`Parser::run`], which reads commands until the end of the input. Each command is
//! dispatched through the [`CmdTable`] to a handler, which uses the expression,
//! binder and tactic parsers defined in the submodules. Commands can change the
//! environment (for example by declaring new notation), and the change is visible to
//! every token scanned afterwards.
//!
//! Errors are reported as [`ParseError`]s. What happens to an error which escapes a
//! command depends on the [`ErrorMode`]: in strict mode it is returned from `run`,
//! while in tolerant mode it is displayed and the parser skips ahead to the next
//! command keyword.

mod binder;
mod expr;
mod namespace;
mod pos_table;
mod pratt;
mod scanner;
mod scope;
mod tactic;

use std::fmt;
use std::io::{self, Read};
use std::rc::Rc;
use log::{debug, info};
use num::BigRational;
use front_util::{BoxError, LinedString, Position, Span};
use crate::builtins::builtin_cmds;
use crate::command::CmdTable;
use crate::environment::{Environment, TokenInfo};
use crate::ios::IoState;
use crate::name::Name;
use crate::script::ScriptEngine;

pub use binder::Parameter;
pub use namespace::{Namespaces, ScopeKind};
pub use pos_table::PosTable;
pub use scanner::{Scanner, Token, TokenKind};
pub use scope::ScopeStack;

/// The default bound on the nesting depth of expressions and tactics.
pub const DEFAULT_MAX_DEPTH: u32 = 512;

/// The severity of a diagnostic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorLevel {
  /// Informational message.
  Info,
  /// A problem which does not stop processing, such as an unknown string escape.
  Warning,
  /// An error, which aborts the current command.
  Error,
}

impl fmt::Display for ErrorLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      ErrorLevel::Info => "info",
      ErrorLevel::Warning => "warning",
      ErrorLevel::Error => "error",
    })
  }
}

/// The category of a diagnostic.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
  /// A malformed token.
  Lexical,
  /// An unexpected or missing token or construct.
  Syntax,
  /// An unmatched or mismatched `end`, or a command used in the wrong kind of scope.
  Scope,
  /// An identifier which does not resolve to anything.
  NameResolution,
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      ErrorKind::Lexical => "lexical",
      ErrorKind::Syntax => "syntax",
      ErrorKind::Scope => "scope",
      ErrorKind::NameResolution => "name resolution",
    })
  }
}

/// A parse error, or a diagnostic of lower severity.
#[derive(Debug)]
pub struct ParseError {
  /// Where the problem was found.
  pub pos: Position,
  /// The bytes of the input the problem refers to (possibly empty).
  pub span: Span,
  /// The severity.
  pub level: ErrorLevel,
  /// The category.
  pub kind: ErrorKind,
  /// The message.
  pub msg: BoxError,
}

impl Clone for ParseError {
  fn clone(&self) -> Self {
    let &ParseError { pos, span, level, kind, ref msg } = self;
    ParseError { pos, span, level, kind, msg: format!("{msg}").into() }
  }
}

impl ParseError {
  /// Construct an error of the given kind at [`Error`](ErrorLevel::Error) severity.
  pub fn new(kind: ErrorKind, pos: Position, span: impl Into<Span>, msg: impl Into<BoxError>) -> ParseError {
    ParseError { pos, span: span.into(), level: ErrorLevel::Error, kind, msg: msg.into() }
  }

  /// Construct a warning.
  pub fn warn(kind: ErrorKind, pos: Position, span: impl Into<Span>, msg: impl Into<BoxError>) -> ParseError {
    ParseError { level: ErrorLevel::Warning, ..ParseError::new(kind, pos, span, msg) }
  }
}

impl fmt::Display for ParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {} {}: {}", self.pos, self.kind, self.level, self.msg)
  }
}

impl std::error::Error for ParseError {}

/// Newtype for `Result<T, ParseError>`.
pub type Result<T> = std::result::Result<T, ParseError>;

/// What the command driver does with an error that escapes a command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ErrorMode {
  /// Stop at the first error and return it from [`Parser::run`].
  Strict,
  /// Report the error, skip to the next command and keep going.
  #[default]
  Tolerant,
}

/// The state of the command driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParserState {
  /// Commands are being processed.
  Running,
  /// The end of the input or an `exit` command was reached.
  HaltedClean,
  /// A strict mode error stopped processing.
  HaltedError,
}

/// The configuration of a [`Parser`].
pub struct ParserBuilder {
  /// The initial environment.
  pub env: Environment,
  /// Options and output.
  pub ios: IoState,
  /// The name of the input, used in diagnostics.
  pub stream_name: String,
  /// The engine for `script` commands, if any.
  pub script: Option<Box<dyn ScriptEngine>>,
  /// Strict or tolerant error handling.
  pub mode: ErrorMode,
  /// The commands to accept.
  pub cmds: CmdTable,
  /// The maximum nesting depth of expressions and tactics.
  pub max_depth: u32,
}

impl fmt::Debug for ParserBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ParserBuilder")
      .field("stream_name", &self.stream_name)
      .field("mode", &self.mode)
      .field("max_depth", &self.max_depth)
      .finish_non_exhaustive()
  }
}

impl Default for ParserBuilder {
  fn default() -> Self {
    ParserBuilder {
      env: Environment::new(),
      ios: IoState::default(),
      stream_name: "<input>".into(),
      script: None,
      mode: ErrorMode::default(),
      cmds: builtin_cmds(),
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }
}

impl ParserBuilder {
  /// Read the whole of `reader` and build a parser for it.
  pub fn build(self, mut reader: impl Read) -> io::Result<Parser> {
    let mut s = String::new();
    reader.read_to_string(&mut s)?;
    Ok(self.build_str(&s))
  }

  /// Build a parser for the string `s`.
  #[must_use] pub fn build_str(self, s: &str) -> Parser {
    let ParserBuilder { mut env, ios, stream_name, script, mode, cmds, max_depth } = self;
    for k in cmds.keys() { env.add_token(k) }
    let scanner = Scanner::new(LinedString::from(s));
    let mut p = Parser {
      env, ios, stream_name, script, mode, cmds, max_depth,
      depth: 0,
      curr: Token { kind: TokenKind::Eof, pos: Position::default(), span: 0.into() },
      scanner,
      lex_error: None,
      locals: ScopeStack::default(),
      next_idx: 0,
      namespaces: Namespaces::default(),
      pos_table: PosTable::default(),
      diagnostics: vec![],
      found_errors: false,
      state: ParserState::Running,
      cmd_pos: Position::default(),
      cmd_span: 0.into(),
    };
    let _ = p.next();
    p
  }
}

/// A parser for one input stream. See the [module documentation](self).
pub struct Parser {
  env: Environment,
  ios: IoState,
  stream_name: String,
  script: Option<Box<dyn ScriptEngine>>,
  mode: ErrorMode,
  cmds: CmdTable,
  max_depth: u32,
  depth: u32,
  scanner: Scanner,
  curr: Token,
  /// The error which produced the current [`TokenKind::Invalid`] token.
  lex_error: Option<ParseError>,
  locals: ScopeStack,
  /// The disambiguation index of the next local variable.
  next_idx: u32,
  namespaces: Namespaces,
  pos_table: PosTable,
  diagnostics: Vec<ParseError>,
  found_errors: bool,
  state: ParserState,
  cmd_pos: Position,
  cmd_span: Span,
}

impl fmt::Debug for Parser {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Parser")
      .field("stream_name", &self.stream_name)
      .field("curr", &self.curr)
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}

impl Parser {
  /// Make a parser for `s` with the default configuration.
  #[must_use] pub fn new(s: &str) -> Parser { ParserBuilder::default().build_str(s) }

  /// The position of the current token.
  #[must_use] pub fn pos(&self) -> Position { self.curr.pos }

  /// The span of the current token.
  #[must_use] pub fn span(&self) -> Span { self.curr.span }

  /// The current token.
  #[must_use] pub fn curr(&self) -> &TokenKind { &self.curr.kind }

  /// Advance to the next token, and return it.
  ///
  /// If the input at this point is malformed, the current token becomes
  /// [`TokenKind::Invalid`] and the error is returned. Warnings found along the way
  /// are reported directly.
  pub fn scan(&mut self) -> Result<&TokenKind> {
    let res = self.scanner.scan(&self.env);
    for w in self.scanner.take_warnings() { self.report(w) }
    match res {
      Ok(tk) => {
        self.curr = tk;
        self.lex_error = None;
        Ok(&self.curr.kind)
      }
      Err(e) => {
        self.curr = Token { kind: TokenKind::Invalid, pos: e.pos, span: e.span };
        self.lex_error = Some(e.clone());
        Err(e)
      }
    }
  }

  /// Advance to the next token.
  pub fn next(&mut self) -> Result<()> { self.scan().map(|_| ()) }

  /// The value of the current token, if it is a numeral.
  #[must_use] pub fn num_val(&self) -> Option<&BigRational> {
    if let TokenKind::Num(n) = &self.curr.kind { Some(n) } else { None }
  }

  /// The name of the current token, if it is an identifier.
  #[must_use] pub fn name_val(&self) -> Option<&Name> {
    if let TokenKind::Ident(n) = &self.curr.kind { Some(n) } else { None }
  }

  /// The contents of the current token, if it is a string literal.
  #[must_use] pub fn str_val(&self) -> Option<&str> {
    if let TokenKind::Str(s) = &self.curr.kind { Some(s) } else { None }
  }

  /// The token table entry of the current token, if it is a keyword or symbol.
  #[must_use] pub fn token_info(&self) -> Option<&TokenInfo> {
    if let TokenKind::Keyword(info) = &self.curr.kind { Some(info) } else { None }
  }

  /// Returns true if the current token is the keyword `tk`.
  #[must_use] pub fn curr_is(&self, tk: &str) -> bool { self.curr.kind.is_keyword(tk) }

  /// The name of the input stream.
  #[must_use] pub fn stream_name(&self) -> &str { &self.stream_name }

  /// The source text.
  #[must_use] pub fn source(&self) -> &LinedString { self.scanner.source() }

  /// The current environment.
  #[must_use] pub fn env(&self) -> &Environment { &self.env }

  /// Replace the environment. Tokens scanned from now on use the new token table.
  pub fn set_env(&mut self, env: Environment) { self.env = env }

  /// Consume the parser, returning the final environment.
  #[must_use] pub fn into_env(self) -> Environment { self.env }

  /// The options and output channel.
  #[must_use] pub fn ios(&self) -> &IoState { &self.ios }

  /// The options and output channel, mutably.
  pub fn ios_mut(&mut self) -> &mut IoState { &mut self.ios }

  /// The scripting engine, if one was provided.
  pub fn script(&mut self) -> Option<&mut (dyn ScriptEngine + 'static)> { self.script.as_deref_mut() }

  /// Record `pos` as the position of the node `e`.
  pub fn save_pos(&mut self, e: &crate::expr::Expr, pos: Position) { self.pos_table.save_pos(e, pos) }

  /// The position table for all nodes built so far.
  #[must_use] pub fn pos_table(&self) -> &PosTable { &self.pos_table }

  /// The namespace stack.
  #[must_use] pub fn namespaces(&self) -> &Namespaces { &self.namespaces }

  /// All diagnostics reported so far, in order.
  #[must_use] pub fn diagnostics(&self) -> &[ParseError] { &self.diagnostics }

  /// Returns true if an error (not a warning) has been reported.
  #[must_use] pub fn found_errors(&self) -> bool { self.found_errors }

  /// The state of the command driver.
  #[must_use] pub fn state(&self) -> ParserState { self.state }

  /// The position of the keyword of the command being processed.
  #[must_use] pub fn cmd_pos(&self) -> Position { self.cmd_pos }

  /// Construct an error at the current token.
  pub fn error(&self, kind: ErrorKind, msg: impl Into<BoxError>) -> ParseError {
    ParseError::new(kind, self.curr.pos, self.curr.span, msg)
  }

  /// Construct an error at the keyword of the current command.
  pub fn cmd_error(&self, kind: ErrorKind, msg: impl Into<BoxError>) -> ParseError {
    ParseError::new(kind, self.cmd_pos, self.cmd_span, msg)
  }

  /// Construct a syntax error at the current token, mentioning what was found there.
  pub fn unexpected(&self, expected: &str) -> ParseError {
    match &self.curr.kind {
      TokenKind::Eof => self.error(ErrorKind::Syntax, format!("unexpected end of input, expected {expected}")),
      tk => self.error(ErrorKind::Syntax, format!("unexpected token {tk}, expected {expected}")),
    }
  }

  /// Consume the keyword `tk`, or fail.
  pub fn check_token(&mut self, tk: &str) -> Result<()> {
    if !self.curr_is(tk) { return Err(self.unexpected(&format!("'{tk}'"))) }
    self.next()
  }

  /// Consume an identifier and return it with its position, or fail.
  pub fn check_ident(&mut self) -> Result<(Position, Name)> {
    let pos = self.pos();
    let Some(name) = self.name_val().cloned() else { return Err(self.unexpected("identifier")) };
    self.next()?;
    Ok((pos, name))
  }

  /// Consume a string literal and return it, or fail.
  pub fn check_str(&mut self) -> Result<Rc<str>> {
    let TokenKind::Str(s) = &self.curr.kind else { return Err(self.unexpected("string literal")) };
    let s = s.clone();
    self.next()?;
    Ok(s)
  }

  /// Report a diagnostic: record it, display it, and note whether it is an error.
  pub fn report(&mut self, e: ParseError) {
    if e.level == ErrorLevel::Error { self.found_errors = true }
    self.ios.report(&self.stream_name, self.scanner.source(), &e);
    self.diagnostics.push(e);
  }

  /// Go one level deeper in the nesting of expressions and tactics. Every successful
  /// call must be matched by a call to [`leave`](Self::leave).
  pub(crate) fn enter(&mut self) -> Result<()> {
    if self.depth >= self.max_depth {
      return Err(self.error(ErrorKind::Syntax,
        format!("maximum nesting depth ({}) exceeded", self.max_depth)))
    }
    self.depth += 1;
    Ok(())
  }

  pub(crate) fn leave(&mut self) { self.depth -= 1 }

  /// Run `f` with a new frame of local variables, which is popped afterwards
  /// whether or not `f` succeeds.
  pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
    self.locals.push();
    let res = f(self);
    self.locals.pop();
    res
  }

  pub(crate) fn push_local_frame(&mut self) { self.locals.push() }

  pub(crate) fn pop_local_frame(&mut self) { self.locals.pop() }

  /// Allocate a new disambiguation index for a local variable.
  pub(crate) fn fresh_idx(&mut self) -> u32 {
    let i = self.next_idx;
    self.next_idx += 1;
    i
  }

  /// Look up a local variable in the enclosing frames.
  #[must_use] pub fn lookup_local(&self, name: &Name) -> Option<(&crate::expr::Expr, u32)> {
    self.locals.lookup(name)
  }

  /// Stop processing commands after the current one.
  pub(crate) fn halt(&mut self) { self.state = ParserState::HaltedClean }

  /// Process commands until the end of the input, an `exit` command, or (in strict
  /// mode) the first error.
  ///
  /// Returns `Ok(true)` if no errors were found and `Ok(false)` otherwise.
  /// In strict mode the first error is returned instead, without being reported.
  pub fn run(&mut self) -> Result<bool> {
    info!("processing {}", self.stream_name);
    self.state = ParserState::Running;
    while self.state == ParserState::Running {
      if let Err(e) = self.parse_command() {
        match self.mode {
          ErrorMode::Strict => {
            self.found_errors = true;
            self.state = ParserState::HaltedError;
            return Err(e)
          }
          ErrorMode::Tolerant => {
            self.report(e);
            self.sync_command();
          }
        }
      }
    }
    info!("finished {}: {} diagnostics", self.stream_name, self.diagnostics.len());
    Ok(!self.found_errors)
  }

  fn parse_command(&mut self) -> Result<()> {
    let cmd = match &self.curr.kind {
      TokenKind::Eof => {
        self.state = ParserState::HaltedClean;
        return Ok(())
      }
      TokenKind::Invalid => {
        let e = self.lex_error.take();
        return Err(e.unwrap_or_else(|| self.unexpected("command")))
      }
      TokenKind::Keyword(info) => self.cmds.lookup(&info.text).map(|c| (c.name.clone(), c.f)),
      _ => None,
    };
    let Some((name, f)) = cmd else { return Err(self.unexpected("command")) };
    debug!("{}: command '{}'", self.curr.pos, name);
    self.cmd_pos = self.pos();
    self.cmd_span = self.span();
    self.next()?;
    f(self)
  }

  /// Returns true if the current token starts a command, or is the end of the input.
  fn at_command_boundary(&self) -> bool {
    match &self.curr.kind {
      TokenKind::Eof => true,
      TokenKind::Keyword(info) => self.cmds.lookup(&info.text).is_some(),
      _ => false,
    }
  }

  /// Skip tokens until the next command keyword or the end of the input.
  /// Lexical errors in the skipped input are not reported.
  fn sync_command(&mut self) {
    let start = self.pos();
    while !self.at_command_boundary() {
      let _ = self.next();
    }
    self.lex_error = None;
    debug!("recovered from {} to {}", start, self.pos());
  }
}
