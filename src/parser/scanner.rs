//! The tokenizer.
//!
//! The scanner does not have a fixed set of symbols: it is handed the current
//! [`Environment`] on every call, and matches symbols against its token table
//! (longest match wins). An identifier-shaped lexeme which is registered as a token
//! (such as `fun`, or a command keyword) is returned as a keyword.

use std::fmt;
use std::mem;
use std::rc::Rc;
use num::{BigInt, BigRational};
use front_util::{LinedString, Position, Span};
use crate::environment::{Environment, TokenInfo};
use crate::name::Name;
use super::{ErrorKind, ParseError, Result};

/// The kinds of token.
#[derive(Clone, Debug)]
pub enum TokenKind {
  /// The end of the input.
  Eof,
  /// An identifier, possibly qualified like `Foo.bar`.
  Ident(Name),
  /// A registered token, either symbolic like `:=` or identifier-shaped like `fun`.
  Keyword(TokenInfo),
  /// A numeral such as `42` or `3.14`.
  Num(BigRational),
  /// A string literal, with escapes decoded.
  Str(Rc<str>),
  /// Malformed input. This is the current token after a lexical error.
  Invalid,
}

impl TokenKind {
  /// Returns true if this is the keyword `tk`.
  #[must_use] pub fn is_keyword(&self, tk: &str) -> bool {
    matches!(self, TokenKind::Keyword(info) if &*info.text == tk)
  }
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TokenKind::Eof => f.write_str("end of input"),
      TokenKind::Ident(x) => write!(f, "'{x}'"),
      TokenKind::Keyword(info) => write!(f, "'{}'", info.text),
      TokenKind::Num(n) => write!(f, "'{n}'"),
      TokenKind::Str(s) => write!(f, "{s:?}"),
      TokenKind::Invalid => f.write_str("invalid input"),
    }
  }
}

/// A token together with its location.
#[derive(Clone, Debug)]
pub struct Token {
  /// What the token is.
  pub kind: TokenKind,
  /// The line and column of its first character.
  pub pos: Position,
  /// The bytes it covers.
  pub span: Span,
}

/// Can `c` start an identifier?
#[must_use] pub fn ident_start(c: char) -> bool {
  (c.is_alphabetic() || c == '_') && !matches!(c, 'λ' | 'Π' | 'Σ')
}

/// Can `c` continue an identifier?
#[must_use] pub fn ident_rest(c: char) -> bool {
  ident_start(c) || c.is_ascii_digit() || c == '\''
}

/// The scanner state: the source, the current byte index, and the
/// line and column of that index.
#[derive(Debug)]
pub struct Scanner {
  src: LinedString,
  idx: usize,
  line: u32,
  column: u32,
  warnings: Vec<ParseError>,
}

impl Scanner {
  /// A scanner positioned at the start of `src`.
  #[must_use] pub fn new(src: LinedString) -> Scanner {
    Scanner { src, idx: 0, line: 1, column: 0, warnings: vec![] }
  }

  /// The source being scanned.
  #[must_use] pub fn source(&self) -> &LinedString { &self.src }

  /// The current position.
  #[must_use] pub fn pos(&self) -> Position { Position::new(self.line, self.column) }

  /// Take the warnings found since the last call.
  pub fn take_warnings(&mut self) -> Vec<ParseError> { mem::take(&mut self.warnings) }

  fn rest(&self) -> &str { &self.src.as_str()[self.idx..] }

  fn peek(&self) -> Option<char> { self.rest().chars().next() }

  fn peek2(&self) -> Option<char> { self.rest().chars().nth(1) }

  fn bump(&mut self) -> Option<char> {
    let c = self.peek()?;
    self.idx += c.len_utf8();
    if c == '\n' {
      self.line += 1;
      self.column = 0;
    } else {
      self.column += 1;
    }
    Some(c)
  }

  fn bump_while(&mut self, f: impl Fn(char) -> bool) {
    while self.peek().is_some_and(&f) { self.bump(); }
  }

  fn err(&self, pos: Position, start: usize, msg: &str) -> ParseError {
    ParseError::new(ErrorKind::Lexical, pos, start..self.idx, msg)
  }

  /// Skip whitespace, line comments `-- ...` and (nested) block comments `/- ... -/`.
  fn skip_ws(&mut self) -> Result<()> {
    loop {
      match (self.peek(), self.peek2()) {
        (Some(c), _) if c.is_whitespace() => { self.bump(); }
        (Some('-'), Some('-')) => self.bump_while(|c| c != '\n'),
        (Some('/'), Some('-')) => {
          let (pos, start) = (self.pos(), self.idx);
          self.bump(); self.bump();
          let mut depth = 1_u32;
          while depth > 0 {
            match (self.peek(), self.peek2()) {
              (None, _) => return Err(self.err(pos, start, "unterminated comment")),
              (Some('/'), Some('-')) => { self.bump(); self.bump(); depth += 1 }
              (Some('-'), Some('/')) => { self.bump(); self.bump(); depth -= 1 }
              _ => { self.bump(); }
            }
          }
        }
        _ => return Ok(())
      }
    }
  }

  /// Scan the next token, using the token table of `env`.
  pub fn scan(&mut self, env: &Environment) -> Result<Token> {
    self.skip_ws()?;
    let (pos, start) = (self.pos(), self.idx);
    let kind = match self.peek() {
      None => TokenKind::Eof,
      Some('"') => self.string(pos)?,
      Some(c) if c.is_ascii_digit() => self.number(pos)?,
      Some(c) if ident_start(c) => self.ident(env),
      Some(_) => match env.longest_token(self.rest()) {
        Some(info) => {
          let info = info.clone();
          for _ in info.text.chars() { self.bump(); }
          TokenKind::Keyword(info)
        }
        None => {
          self.bump();
          return Err(self.err(pos, start, "invalid character"))
        }
      }
    };
    Ok(Token { kind, pos, span: (start..self.idx).into() })
  }

  fn ident(&mut self, env: &Environment) -> TokenKind {
    let start = self.idx;
    loop {
      self.bump_while(ident_rest);
      match (self.peek(), self.peek2()) {
        (Some('.'), Some(c)) if ident_start(c) => { self.bump(); }
        _ => break
      }
    }
    let s = &self.src.as_str()[start..self.idx];
    match env.token(s) {
      Some(info) => TokenKind::Keyword(info.clone()),
      None => TokenKind::Ident(Name::from_dotted(s)),
    }
  }

  fn number(&mut self, pos: Position) -> Result<TokenKind> {
    let start = self.idx;
    self.bump_while(|c| c.is_ascii_digit());
    let int_end = self.idx;
    let mut frac = int_end..int_end;
    if self.peek() == Some('.') && self.peek2().is_some_and(|c| c.is_ascii_digit()) {
      self.bump();
      let frac_start = self.idx;
      self.bump_while(|c| c.is_ascii_digit());
      frac = frac_start..self.idx;
    }
    if self.peek().is_some_and(ident_rest) {
      self.bump_while(ident_rest);
      return Err(self.err(pos, start, "malformed numeral"))
    }
    let src = self.src.as_str();
    let digits = format!("{}{}", &src[start..int_end], &src[frac.clone()]);
    let numer = BigInt::parse_bytes(digits.as_bytes(), 10)
      .ok_or_else(|| self.err(pos, start, "malformed numeral"))?;
    let denom = num::pow(BigInt::from(10_u32), frac.len());
    Ok(TokenKind::Num(BigRational::new(numer, denom)))
  }

  fn string(&mut self, pos: Position) -> Result<TokenKind> {
    let start = self.idx;
    self.bump();
    let mut s = String::new();
    loop {
      let esc_pos = self.pos();
      let esc_start = self.idx;
      match self.bump() {
        None => return Err(self.err(pos, start, "unterminated string literal")),
        Some('"') => break,
        Some('\\') => match self.bump() {
          None => return Err(self.err(pos, start, "unterminated string literal")),
          Some('\\') => s.push('\\'),
          Some('"') => s.push('"'),
          Some('n') => s.push('\n'),
          Some('t') => s.push('\t'),
          Some('r') => s.push('\r'),
          Some('x') => match self.hex_escape() {
            Some(c) => s.push(c),
            None => {
              self.warnings.push(ParseError::warn(ErrorKind::Lexical, esc_pos, esc_start..self.idx,
                "invalid hexadecimal escape sequence"));
              s.push_str(&self.src.as_str()[esc_start..self.idx]);
            }
          },
          Some(c) => {
            self.warnings.push(ParseError::warn(ErrorKind::Lexical, esc_pos, esc_start..self.idx,
              format!("unknown escape sequence '\\{c}'")));
            s.push('\\');
            s.push(c);
          }
        },
        Some(c) => s.push(c),
      }
    }
    Ok(TokenKind::Str(s.into()))
  }

  /// Read the two hex digits of a `\xHH` escape, consuming them only if both are valid.
  fn hex_escape(&mut self) -> Option<char> {
    let hi = self.peek()?.to_digit(16)?;
    let lo = self.peek2()?.to_digit(16)?;
    self.bump();
    self.bump();
    char::from_u32(hi * 16 + lo)
  }
}
