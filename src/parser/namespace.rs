//! The stack of open namespaces, scopes and structures.

use std::fmt;
use log::debug;
use front_util::Position;
use crate::name::Name;
use super::{ErrorKind, ParseError, Parser, Result};

/// The kinds of naming context.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
  /// `scope ... end`: contributes no name segment.
  Scope,
  /// `namespace N ... end N`: declarations inside are prefixed by `N`.
  Namespace,
  /// `structure N ... end N`: like a namespace, but also owns the
  /// `variable`s declared inside it.
  Structure,
}

impl fmt::Display for ScopeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      ScopeKind::Scope => "scope",
      ScopeKind::Namespace => "namespace",
      ScopeKind::Structure => "structure",
    })
  }
}

#[derive(Clone, Debug)]
struct Frame {
  kind: ScopeKind,
  name: Option<Name>,
  /// The full prefix inside this frame.
  prefix: Name,
}

/// The open naming contexts, innermost last.
#[derive(Clone, Debug, Default)]
pub struct Namespaces {
  frames: Vec<Frame>,
}

impl Namespaces {
  /// The fully qualified prefix of the innermost frame.
  #[must_use] pub fn prefix(&self) -> Name {
    self.frames.last().map_or_else(Name::anonymous, |f| f.prefix.clone())
  }

  /// The kind of the innermost frame.
  #[must_use] pub fn innermost(&self) -> Option<ScopeKind> { self.frames.last().map(|f| f.kind) }

  /// The number of open frames.
  #[must_use] pub fn depth(&self) -> usize { self.frames.len() }

  /// Open a frame. Namespaces and structures add `name` to the prefix.
  pub fn push(&mut self, kind: ScopeKind, name: Option<Name>) {
    let prefix = match (kind, &name) {
      (ScopeKind::Namespace | ScopeKind::Structure, Some(n)) => self.prefix().join(n),
      _ => self.prefix(),
    };
    self.frames.push(Frame { kind, name, prefix })
  }

  /// Close the innermost frame, checking that it has kind `kind` and name `name`
  /// when these are given. On failure, nothing is popped.
  pub fn pop(&mut self, kind: Option<ScopeKind>, name: Option<&Name>) -> std::result::Result<ScopeKind, String> {
    let Some(top) = self.frames.last() else {
      return Err("invalid 'end', there is no open namespace, scope or structure".into())
    };
    if let Some(k) = kind {
      if k != top.kind { return Err(format!("invalid 'end', expected to close a {k} but the innermost frame is a {}", top.kind)) }
    }
    if let Some(n) = name {
      if top.name.as_ref() != Some(n) {
        return Err(match &top.name {
          Some(m) => format!("invalid 'end', expected '{m}' but found '{n}'"),
          None => format!("invalid 'end', the innermost {} has no name but found '{n}'", top.kind),
        })
      }
    }
    let kind = top.kind;
    self.frames.pop();
    Ok(kind)
  }
}

impl Parser {
  /// Open a naming context. Opening a structure also opens a frame for its variables.
  pub fn push_scope(&mut self, kind: ScopeKind, name: Option<Name>) {
    debug!("open {kind} {}", name.as_ref().map_or(String::new(), ToString::to_string));
    if kind == ScopeKind::Structure { self.push_local_frame() }
    self.namespaces.push(kind, name);
  }

  /// Close the innermost naming context. `kind` and `name`, if given, must match it.
  /// Failures are scope errors at `pos`.
  pub fn pop_scope(&mut self, kind: Option<ScopeKind>, name: Option<&Name>, pos: Position) -> Result<()> {
    let kind = self.namespaces.pop(kind, name).map_err(|msg| {
      let idx = self.source().to_idx(pos).unwrap_or(self.span().start);
      ParseError::new(ErrorKind::Scope, pos, idx, msg)
    })?;
    debug!("close {kind}, prefix now {}", self.namespaces.prefix());
    if kind == ScopeKind::Structure { self.pop_local_frame() }
    Ok(())
  }

  /// The current namespace prefix.
  #[must_use] pub fn prefix(&self) -> Name { self.namespaces.prefix() }
}
