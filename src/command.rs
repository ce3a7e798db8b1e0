//! The command registry, mapping a leading keyword to the function that handles it.

use std::collections::HashMap;
use std::rc::Rc;
use front_util::HashMapExt;
use crate::parser::{ParseError, Parser};

/// A command handler. It is called with the command keyword already consumed,
/// and is responsible for parsing the rest of the command.
pub type CmdFn = fn(&mut Parser) -> Result<(), ParseError>;

/// A registered command.
#[derive(Clone, Debug)]
pub struct CmdInfo {
  /// The keyword that starts the command.
  pub name: Rc<str>,
  /// The handler.
  pub f: CmdFn,
}

/// The set of commands a parser accepts.
#[derive(Clone, Debug, Default)]
pub struct CmdTable {
  cmds: HashMap<Rc<str>, CmdInfo>,
}

impl CmdTable {
  /// Register a command, replacing any earlier command with the same keyword.
  pub fn add(&mut self, name: &str, f: CmdFn) {
    let name: Rc<str> = name.into();
    let info = CmdInfo { name: name.clone(), f };
    if let Some((info, mut e)) = self.cmds.try_insert_ext(name, info) {
      log::debug!("replacing command '{}'", e.key());
      e.insert(info);
    }
  }

  /// Look up the command started by `name`.
  #[must_use] pub fn lookup(&self, name: &str) -> Option<&CmdInfo> { self.cmds.get(name) }

  /// The keywords of all registered commands.
  pub fn keys(&self) -> impl Iterator<Item=&str> { self.cmds.keys().map(|k| &**k) }
}
