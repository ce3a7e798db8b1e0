//! The interface to an embedded scripting engine, used by the `script` command.

use front_util::BoxError;

/// A scripting engine that can run the code of a `script "..."` command.
pub trait ScriptEngine {
  /// Run a block of code. An `Err` is reported as an error of the command.
  fn exec(&mut self, code: &str) -> Result<(), BoxError>;
}
