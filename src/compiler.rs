//! The `check` subcommand: parse files and report the diagnostics.

use std::fs::File;
use std::io;
use log::{error, info};
use crate::ios::{IoState, Options};
use crate::parser::{ErrorMode, ParserBuilder, DEFAULT_MAX_DEPTH};

/// Parse source files and report any errors
#[derive(clap::Args, Debug)]
pub struct Args {
  /// Stop at the first error in each file
  #[clap(long)]
  pub strict: bool,
  /// Don't print diagnostics, only set the exit status
  #[clap(short, long)]
  pub quiet: bool,
  /// Don't use colors in diagnostics
  #[clap(long)]
  pub no_color: bool,
  /// Maximum nesting depth of expressions
  #[clap(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
  pub max_depth: u32,
  /// The input files
  #[clap(required = true)]
  pub input: Vec<String>,
}

impl Args {
  fn builder(&self, stream_name: &str) -> ParserBuilder {
    let mut ios = IoState::default();
    ios.options.set(Options::SHOW_ERRORS, !self.quiet);
    ios.options.set(Options::COLOR, !self.no_color);
    ParserBuilder {
      ios,
      stream_name: stream_name.to_owned(),
      mode: if self.strict { ErrorMode::Strict } else { ErrorMode::Tolerant },
      max_depth: self.max_depth,
      ..ParserBuilder::default()
    }
  }

  /// Check a single file. Returns true if it had no errors.
  pub fn check_file(&self, path: &str) -> io::Result<bool> {
    let mut p = self.builder(path).build(File::open(path)?)?;
    Ok(match p.run() {
      Ok(ok) => ok,
      Err(e) => {
        p.report(e);
        false
      }
    })
  }

  /// Main entry point for `lean-front check`.
  ///
  /// `lean-front check <INPUT>...` parses each file in turn with a fresh environment,
  /// printing diagnostics as they are found. A file that cannot be read counts as a
  /// file with errors. Returns true if no file had errors.
  #[must_use]
  pub fn main(self) -> bool {
    let mut ok = true;
    for path in &self.input {
      let res = self.check_file(path).unwrap_or_else(|e| {
        error!("{path}: {e}");
        false
      });
      info!("{path}: {}", if res { "ok" } else { "errors" });
      ok &= res;
    }
    ok
  }
}
