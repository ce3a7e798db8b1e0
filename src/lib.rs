//! Syntactic front end for a dependently typed proof language.
//!
//! The entry point is [`Parser`](parser::Parser): it reads commands from an input
//! stream, parses the terms, binders and tactics in them into [`Expr`](expr::Expr)
//! and [`Tactic`](tactic::Tactic) trees, and applies their effects to an
//! [`Environment`](environment::Environment). The grammar is not fixed: the token
//! table and the notation tables are part of the environment, and commands like
//! `infixl` and `notation` extend them while the file is being read.
//!
//! ```text
//! USAGE:
//! lean-front check [OPTIONS] <INPUT>...
//!
//! OPTIONS:
//!     -d, --debug            Enable debug logging
//!         --strict           Stop at the first error in each file
//!     -q, --quiet            Don't print diagnostics, only set the exit status
//!         --no-color         Don't use colors in diagnostics
//!         --max-depth <N>    Maximum nesting depth of expressions
//! ```

// rust lints we want
#![warn(bare_trait_objects, elided_lifetimes_in_paths,
  missing_copy_implementations, missing_debug_implementations, future_incompatible,
  rust_2018_idioms, trivial_numeric_casts, variant_size_differences, unreachable_pub,
  unused, missing_docs)]
// all the clippy
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
// all the clippy::restriction lints we want
#![warn(clippy::float_arithmetic,
  clippy::get_unwrap, clippy::integer_division,
  clippy::rc_buffer, clippy::rest_pat_in_fully_bound_structs,
  clippy::string_add, clippy::unwrap_used)]
// all the clippy lints we don't want
#![allow(clippy::cognitive_complexity, clippy::comparison_chain,
  clippy::default_trait_access, clippy::enum_glob_use, clippy::inline_always,
  clippy::manual_map, clippy::map_err_ignore, clippy::missing_const_for_fn,
  clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::module_name_repetitions,
  clippy::multiple_crate_versions, clippy::option_if_let_else, clippy::redundant_pub_crate,
  clippy::semicolon_if_nothing_returned, clippy::shadow_unrelated, clippy::too_many_lines,
  clippy::use_self, clippy::should_implement_trait)]

pub mod name;
pub mod expr;
pub mod tactic;
pub mod environment;
pub mod parser;
pub mod command;
pub mod builtins;
pub mod ios;
pub mod script;
pub mod compiler;

#[cfg(test)]
mod test;

pub use front_util::{BoxError, LinedString, Position, Span, Tag};
pub use environment::Environment;
pub use expr::{Binder, BinderKind, Expr, ExprKind};
pub use name::Name;
pub use parser::{ErrorKind, ErrorLevel, ErrorMode, ParseError, Parser, ParserBuilder, ParserState};
pub use tactic::{Tactic, TacticKind};
