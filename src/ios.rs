//! Output channel and user options for a parser run.
//!
//! Diagnostics are rendered with [`annotate_snippets`], showing the offending source line
//! with a caret under the span of the error.

use std::fmt;
use std::io::{self, Write};
use annotate_snippets::{Level, Renderer, Snippet};
use bitflags::bitflags;
use typed_arena::Arena;
use front_util::LinedString;
use crate::parser::{ErrorLevel, ParseError};

bitflags! {
  /// User settable options, changed with the `set_option` command.
  #[derive(Copy, Clone, Debug, PartialEq, Eq)]
  pub struct Options: u8 {
    /// Print a line for every processed declaration.
    const VERBOSE = 1;
    /// Print diagnostics as they are found. When off, errors are still counted.
    const SHOW_ERRORS = 2;
    /// Use ANSI colors when rendering diagnostics.
    const COLOR = 4;
  }
}

impl Default for Options {
  fn default() -> Self { Options::SHOW_ERRORS | Options::COLOR }
}

impl Options {
  /// Look up an option by the name used in `set_option`.
  #[must_use] pub fn by_option_name(name: &str) -> Option<Options> {
    match name {
      "verbose" => Some(Options::VERBOSE),
      "show_errors" => Some(Options::SHOW_ERRORS),
      "color" => Some(Options::COLOR),
      _ => None,
    }
  }
}

impl ErrorLevel {
  /// Convert an [`ErrorLevel`] to the corresponding annotation [`Level`].
  #[must_use]
  pub fn to_annotation_level(self) -> Level {
    match self {
      ErrorLevel::Info => Level::Info,
      ErrorLevel::Warning => Level::Warning,
      ErrorLevel::Error => Level::Error,
    }
  }
}

/// The options and output writer of a parser.
pub struct IoState {
  out: Box<dyn Write>,
  /// The current option settings.
  pub options: Options,
}

impl fmt::Debug for IoState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("IoState").field("options", &self.options).finish_non_exhaustive()
  }
}

impl Default for IoState {
  fn default() -> Self { IoState::new(Box::new(io::stdout())) }
}

impl IoState {
  /// Construct an [`IoState`] writing to `out`, with the default options.
  #[must_use] pub fn new(out: Box<dyn Write>) -> Self { IoState { out, options: Options::default() } }

  /// Construct an [`IoState`] which discards all output.
  #[must_use] pub fn sink() -> Self { IoState::new(Box::new(io::sink())) }

  /// Set or clear an option by name. Returns false if there is no such option.
  pub fn set_option(&mut self, name: &str, value: bool) -> bool {
    let Some(opt) = Options::by_option_name(name) else { return false };
    self.options.set(opt, value);
    true
  }

  /// Write a line to the output. Write failures are logged, not propagated.
  pub fn println(&mut self, args: fmt::Arguments<'_>) {
    if let Err(e) = writeln!(self.out, "{args}") {
      log::warn!("failed to write output: {e}")
    }
  }

  /// Render a diagnostic against the source it was found in.
  pub fn report(&mut self, stream_name: &str, file: &LinedString, e: &ParseError) {
    if !self.options.contains(Options::SHOW_ERRORS) { return }
    let arena = Arena::new();
    let title: &str = arena.alloc(format!("{} ({})", e.msg, e.kind));
    let level = e.level.to_annotation_level();
    let first = file.line_span(e.span.start);
    let last = file.line_span(e.span.end);
    let src = &file[first.join(last)];
    let start = e.span.start - first.start;
    let end = (e.span.end - first.start).min(src.len());
    let msg = level.title(title).snippet(
      Snippet::source(src)
        .line_start(front_util::u32_as_usize(e.pos.line))
        .origin(stream_name)
        .annotation(level.span(start..end.max(start))));
    let renderer = if self.options.contains(Options::COLOR) { Renderer::styled() } else { Renderer::plain() };
    self.println(format_args!("{}", renderer.render(msg)));
  }
}
