use clap::Parser;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

#[derive(clap::Parser, Debug)]
#[clap(name = "lean-front", version, about = "Front end for a dependently typed proof language")]
struct Cli {
  /// Enable debug logging
  #[clap(short, long, global = true)]
  debug: bool,
  #[clap(subcommand)]
  cmd: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
  Check(lean_front::compiler::Args),
}

fn main() {
  let cli = Cli::parse();
  let level = if cli.debug { LevelFilter::Debug } else { LevelFilter::Warn };
  let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
  let ok = match cli.cmd {
    Command::Check(args) => args.main(),
  };
  if !ok { std::process::exit(1) }
}
