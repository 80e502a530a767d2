use anyhow::Result;
use clap::Parser;

use symlinks_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose, "apply");
    let log = logging::Logger::new("apply");

    commands::apply::run(&args.apply, &log)
}
