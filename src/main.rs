// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, parse arguments, dispatch.
// - Returns `anyhow::Result` so any failure ends the command with a
//   diagnostic and a non-zero exit status.

use clap::Parser;
use twit::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    // `RUST_LOG=debug` shows the requests being made.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    cli::run(Cli::parse())
}
