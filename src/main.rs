use anyhow::Result;
use clap::Parser;

use countylens::cli::{Cli, Commands};
use countylens::commands::{render, score};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Render(args) => render::run(&cli, args),
        Commands::Score(args) => score::run(&cli, args),
    }
}
