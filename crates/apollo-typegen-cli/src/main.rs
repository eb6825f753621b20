mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "apollo-typegen", about = "Generate typed Rust clients for GraphQL operations")]
struct Typegen {
    #[command(subcommand)]
    pub command: Command,

    /// Print debug logs.
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,
}

impl Typegen {
    pub fn run(&self) -> Result<()> {
        let level = if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        };
        let _ = env_logger::Builder::from_default_env()
            .filter_level(level)
            .try_init();

        match &self.command {
            Command::Generate(command) => command.run(),
        }
    }
}

fn main() -> Result<()> {
    let app = Typegen::parse();
    app.run()
}
