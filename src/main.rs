use clap::{Parser, Subcommand};
use std::process;
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a board snapshot and summarize it
    Inspect(cmd::inspect::InspectArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(args) => {
            if let Err(e) = cmd::inspect::run(args) {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
    }
}
