use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::near::NearArgs;

mod near;
mod parsers;
mod summary;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the id of and distance to the nearest feature of NEAR on every feature of INPUT
    Near {
        #[command(flatten)]
        args: NearArgs,
    },
}

fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Near { args } => near::run(args)?,
    }

    Ok(())
}
