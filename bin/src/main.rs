//! chatgrep CLI - search chat-log archives for matching lines.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod display;
mod instance;
mod logging;

use commands::search::SearchArgs;
use instance::InstanceArgs;

#[derive(Parser)]
#[command(name = "chatgrep")]
#[command(about = "Search chat-log archives for matching lines", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log verbosity on stderr (-d, -dd, -ddd). RUST_LOG is used when absent.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    debug: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Search channel logs and print matching lines to stdout
    Search(Box<SearchArgs>),

    /// List the channels an archive instance logs
    Channels {
        #[command(flatten)]
        instance: InstanceArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Search(args) => commands::search::search(*args).await,
        Commands::Channels { instance } => commands::channels::list_channels(&instance).await,
    }
}
