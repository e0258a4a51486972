mod atlas_dir;
mod commands;
mod map;
mod progress;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "atlas",
    about = "An interactive map of topics and the prerequisites between them"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create atlas/map.json in the current directory
    Init,
    /// Open the interactive map canvas
    View {
        /// Launch with a built-in sample map (no map file required)
        #[arg(long)]
        demo: bool,
    },
    /// Validate the map file and report structural problems
    Check,
    /// List topics with their parent, prerequisite and unlock counts
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Init => commands::init::run(),
        Command::View { demo } => commands::view::run(demo),
        Command::Check => commands::check::run(),
        Command::List => commands::list::run(),
    }
}
