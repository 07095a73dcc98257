#[cfg(all(feature = "mimalloc", not(target_family = "wasm")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;

mod browse;
mod config;
mod display;
mod list;
mod load;
mod search;
mod tui;

#[derive(Parser)]
#[command(name = "rotomdex")]
#[command(about = "Browse and search the PokeAPI catalog", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive browser (default)
    #[command(alias = "b")]
    Browse(browse::BrowseArgs),

    /// Print every loaded entry
    #[command(alias = "ls")]
    List(list::ListArgs),

    /// Print entries whose name contains a query
    #[command(alias = "s")]
    Search(search::SearchArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The browser owns the terminal, so it stays silent unless --debug is given
    let interactive = matches!(cli.command, None | Some(Commands::Browse(_)));
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else if interactive {
        Env::default().default_filter_or("off")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    match cli.command {
        None => browse::execute(browse::BrowseArgs::default()),
        Some(Commands::Browse(args)) => browse::execute(args),
        Some(Commands::List(args)) => list::execute(args),
        Some(Commands::Search(args)) => search::execute(args),
    }
}
