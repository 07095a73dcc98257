use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::config::CatalogArgs;
use crate::display::{entries_json, render_lines};
use crate::load::load_catalog;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Case-insensitive name substring; blank shows everything
    pub query: String,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: SearchArgs) -> Result<()> {
    let config = args.catalog.resolve()?;
    let mut catalog = load_catalog(&config)?;
    catalog.set_query(&args.query);
    let entries = catalog.visible();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries_json(&entries))?);
        return Ok(());
    }

    if entries.is_empty() {
        eprintln!(
            "{} No entries match '{}' ({} loaded)",
            "!".yellow(),
            args.query,
            catalog.entries().len()
        );
        return Ok(());
    }

    let color = colored::control::SHOULD_COLORIZE.should_colorize();
    for line in render_lines(&entries, color) {
        println!("{}", line);
    }
    Ok(())
}
