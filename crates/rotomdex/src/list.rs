use anyhow::Result;
use clap::Args;

use crate::config::CatalogArgs;
use crate::display::{entries_json, render_lines};
use crate::load::load_catalog;

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ListArgs) -> Result<()> {
    let config = args.catalog.resolve()?;
    let catalog = load_catalog(&config)?;
    let entries = catalog.visible();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries_json(&entries))?);
        return Ok(());
    }

    let color = colored::control::SHOULD_COLORIZE.should_colorize();
    for line in render_lines(&entries, color) {
        println!("{}", line);
    }
    Ok(())
}
