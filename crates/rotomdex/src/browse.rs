use anyhow::Result;
use clap::Args;

use crate::config::CatalogArgs;

#[derive(Args, Debug, Default)]
pub struct BrowseArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Never try to draw sprites, even on terminals that support images
    #[arg(long)]
    pub no_images: bool,
}

pub fn execute(args: BrowseArgs) -> Result<()> {
    let config = args.catalog.resolve()?;
    crate::tui::run(config, !args.no_images)
}
