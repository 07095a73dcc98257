use anyhow::Result;
use colored::Colorize;
use indicatif::ProgressBar;
use rotomdex_catalog::{Catalog, CatalogConfig, CatalogLoader, LoadStatus};
use std::time::{Duration, Instant};

/// Load the catalog with a spinner on stderr. A failed load is an error.
pub fn load_catalog(config: &CatalogConfig) -> Result<Catalog> {
    let loader = CatalogLoader::from_config(config)?;

    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Loading {} {}...", config.limit, config.resource));

    let start = Instant::now();
    let state = loader.load(config.limit);
    spinner.finish_and_clear();

    if let LoadStatus::Failed(msg) = &state.status {
        anyhow::bail!("Failed to load catalog: {}", msg);
    }

    if !state.report.is_complete() {
        eprintln!(
            "{} {} ({:.1}s)",
            "!".yellow(),
            state.report,
            start.elapsed().as_secs_f64()
        );
        for failure in &state.report.failures {
            eprintln!("    • {}: {}", failure.name, failure.reason.dimmed());
        }
    }

    Ok(Catalog::from_load(state))
}
