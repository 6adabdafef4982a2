//! Index command handlers.

use anyhow::{Context, Result};
use cassview_core::catalog::SessionCatalog;
use cassview_core::config::Config;
use serde_json::Value;

pub async fn stats(catalog: &SessionCatalog) -> Result<()> {
    let stats = catalog.stats().await;
    if stats.is_empty() {
        println!("No index stats available.");
        return Ok(());
    }
    let json = serde_json::to_string_pretty(&Value::Object(stats)).context("format stats")?;
    println!("{json}");
    Ok(())
}

pub async fn reindex(config: &Config, catalog: &SessionCatalog) -> Result<()> {
    println!("Running {} index --full...", config.cass_bin);
    catalog.reindex().await.context("re-index failed")?;
    println!("Index rebuilt successfully.");
    Ok(())
}
