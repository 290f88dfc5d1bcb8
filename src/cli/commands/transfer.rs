//! Import/export command handlers

use std::path::Path;

use crate::config::Config;
use crate::db::{JsonCollections, Store};
use crate::services::transfer::{ImportCounts, export_collections, import_collections};

async fn open_store(config: &Config) -> anyhow::Result<Store> {
    Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
}

fn print_counts(name: &str, counts: ImportCounts) {
    println!(
        "  {name:<12} {:>5} imported, {:>5} skipped",
        counts.imported, counts.skipped
    );
}

pub async fn cmd_import(config: &Config, dir: &Path) -> anyhow::Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Import directory does not exist: {}", dir.display());
    }

    let store = open_store(config).await?;
    let summary = import_collections(&store, &JsonCollections::new(dir)).await?;

    println!("Imported from {}", dir.display());
    print_counts("users", summary.users);
    print_counts("courses", summary.courses);
    print_counts("assignments", summary.assignments);
    print_counts("notes", summary.notes);

    Ok(())
}

pub async fn cmd_export(config: &Config, dir: &Path) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let summary = export_collections(&store, &JsonCollections::new(dir)).await?;

    println!("Exported to {}", dir.display());
    println!(
        "  {} users, {} courses, {} assignments, {} notes",
        summary.users, summary.courses, summary.assignments, summary.notes
    );

    Ok(())
}
