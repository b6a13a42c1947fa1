//! Migrate command - copies JSON fixtures into DynamoDB

use std::path::PathBuf;

use clap::Args;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::migration::FixtureMigrator;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Directory holding `<collection>/db.json`, overriding configuration
    #[arg(long)]
    pub fixtures_dir: Option<PathBuf>,
}

/// Run the migration; any failed batch makes the process exit non-zero
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load()?;
    if let Some(dir) = args.fixtures_dir {
        config.fixtures.dir = dir;
    }

    logging::init_logging(&config.logging, "migration");

    info!(
        region = %config.storage.region,
        users = %config.storage.tables.users,
        threads = %config.storage.tables.threads,
        posts = %config.storage.tables.posts,
        "Migrating fixtures to DynamoDB"
    );

    let client = crate::create_table_client(&config).await;
    let migrator = FixtureMigrator::new(
        client,
        config.storage.tables.clone(),
        config.fixtures.dir.clone(),
    );

    let report = migrator.run().await?;

    let unprocessed: usize = report.collections.iter().map(|c| c.unprocessed).sum();
    if unprocessed > 0 {
        warn!(unprocessed, "Some items were left unprocessed");
    }

    info!(items = report.total_migrated(), "Migration finished");
    Ok(())
}
