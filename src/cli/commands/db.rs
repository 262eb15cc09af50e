use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use sqlx::Executor;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::DatabaseManager;

const SCHEMA_SQL: &str = include_str!("../../../sql/jobly-schema.sql");
const SEED_SQL: &str = include_str!("../../../sql/jobly-seed.sql");

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Drop and recreate the companies and jobs tables")]
    Init {
        #[arg(long, help = "Load sample companies and jobs afterwards")]
        seed: bool,
    },

    #[command(about = "Check that the configured database answers")]
    Ping,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let database = &config::config().database;
    let pool = DatabaseManager::connect(database)
        .await
        .context("connecting to database")?;

    match cmd {
        DbCommands::Init { seed } => {
            pool.execute(SCHEMA_SQL).await.context("applying schema")?;
            if seed {
                pool.execute(SEED_SQL).await.context("loading seed data")?;
            }
            tracing::info!("Initialized database (seed={})", seed);
            output_success(
                &output_format,
                "Database initialized",
                Some(json!({ "seeded": seed })),
            )
        }
        DbCommands::Ping => output_success(&output_format, "Database is reachable", None),
    }
}
