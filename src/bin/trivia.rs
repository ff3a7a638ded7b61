use anyhow::Context;
use clap::Parser;
use trivia_api::db;
use trivia_api::server::run_server;
use trivia_api::settings::get_settings;
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Apply database migrations and exit without serving
    #[clap(long)]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = get_settings().context("Failed to load configuration")?;
    let pool = db::establish_connection(&settings.database)
        .await
        .with_context(|| format!("Cannot open database {}", settings.database.path))?;

    tracing::info!("Running db migrations...");
    db::run_migrations(&pool).await?;
    if cli.migrate_only {
        return Ok(());
    }

    run_server(pool, &settings.application.address()).await
}
