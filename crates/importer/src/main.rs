use smslog_core::pairing::DEFAULT_PAIR_WINDOW_SECS;
use smslog_importer::run_import;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smslog_importer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = smslog_db::create_pool(&database_url).await?;
    smslog_db::health_check(&pool).await?;
    smslog_db::run_migrations(&pool).await?;
    tracing::info!("Database ready");

    let window_secs = match std::env::var("IMPORT_PAIR_WINDOW_SECS") {
        Ok(raw) => raw
            .parse::<i64>()
            .unwrap_or_else(|_| panic!("Invalid IMPORT_PAIR_WINDOW_SECS '{raw}'")),
        Err(_) => DEFAULT_PAIR_WINDOW_SECS,
    };

    let report = run_import(&pool, window_secs).await?;
    tracing::info!(
        incoming = report.incoming_imported,
        outgoing = report.outgoing_imported,
        paired = report.outgoing_paired,
        skipped = report.skipped_missing_channel,
        "Import complete"
    );
    Ok(())
}
