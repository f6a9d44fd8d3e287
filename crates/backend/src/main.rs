pub mod shared;
pub mod usecases;

use shared::config::{self, Config, Credentials, SyncMode};
use shared::error::SyncError;
use usecases::u508_sync_remnants_to_ozon::SyncExecutor;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Создаем директорию для логов
    let log_dir = config::resolve_path(config::DEFAULT_LOG_DIR);
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("backend.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,reqwest=warn,hyper=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    let config = config::load_config()?;

    match run(config, std::env::args().nth(1)).await {
        Ok(summary) => {
            println!("{}", summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Sync failed (retryable: {}): {}", e.is_retryable(), e);
            println!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}

/// Режим из первого аргумента, иначе из `[sync] mode`
async fn run(config: Config, mode_arg: Option<String>) -> Result<String, SyncError> {
    let mode = match mode_arg {
        Some(arg) => arg.parse::<SyncMode>()?,
        None => config.sync.mode,
    };
    tracing::info!("Sync mode: {:?}", mode);

    let credentials = Credentials::from_env()?;
    let executor = SyncExecutor::from_config(config, credentials)?;

    match mode {
        SyncMode::All => {
            let report = executor.run().await?;
            Ok(format!(
                "Остатки: {} товаров ({} в наличии), цены: {} товаров",
                report.stocks.items, report.in_stock, report.prices.items
            ))
        }
        SyncMode::Stocks => {
            let remnants = executor.fetch_remnants().await?;
            let (not_empty, stocks) = executor.upload_stocks(&remnants).await?;
            Ok(format!(
                "Остатки: {} товаров ({} в наличии)",
                stocks.len(),
                not_empty.len()
            ))
        }
        SyncMode::Prices => {
            let remnants = executor.fetch_remnants().await?;
            let prices = executor.upload_prices(&remnants).await?;
            Ok(format!("Цены: {} товаров", prices.len()))
        }
    }
}
