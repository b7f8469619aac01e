//! Homestay booking data pass
//!
//! Non-interactive entry point: loads the three data files, reports what
//! survived decoding along with the per-homestay statistics, then rewrites
//! the files in canonical form.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use homestay_booking::{config::AppConfig, repository::Repository, services::Services};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("homestay_booking={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting homestay booking core v{}", env!("CARGO_PKG_VERSION"));

    let repository = Repository::new(&config.storage);
    repository.load_all()?;

    let services = Services::new(repository.clone());

    for row in services.stats.tourists_per_homestay() {
        tracing::info!(
            "{}: {} booked tourist(s)",
            row.homestay_name,
            row.total_tourists
        );
    }

    // Rewrite the files so every surviving record is in canonical form
    repository.flush()?;
    tracing::info!("Data files rewritten");

    Ok(())
}
