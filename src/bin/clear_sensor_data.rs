use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sensor_db_tools::config::Config;
use sensor_db_tools::services::MaintenanceService;

#[derive(Parser)]
#[command(name = "clear-sensor-data")]
#[command(about = "Delete every reading from the temperatura, iluminacao, consumo and custo tables", long_about = None)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, env = "DATABASE_PATH")]
    database_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sensor_db_tools=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(path) = cli.database_path {
        config = config.with_database_path(path);
    }
    info!("Clearing sensor data in {}", config.database_path.display());

    let service = MaintenanceService::from_config(&config);
    let result = service.clear_sensor_data().await;

    // Failures are reported, not propagated: the process still exits 0.
    println!("{}", MaintenanceService::clear_message(&result));

    Ok(())
}
