use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sensor_db_tools::config::Config;
use sensor_db_tools::db::DEFAULT_ROOMS;
use sensor_db_tools::services::MaintenanceService;

#[derive(Parser)]
#[command(name = "insert-rooms")]
#[command(about = "Insert the room list into the comodos table", long_about = None)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, env = "DATABASE_PATH")]
    database_path: Option<PathBuf>,

    /// Room name to insert (repeatable); defaults to the standard room list
    #[arg(long = "room")]
    rooms: Vec<String>,
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

    let rooms: Vec<String> = if cli.rooms.is_empty() {
        DEFAULT_ROOMS.iter().map(|r| r.to_string()).collect()
    } else {
        cli.rooms
    };
    info!(
        "Inserting {} rooms into {}",
        rooms.len(),
        config.database_path.display()
    );

    let service = MaintenanceService::from_config(&config);
    let result = service.insert_rooms(rooms).await;

    // Failures are reported, not propagated: the process still exits 0.
    println!("{}", MaintenanceService::insert_message(&result));

    Ok(())
}
