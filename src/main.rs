use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;

use taskboard::adapters::{
    cli,
    config::FileConfigStore,
    ids::UuidGenerator,
    storage::FileBlobStore,
};
use taskboard::ports::ConfigStore;
use taskboard::{BoardSettings, BoardStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize color-eyre for better error reporting
    color_eyre::install()?;

    let matches = cli::build_command().get_matches();

    // Load configuration
    let config_store = FileConfigStore::new()?;
    let mut config = config_store.load_config().await?;

    // Override with command line arguments or environment variables
    if let Some(dir) = matches.get_one::<String>("data_dir") {
        config.data_dir = Some(PathBuf::from(dir));
    } else if let Ok(dir) = std::env::var("TASKBOARD_DATA_DIR") {
        config.data_dir = Some(PathBuf::from(dir));
    }

    let data_dir = config.resolved_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    // Initialize logging to file
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("taskboard.log"))?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_max_level(config.tracing_level())
        .init();

    let store = BoardStore::open(
        Arc::new(FileBlobStore::new(&data_dir)),
        Arc::new(UuidGenerator),
        BoardSettings::from(&config),
    )
    .await?;

    let outcome = cli::run(&matches, &store).await;
    store.flush().await;

    match outcome {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Err(e) => {
            tracing::warn!("Command failed: {e}");
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
