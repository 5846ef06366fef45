use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autotss_core::{
    ensure_min_version, load_config, load_config_or_default, validate_config, BlobArchiver,
    DeviceRegistry, DeviceStore, FirmwareCatalog, GeneratorError, IpswClient, MarkerClassifier,
    Reconciler, SqliteDeviceStore, TsscheckerGenerator,
};

/// Default config file, used only when present
const DEFAULT_CONFIG_PATH: &str = "autotss.toml";

/// Automatically save SHSH blobs for every currently signed firmware.
#[derive(Parser, Debug)]
#[command(name = "autotss", version, about)]
struct Cli {
    /// Supply the path to your tsschecker binary.
    /// Example: -p /Users/codsane/tsschecker/tsschecker_macos
    #[arg(short = 'p', long = "path")]
    path: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        if let Some(hint) = e.downcast_ref::<GeneratorError>().and_then(|g| g.hint()) {
            error!("{}", hint);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // An explicitly named config file must exist, the default one may not
    let config = match std::env::var("AUTOTSS_CONFIG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            info!("Loading configuration from {:?}", path);
            load_config(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
        Err(_) => load_config_or_default(&PathBuf::from(DEFAULT_CONFIG_PATH))
            .context("Failed to load configuration")?,
    };

    validate_config(&config).context("Configuration validation failed")?;
    info!("Database path: {:?}", config.database.path);
    info!("Blobs directory: {:?}", config.blobs.dir);

    // Resolve and check the generator before touching anything else
    let generator = match cli.path {
        Some(path) => {
            let generator = TsscheckerGenerator::from_user_path(&path)?;
            info!("Using manually specified tsschecker binary: {}", path.display());
            generator
        }
        None => TsscheckerGenerator::new(config.generator.path.clone()),
    };
    ensure_min_version(&generator, config.generator.min_version).await?;

    let store: Arc<dyn DeviceStore> = Arc::new(
        SqliteDeviceStore::new(&config.database.path)
            .context("Failed to open device database")?,
    );
    let catalog: Arc<dyn FirmwareCatalog> = Arc::new(
        IpswClient::new(&config.catalog).context("Failed to create firmware catalog client")?,
    );

    let archiver = BlobArchiver::new(generator, config.blobs.dir.clone())
        .with_classifier(MarkerClassifier::new(config.generator.success_marker.clone()))
        .with_log_file_name(config.blobs.log_file_name.clone());

    let reconciler = Reconciler::new(
        DeviceRegistry::new(store),
        catalog,
        archiver,
        config.registration.path.clone(),
    );

    let summary = reconciler.run().await?;

    info!(
        devices = summary.devices,
        imported = summary.imported,
        already_saved = summary.already_saved,
        saved = summary.saved,
        failed = summary.failed.len(),
        elapsed_ms = (summary.finished_at - summary.started_at).num_milliseconds(),
        "Run complete"
    );
    for failed in &summary.failed {
        warn!(
            "[{}] [{} - {}] not saved, see {}",
            failed.device_name,
            failed.version,
            failed.build_id,
            failed.log_path.display()
        );
    }

    Ok(())
}
