use std::sync::Arc;

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tuner_proto::channels::ChannelTable;
use tuner_proto::config::Config;

use tuner_daemon::effector::{self, ProcessEffector};
use tuner_daemon::http::{self, AppContext};
use tuner_daemon::tuner::Tuner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Log to both stderr and an append-mode file in the data directory
    let data_dir = tuner_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("tuner-daemon.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tuner_daemon=debug")),
        )
        .init();

    info!("Log file: {:?}", log_path);

    let config = Config::load()?;
    info!("Config loaded from: {:?}", Config::config_path());

    let table = ChannelTable::load(&config.tuner.channels_toml)?;
    info!(
        "Channel lineup loaded from {:?} ({} channels)",
        config.tuner.channels_toml,
        table.len()
    );

    let effector: Arc<dyn effector::ActionEffector> =
        Arc::new(ProcessEffector::new(config.paths.effector_dir.clone()));

    let ctx = AppContext {
        web_root: config.paths.web_root.clone(),
        table: Arc::new(table),
        tuner: Arc::new(Tuner::new(Arc::clone(&effector))),
        effector,
        stop_command: config.tuner.stop_command.clone(),
    };

    info!("Serving web UI from {:?}", ctx.web_root);
    http::serve(ctx, &config.http.bind_address, config.http.port).await?;

    info!("Daemon stopped");
    Ok(())
}
