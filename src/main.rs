use anyhow::Result;
use inbox_sorter::{
    app::SorterApp,
    classifier::{self, Classifier},
    config,
    infrastructure::{directories, logging, shutdown},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_config()?;
    let paths = directories::ensure_directories(&config.directories)?;
    let _log_guard = logging::init_tracing(&config.logging, &paths.logs_dir)?;

    let library = classifier::warm_up()?;
    let classifier = Classifier::new(library);

    let (shutdown, _) = shutdown::Shutdown::new();
    let signals = shutdown::install_signal_handlers(shutdown.clone());

    let app = SorterApp::initialize(config, paths, shutdown, classifier).await?;
    let result = app.run().await;
    signals.abort();
    result.map(|_| ())
}
