use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use leafscan_web::{create_app, AppState};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "leafscan")]
#[command(version, about = "HTTP API for plant disease image classification")]
struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 9101)]
    port: u16,

    /// Directory holding class_names.json and model weight files
    #[arg(long, env = "LEAFSCAN_MODELS_DIR", default_value = "models")]
    models_dir: PathBuf,

    /// Directory holding disease_info.json
    #[arg(long, env = "LEAFSCAN_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    info!("models dir: {:?}", cli.models_dir);
    info!("data dir:   {:?}", cli.data_dir);
    if !cli.models_dir.exists() {
        warn!(
            "models dir {:?} does not exist; predictions will use sampled fallbacks",
            cli.models_dir
        );
    }

    let state = AppState::new(cli.models_dir, cli.data_dir);
    let app = create_app(state).await;

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    info!("leafscan listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
