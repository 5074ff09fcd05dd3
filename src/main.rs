use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use marketplace_api::{config::Config, routes::create_router, utils::init_logger, AppState, RateGovernor};

#[derive(Parser, Debug)]
#[command(name = "marketplace-api", version, about = "Marketplace HTTP API")]
struct Args {
    /// Load environment from this dotenv file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Override the PORT environment variable
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logger();

    // Load configuration
    let mut config = match &args.env_file {
        Some(path) => Config::from_env_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }
    info!("Configuration loaded: {:?}", config.server);

    // Rate governor; an invalid rule stops startup here
    let governor = RateGovernor::configure(config.rate_limit.governor.clone())?;
    let _sweeper = governor.spawn_sweeper(config.rate_limit.sweep_interval);

    let pool = marketplace_api::db::create_pool(&config.database)?;
    if pool.is_none() {
        info!("DATABASE_URL not set, running without persistence");
    }

    // Create shared state
    let state = AppState::new(config.clone(), governor, pool);

    // Create router
    let app = create_router(state);

    // Start server
    let ip: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((ip, config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
