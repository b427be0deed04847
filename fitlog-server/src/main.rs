use anyhow::Result;
use fitlog::config::Config;
use fitlog::interface::logging::{init_logger, set_log_level};
use log::{LevelFilter, warn};

mod routes;
mod server;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    if !set_log_level(&config.log_level) {
        init_logger(LevelFilter::Info);
        warn!("Unknown log level {:?}, using info", config.log_level);
    }

    server::run_server(config).await
}
