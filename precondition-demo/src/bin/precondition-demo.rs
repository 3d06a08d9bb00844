use envconfig::Envconfig;

use precondition_demo::{log, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::init_from_env()?;

    log::initialize(&config.log_level)?;

    tracing::info!(?config, "Service is starting up...");

    precondition_demo::run(config).await
}
