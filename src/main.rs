mod application;
mod domain;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod testing;

use tracing::error;

use infrastructure::{AppConfig, AppContainer};
use presentation::http::HttpServer;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        error!("clinic-intake stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let container = AppContainer::new(&config).await?;

    HttpServer::new(
        container.handlers.clone(),
        container.event_dispatcher.clone(),
        config.port,
    )
    .run()
    .await
}
