use std::error::Error;

use tracing_subscriber::EnvFilter;
use web::{config::WebConfig, start_web_server, WebState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // http request traces
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    if let Err(why) = tracing::subscriber::set_global_default(subscriber) {
        log::warn!("could not install tracing subscriber: {}", why);
    }

    let config = WebConfig::from_env()?;
    log::info!("starting web server on {}:{}", config.host, config.port);

    start_web_server(WebState::new(config)).await?;

    Ok(())
}
