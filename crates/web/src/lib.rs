pub use crate::common::RouteResult;

use std::sync::Arc;

use axum::{routing::on, Router};
use tokio::net::TcpListener;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    config::WebConfig,
};

pub mod api;
pub mod common;
pub mod config;
pub mod hateoas;
pub mod middleware;

#[derive(Clone)]
pub struct WebState {
    pub config: Arc<WebConfig>,
}

impl WebState {
    pub fn new(config: WebConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// The complete application router, without binding a listener.
pub fn app(state: WebState) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

pub async fn start_web_server(state: WebState) -> std::io::Result<()> {
    let listener = TcpListener::bind(state.config.listen_address()).await?;
    log::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state).into_make_service()).await?;

    Ok(())
}
