use axum::{
    routing::{get, on},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::{
    common::{method_not_allowed, route_not_found, METHOD_FILTER_ALL},
    WebState,
};

pub mod v1;

macro_rules! resource {
    ($($arg:tt)*) => {
        format!("/api{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub fn routes(state: WebState) -> Router {
    Router::new()
        .route("/ping", get(ping).fallback(method_not_allowed))
        .nest_service("/v1", v1::routes(state))
        .layer(TraceLayer::new_for_http())
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize)]
struct Pong {
    message: &'static str,
    version: &'static str,
}

/// Liveness check, also reports the running build.
async fn ping() -> Json<Pong> {
    Json(Pong {
        message: "pong!",
        version: env!("CARGO_PKG_VERSION"),
    })
}
