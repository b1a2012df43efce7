use std::{sync::Arc, time::Instant};

use axum::{
    extract::{rejection::JsonRejection, OriginalUri},
    http::Method,
    routing::{get, on, post},
    Extension, Json, Router,
};
use model::{
    distance::RouteDistances,
    route::{Route, RouteStopEntry},
    stop::{GeoPoint, Stop},
    WithId,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{id::Id, let_also::LetAlso, serde::string_or_number};

use crate::{
    common::{
        method_not_allowed, route_not_found, schema, schema_no_example, HateoasResult,
        RouteErrorResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/routes{}", format_args!($($arg)*))
    };
}

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/distance", post(distance).fallback(method_not_allowed))
        .route(
            "/distance/schema",
            get(schema::<RouteDistances>).fallback(method_not_allowed),
        )
        .route("/reorder", post(reorder).fallback(method_not_allowed))
        .route(
            "/reorder/schema",
            get(schema_no_example::<ReorderDto>).fallback(method_not_allowed),
        )
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// A stop as sent by the route editor, in route order.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteStopDto {
    /// Accepted as a string or a number, always answered as a string.
    #[serde(deserialize_with = "string_or_number::deserialize")]
    #[schemars(with = "String")]
    pub id: String,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub manual_distance_override: Option<f64>,
    /// Ignored on input, the order of the list is authoritative.
    pub position: Option<usize>,
}

impl From<RouteStopDto> for RouteStopEntry {
    fn from(dto: RouteStopDto) -> Self {
        let name = dto.name.unwrap_or_else(|| dto.id.clone());
        let location = GeoPoint::from_parts(dto.latitude, dto.longitude);
        RouteStopEntry::new(0, WithId::new(Id::new(dto.id), Stop::new(name, location)))
            .with_override(dto.manual_distance_override)
    }
}

impl From<RouteStopEntry> for RouteStopDto {
    fn from(entry: RouteStopEntry) -> Self {
        let stop = entry.stop;
        RouteStopDto {
            latitude: stop.content.latitude(),
            longitude: stop.content.longitude(),
            id: stop.id.into_inner(),
            name: Some(stop.content.name),
            manual_distance_override: entry.manual_distance_override,
            position: Some(entry.position),
        }
    }
}

fn route_from(stops: Vec<RouteStopDto>) -> Route {
    stops
        .into_iter()
        .map(RouteStopEntry::from)
        .collect::<Vec<_>>()
        .let_owned(Route::from_entries)
}

#[derive(Debug, Deserialize)]
struct DistanceRequest {
    stops: Vec<RouteStopDto>,
}

#[derive(Debug, Deserialize)]
struct ReorderRequest {
    stops: Vec<RouteStopDto>,
    from: usize,
    to: usize,
}

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct ReorderDto {
    stops: Vec<RouteStopDto>,
    distances: RouteDistances,
}

fn bad_payload(why: JsonRejection, uri: &str) -> RouteErrorResponse {
    RouteErrorResponse::from(why)
        .with_method(&Method::POST)
        .with_uri(uri)
}

async fn distance(
    OriginalUri(original_uri): OriginalUri,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    payload: Result<Json<DistanceRequest>, JsonRejection>,
) -> HateoasResult<RouteDistances> {
    let Json(request) = payload.map_err(|why| bad_payload(why, original_uri.path()))?;

    let now = Instant::now();
    let distances = route_from(request.stops).distances();
    let elapsed = now.elapsed();
    let unknown_legs = distances.unknown_legs();

    log::debug!(
        "computed distances over {} stops, total {} km",
        distances.len(),
        distances.total_distance
    );

    hateoas::Response::builder(distances, base_url)
        .link("self", resource!("/distance"))
        .link("schema", resource!("/distance/schema"))
        .debug_info("unknownLegs", unknown_legs)
        .debug_info("computeSecs", elapsed.as_secs_f64())
        .build()
        .json()
        .let_owned(Ok)
}

async fn reorder(
    OriginalUri(original_uri): OriginalUri,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> HateoasResult<ReorderDto> {
    let Json(request) = payload.map_err(|why| bad_payload(why, original_uri.path()))?;

    let mut route = route_from(request.stops);
    route.move_stop(request.from, request.to).map_err(|why| {
        RouteErrorResponse::from(why)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
    })?;

    let distances = route.distances();
    let dto = ReorderDto {
        stops: route
            .into_entries()
            .into_iter()
            .map(RouteStopDto::from)
            .collect(),
        distances,
    };

    hateoas::Response::builder(dto, base_url)
        .link("self", resource!("/reorder"))
        .link("distance", resource!("/distance"))
        .build()
        .json()
        .let_owned(Ok)
}
