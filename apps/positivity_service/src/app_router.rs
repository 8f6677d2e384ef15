use axum::{
    error_handling::HandleErrorLayer,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    BoxError, Extension, Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    app_module::AppState, debug::debug_controller::debug_router,
    health::health_controller, tone::tone_controller::tone_router,
};

pub fn application_router(debug_endpoints: bool) -> Router {
    let router = Router::new()
        .route("/", get(health_controller::root))
        .route("/health", get(health_controller::health))
        .merge(tone_router());

    if debug_endpoints {
        router.merge(debug_router())
    } else {
        router
    }
}

/// The full service: routes plus timeout, tracing, state and CORS layers.
pub fn application(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.cors_origins.clone()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    application_router(config.debug_endpoints).layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .timeout(config.request_timeout)
            .layer(TraceLayer::new_for_http())
            .layer(Extension(state))
            .layer(cors)
            .into_inner(),
    )
}

async fn handle_middleware_error(error: BoxError) -> Response {
    if error.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request timed out");
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out" })),
        )
            .into_response();
    }

    tracing::error!("Unhandled internal error: {}", error);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}
