use axum::{response::IntoResponse, routing::get, Extension, Json, Router};
use positivity_llm::{ChatMessage, CompletionOptions};
use serde_json::json;

use crate::{app_module::AppState, error::AppError};

const CONNECTIVITY_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.2,
    top_p: 0.7,
    max_tokens: 16,
};

/// Diagnostic routes. Only mounted when debug endpoints are enabled.
pub fn debug_router() -> axum::Router {
    Router::new()
        .route("/debug/env", get(environment))
        .route("/debug/api-key", get(api_key_status))
        .route("/test/nvidia", get(test_connectivity))
        .with_state(())
}

pub async fn environment(Extension(ctx): Extension<AppState>) -> impl IntoResponse {
    let config = &ctx.config;
    let cors_origins: Vec<&str> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.to_str().ok())
        .collect();

    Json(json!({
        "environment": config.environment,
        "api_key_configured": !config.llm.api_key.is_empty(),
        "org_id_configured": config.llm.org_id.is_some(),
        "model": config.llm.model,
        "base_url": config.llm.base_url,
        "llm_timeout_secs": config.llm_timeout.as_secs(),
        "cors_origins": cors_origins,
        "tone_analysis": config.tone_analysis,
    }))
}

// Reports presence only; no part of the key is ever echoed.
pub async fn api_key_status(Extension(ctx): Extension<AppState>) -> impl IntoResponse {
    Json(json!({
        "configured": !ctx.config.llm.api_key.is_empty(),
        "org_id_configured": ctx.config.llm.org_id.is_some(),
    }))
}

pub async fn test_connectivity(
    Extension(ctx): Extension<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let messages = vec![ChatMessage::user("Reply with the single word: ready")];

    let reply = ctx
        .service
        .tone_service
        .llm_client()
        .complete(messages, &CONNECTIVITY_OPTIONS)
        .await
        .map_err(AppError::Upstream)?;

    tracing::info!("Connectivity check succeeded");

    Ok(Json(json!({
        "status": "ok",
        "model": ctx.config.llm.model,
        "reply": reply,
    })))
}
