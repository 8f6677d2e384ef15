use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Form, Json, Router,
};
use serde::Deserialize;
use tracing::Instrument;
use uuid::Uuid;

use super::request_validator::validate;
use crate::{app_module::AppState, error::AppError};

/// The `text` / `context` fields of a `/process/` submission.
///
/// Browsers post these as `multipart/form-data`; scripted clients tend to use
/// `application/x-www-form-urlencoded`. Both are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct ProcessForm {
    pub text: Option<String>,
    pub context: Option<String>,
}

fn form_error(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::InvalidForm(message)
    }
}

#[async_trait]
impl<S> FromRequest<S> for ProcessForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(form) = Form::<ProcessForm>::from_request(req, state)
                .await
                .map_err(|rejection| form_error(rejection.status(), rejection.body_text()))?;
            return Ok(form);
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| form_error(rejection.status(), rejection.body_text()))?;

        let mut form = ProcessForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| form_error(e.status(), e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let value = field
                .text()
                .await
                .map_err(|e| form_error(e.status(), e.body_text()))?;
            match name.as_str() {
                "text" => form.text = Some(value),
                "context" => form.context = Some(value),
                _ => {}
            }
        }

        Ok(form)
    }
}

pub fn tone_router() -> axum::Router {
    Router::new()
        .route("/process/", post(process_input))
        .route("/process", post(process_input))
        .with_state(())
}

pub async fn process_input(
    Extension(ctx): Extension<AppState>,
    form: ProcessForm,
) -> Result<impl IntoResponse, AppError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("process_input", %request_id);

    async move {
        let request = validate(form.text, form.context.as_deref(), ctx.config.context_policy)
            .inspect_err(|e| tracing::warn!("Rejected request: {}", e))?;

        tracing::info!(
            situation = %request.context.situation,
            formality = %request.context.formality,
            chars = request.text.chars().count(),
            "Processing input"
        );

        let response = ctx.service.tone_service.process(&request).await;
        if response.degraded {
            tracing::warn!("Responding with degraded transformation");
        }

        Ok::<_, AppError>(Json(response))
    }
    .instrument(span)
    .await
}
