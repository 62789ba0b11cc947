use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_feedback_contracts::FeedbackFeatureService;
use folio_models::Sensitive;
use subtle::ConstantTimeEq;

use super::error;
use crate::{
    extractors::auth::BearerToken,
    models::{ApiTestEmailResult, ApiTestEmailStatus},
};

type TestEmailState<F> = (Arc<F>, Arc<Sensitive<String>>);

pub fn router<F: FeedbackFeatureService>(
    service: Arc<F>,
    admin_token: Arc<Sensitive<String>>,
) -> Router<()> {
    Router::new()
        .route("/test-email", routing::get(test_email::<F>))
        .with_state((service, admin_token))
}

async fn test_email<F: FeedbackFeatureService>(
    State((service, admin_token)): State<TestEmailState<F>>,
    BearerToken(token): BearerToken,
) -> Response {
    if !token_matches(token.as_deref(), &admin_token) {
        return error(StatusCode::UNAUTHORIZED, "Invalid token");
    }

    match service.send_test_message().await {
        Ok(()) => Json(ApiTestEmailResult {
            status: ApiTestEmailStatus::Success,
            message: "Test email sent successfully".into(),
        })
        .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiTestEmailResult {
                status: ApiTestEmailStatus::Error,
                message: format!("Failed to send test email: {err}"),
            }),
        )
            .into_response(),
    }
}

/// Compared in constant time for tokens of equal length.
fn token_matches(token: Option<&str>, expected: &str) -> bool {
    token.is_some_and(|token| token.as_bytes().ct_eq(expected.as_bytes()).into())
}
