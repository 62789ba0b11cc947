use serde::Serialize;

pub mod feedback;
pub mod health;

#[derive(Serialize)]
pub struct ApiError {
    pub detail: &'static str,
}

/// Result of sending a test email.
#[derive(Debug, Serialize)]
pub struct ApiTestEmailResult {
    pub status: ApiTestEmailStatus,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiTestEmailStatus {
    Success,
    Error,
}
