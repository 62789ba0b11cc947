use axum::{
    http::{header::LOCATION, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use folio_templates_contracts::{Template, TemplateService};

use crate::models::ApiError;

pub mod feedback;
pub mod health;
pub mod pages;
pub mod test_email;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err}");
    error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

fn error(code: StatusCode, detail: &'static str) -> Response {
    (code, Json(ApiError { detail })).into_response()
}

fn render<T: Template + 'static>(service: &impl TemplateService, template: &T) -> Response {
    match service.render(template) {
        Ok(html) => Html(html).into_response(),
        Err(err) => internal_server_error(err),
    }
}

fn redirect(location: &'static str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}
