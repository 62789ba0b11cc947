use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    response::Response,
    routing, Form, Router,
};
use folio_core_feedback_contracts::{FeedbackFeatureService, FeedbackSubmitError};
use folio_templates_contracts::{FeedbackPage, TemplateService};
use tracing::{error, warn};

use super::{redirect, render};
use crate::models::feedback::ApiFeedbackForm;

type FeedbackState<F, T> = (Arc<F>, Arc<T>);

pub fn router<F: FeedbackFeatureService, T: TemplateService>(
    feedback: Arc<F>,
    template: Arc<T>,
) -> Router<()> {
    Router::new()
        .route(
            "/feedback",
            routing::get(form::<F, T>).post(submit::<F, T>),
        )
        .with_state((feedback, template))
}

async fn form<F: FeedbackFeatureService, T: TemplateService>(
    State((_, template)): State<FeedbackState<F, T>>,
) -> Response {
    render(&*template, &FeedbackPage::default())
}

async fn submit<F: FeedbackFeatureService, T: TemplateService>(
    State((feedback, _)): State<FeedbackState<F, T>>,
    form: Result<Form<ApiFeedbackForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(err) => {
            warn!("failed to parse feedback form: {err}");
            return redirect("/fail");
        }
    };

    match feedback.submit(form.into()).await {
        Ok(_) => redirect("/sent"),
        Err(
            FeedbackSubmitError::Invalid(_)
            | FeedbackSubmitError::Send(_)
            | FeedbackSubmitError::Enqueue(_),
        ) => redirect("/fail"),
        Err(FeedbackSubmitError::Other(err)) => {
            error!("failed to submit feedback: {err}");
            redirect("/fail")
        }
    }
}
