use folio_models::feedback::FeedbackForm;
use serde::Deserialize;

/// The contact form as posted by the browser. Missing fields are empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiFeedbackForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl From<ApiFeedbackForm> for FeedbackForm {
    fn from(value: ApiFeedbackForm) -> Self {
        Self {
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
        }
    }
}
