use std::future::Future;

use folio_email_contracts::{queue::EmailEnqueueError, EmailSendError};
use folio_models::feedback::{FeedbackForm, FeedbackValidationError};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait FeedbackFeatureService: Send + Sync + 'static {
    /// Validate a contact form submission and deliver it to the site owner.
    ///
    /// Invalid submissions are rejected before anything is sent. Every valid
    /// submission results in exactly one delivery attempt, there is no
    /// deduplication and no retry.
    fn submit(
        &self,
        form: FeedbackForm,
    ) -> impl Future<Output = Result<FeedbackReceipt, FeedbackSubmitError>> + Send;

    /// Send a test email to the site owner.
    fn send_test_message(&self) -> impl Future<Output = Result<(), EmailSendError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackReceipt {
    /// The smtp server accepted the email.
    Delivered,
    /// The email was queued for background delivery. It may still fail.
    Accepted,
}

#[derive(Debug, Error)]
pub enum FeedbackSubmitError {
    #[error(transparent)]
    Invalid(#[from] FeedbackValidationError),
    #[error(transparent)]
    Send(#[from] EmailSendError),
    #[error(transparent)]
    Enqueue(#[from] EmailEnqueueError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackDelivery {
    /// Wait for the smtp server before responding.
    Synchronous,
    /// Queue the email and respond immediately.
    Background,
}

#[cfg(feature = "mock")]
impl MockFeedbackFeatureService {
    pub fn with_submit(
        mut self,
        form: FeedbackForm,
        result: Result<FeedbackReceipt, FeedbackSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(form))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_send_test_message(mut self, result: Result<(), EmailSendError>) -> Self {
        self.expect_send_test_message()
            .once()
            .return_once(move || Box::pin(std::future::ready(result)));
        self
    }
}
