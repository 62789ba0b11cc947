use serde::Serialize;
use thiserror::Error;

use crate::Email;

/// Hands emails to a fixed pool of background workers.
///
/// A successful [`enqueue`](EmailQueueService::enqueue) only means the email
/// was accepted for delivery. The outcome of the actual delivery is logged by
/// the worker and never reported back.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailQueueService: Send + Sync + 'static {
    fn enqueue(&self, email: Email) -> Result<(), EmailEnqueueError>;

    fn status(&self) -> EmailQueueStatus;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailEnqueueError {
    #[error("The email queue is full.")]
    Full,
    #[error("The email queue is closed.")]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmailQueueStatus {
    pub workers: usize,
    pub capacity: usize,
    pub queued: usize,
}

#[cfg(feature = "mock")]
impl MockEmailQueueService {
    pub fn with_enqueue(mut self, email: Email, result: Result<(), EmailEnqueueError>) -> Self {
        self.expect_enqueue()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| result);
        self
    }

    pub fn with_status(mut self, status: EmailQueueStatus) -> Self {
        self.expect_status().return_const(status);
        self
    }
}
