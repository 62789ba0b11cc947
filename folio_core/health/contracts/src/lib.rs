use std::future::Future;

use folio_email_contracts::{queue::EmailQueueStatus, TransportInfo};

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait HealthFeatureService: Send + Sync + 'static {
    /// Report the email configuration and, if enabled, whether the smtp server
    /// is reachable. Never sends an email.
    fn get_status(&self) -> impl Future<Output = HealthStatus> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub transport: TransportInfo,
    pub delivery: DeliveryStatus,
    /// `None` if the connection check is disabled.
    pub smtp_reachable: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Synchronous,
    /// Success only means the email was accepted into the queue.
    Background(EmailQueueStatus),
}

#[cfg(feature = "mock")]
impl MockHealthFeatureService {
    pub fn with_get_status(mut self, status: HealthStatus) -> Self {
        self.expect_get_status()
            .once()
            .return_once(move || Box::pin(std::future::ready(status)));
        self
    }
}
