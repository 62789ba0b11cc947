use folio_core_health_contracts::{DeliveryStatus, HealthStatus};
use folio_email_contracts::TransportSecurity;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiHealthStatus {
    pub status: ApiHealth,
    /// Whether smtp credentials are configured. The credentials themselves are
    /// never reported.
    pub email_configured: bool,
    pub mail_server: String,
    pub mail_port: u16,
    pub mail_security: TransportSecurity,
    pub delivery: ApiDeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smtp_reachable: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiHealth {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ApiDeliveryStatus {
    Synchronous,
    Background {
        workers: usize,
        capacity: usize,
        queued: usize,
        note: &'static str,
    },
}

impl From<HealthStatus> for ApiHealthStatus {
    fn from(value: HealthStatus) -> Self {
        let status = match value.smtp_reachable {
            Some(false) => ApiHealth::Degraded,
            Some(true) | None => ApiHealth::Healthy,
        };

        Self {
            status,
            email_configured: value.transport.credentials,
            mail_server: value.transport.host,
            mail_port: value.transport.port,
            mail_security: value.transport.security,
            delivery: value.delivery.into(),
            smtp_reachable: value.smtp_reachable,
        }
    }
}

impl From<DeliveryStatus> for ApiDeliveryStatus {
    fn from(value: DeliveryStatus) -> Self {
        match value {
            DeliveryStatus::Synchronous => Self::Synchronous,
            DeliveryStatus::Background(status) => Self::Background {
                workers: status.workers,
                capacity: status.capacity,
                queued: status.queued,
                note: "a successful submission only means the message was accepted for delivery",
            },
        }
    }
}
