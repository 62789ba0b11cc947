use std::future::Future;

use folio_models::email_address::EmailAddressWithName;
use serde::Serialize;
use thiserror::Error;

pub mod queue;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Deliver the given email. Never retried.
    fn send(&self, email: Email) -> impl Future<Output = Result<(), EmailSendError>> + Send;

    /// Open and close a session with the smtp server without sending anything.
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Describe where and how emails are delivered, without revealing any
    /// credentials.
    fn transport_info(&self) -> TransportInfo;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipients: Vec<EmailAddressWithName>,
    pub subject: String,
    pub body: String,
    pub html_body: Option<String>,
    pub reply_to: Option<EmailAddressWithName>,
}

#[derive(Debug, Error)]
pub enum EmailSendError {
    #[error("The smtp server rejected the email ({code}): {message}")]
    Rejected { code: String, message: String },
    #[error("Failed to communicate with the smtp server: {0}")]
    Connection(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportInfo {
    pub host: String,
    pub port: u16,
    pub security: TransportSecurity,
    pub credentials: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportSecurity {
    /// Plain connection, upgraded with `STARTTLS`.
    Starttls,
    /// Implicit TLS from the first byte.
    Tls,
    /// No encryption at all.
    None,
}

impl TransportSecurity {
    /// Pick the conventional security mode for a submission port.
    pub fn for_port(port: u16) -> Self {
        match port {
            465 => Self::Tls,
            25 => Self::None,
            _ => Self::Starttls,
        }
    }
}

impl std::fmt::Display for TransportSecurity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Starttls => "starttls",
            Self::Tls => "tls",
            Self::None => "none",
        })
    }
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_send(mut self, email: Email, result: Result<(), EmailSendError>) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_ping(mut self, result: bool) -> Self {
        self.expect_ping().once().return_once(move || {
            Box::pin(std::future::ready(
                result
                    .then_some(())
                    .ok_or_else(|| anyhow::anyhow!("Failed to ping smtp server")),
            ))
        });
        self
    }

    pub fn with_transport_info(mut self, info: TransportInfo) -> Self {
        self.expect_transport_info().return_const(info);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_for_port() {
        assert_eq!(TransportSecurity::for_port(465), TransportSecurity::Tls);
        assert_eq!(TransportSecurity::for_port(587), TransportSecurity::Starttls);
        assert_eq!(TransportSecurity::for_port(2525), TransportSecurity::Starttls);
        assert_eq!(TransportSecurity::for_port(25), TransportSecurity::None);
    }
}
