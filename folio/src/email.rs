use anyhow::Context;
use folio_config::{DeliveryMode, EmailConfig, EmailSecurity, FeedbackConfig};
use folio_email_contracts::TransportSecurity;
use folio_email_impl::{
    queue::{EmailQueueConfig, EmailQueueServiceImpl, EmailQueueWorkers},
    EmailServiceConfig, EmailServiceImpl,
};

/// Connect to the SMTP server
pub async fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    EmailServiceImpl::new(EmailServiceConfig {
        host: config.host.clone(),
        port: config.port,
        security: config.security.map(|security| match security {
            EmailSecurity::Starttls => TransportSecurity::Starttls,
            EmailSecurity::Tls => TransportSecurity::Tls,
            EmailSecurity::None => TransportSecurity::None,
        }),
        username: config.username.clone(),
        password: config.password.as_ref().map(|password| password.0.clone()),
        from: config.from.clone(),
        timeout: config.timeout.into(),
    })
    .await
    .context("Failed to connect to SMTP server")
}

/// Start the background delivery workers.
///
/// No workers are spawned for synchronous delivery, the queue is never used
/// in that case.
pub fn start_queue(
    email: EmailServiceImpl,
    config: &FeedbackConfig,
) -> (EmailQueueServiceImpl, EmailQueueWorkers) {
    let workers = match config.delivery {
        DeliveryMode::Synchronous => 0,
        DeliveryMode::Background => config.workers,
    };

    EmailQueueServiceImpl::start(
        email,
        EmailQueueConfig {
            workers,
            capacity: config.queue_capacity,
        },
    )
}
