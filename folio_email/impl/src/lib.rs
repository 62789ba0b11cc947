use std::time::Duration;

use anyhow::anyhow;
use folio_email_contracts::{
    Email, EmailSendError, EmailService, TransportInfo, TransportSecurity,
};
use folio_models::email_address::EmailAddressWithName;
use folio_utils::Apply;
use lettre::{
    message::{header::ContentType, MultiPart},
    transport::smtp::{authentication::Credentials, AsyncSmtpTransportBuilder},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

pub mod queue;

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddressWithName,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    info: TransportInfo,
}

#[derive(Debug, Clone)]
pub struct EmailServiceConfig {
    pub host: String,
    pub port: u16,
    /// Derived from the port if not set explicitly.
    pub security: Option<TransportSecurity>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: EmailAddressWithName,
    pub timeout: Duration,
}

impl EmailServiceImpl {
    pub async fn new(config: EmailServiceConfig) -> anyhow::Result<Self> {
        let security = config
            .security
            .unwrap_or_else(|| TransportSecurity::for_port(config.port));

        let builder = match security {
            TransportSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            }
            TransportSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            TransportSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
        };

        // Credentials are only used if both parts are present.
        let credentials = config
            .username
            .zip(config.password)
            .map(|(username, password)| Credentials::new(username, password));

        let info = TransportInfo {
            host: config.host,
            port: config.port,
            security,
            credentials: credentials.is_some(),
        };

        let transport = builder
            .port(config.port)
            .timeout(Some(config.timeout))
            .apply_map(credentials, AsyncSmtpTransportBuilder::credentials)
            .build();

        Ok(Self {
            from: config.from,
            transport,
            info,
        })
    }

    #[cfg(feature = "dummy")]
    pub async fn dummy() -> Self {
        Self::new(EmailServiceConfig {
            host: "localhost".into(),
            port: 2525,
            security: Some(TransportSecurity::None),
            username: None,
            password: None,
            from: "dummy@example.com".parse().unwrap(),
            timeout: Duration::from_secs(1),
        })
        .await
        .unwrap()
    }

    fn build_message(&self, email: Email) -> anyhow::Result<Message> {
        let builder = email
            .recipients
            .into_iter()
            .fold(Message::builder().from(self.from.0.clone()), |builder, recipient| {
                builder.to(recipient.0)
            })
            .apply_map(email.reply_to, |builder, reply_to| builder.reply_to(reply_to.0))
            .subject(email.subject);

        let message = match email.html_body {
            Some(html_body) => {
                builder.multipart(MultiPart::alternative_plain_html(email.body, html_body))?
            }
            None => builder.header(ContentType::TEXT_PLAIN).body(email.body)?,
        };

        Ok(message)
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> Result<(), EmailSendError> {
        let message = self.build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(classify_error)?;

        if !response.is_positive() {
            return Err(EmailSendError::Rejected {
                code: response.code().to_string(),
                message: response.message().collect::<Vec<_>>().join(" "),
            });
        }

        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }

    fn transport_info(&self) -> TransportInfo {
        self.info.clone()
    }
}

fn classify_error(err: lettre::transport::smtp::Error) -> EmailSendError {
    if err.is_permanent() || err.is_transient() {
        EmailSendError::Rejected {
            code: err.status().map(|code| code.to_string()).unwrap_or_default(),
            message: err.to_string(),
        }
    } else {
        EmailSendError::Connection(err.to_string())
    }
}
