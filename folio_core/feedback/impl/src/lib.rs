use std::sync::Arc;

use folio_core_feedback_contracts::{
    FeedbackDelivery, FeedbackFeatureService, FeedbackReceipt, FeedbackSubmitError,
};
use folio_di::Build;
use folio_email_contracts::{queue::EmailQueueService, Email, EmailSendError, EmailService};
use folio_models::{
    email_address::EmailAddressWithName,
    feedback::{FeedbackForm, FeedbackSubmission},
};
use folio_templates_contracts::{FeedbackNotificationTemplate, TemplateService};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Build)]
pub struct FeedbackFeatureServiceImpl<Email, EmailQueue, Template> {
    email: Email,
    email_queue: EmailQueue,
    template: Template,
    config: FeedbackFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct FeedbackFeatureConfig {
    /// The site owner. Always the only recipient of a feedback email.
    pub recipient: Arc<EmailAddressWithName>,
    pub delivery: FeedbackDelivery,
}

impl<EmailS, EmailQueue, Template> FeedbackFeatureService
    for FeedbackFeatureServiceImpl<EmailS, EmailQueue, Template>
where
    EmailS: EmailService,
    EmailQueue: EmailQueueService,
    Template: TemplateService,
{
    async fn submit(&self, form: FeedbackForm) -> Result<FeedbackReceipt, FeedbackSubmitError> {
        let submission = FeedbackSubmission::try_from(form)
            .inspect_err(|err| warn!("rejected feedback submission: {err}"))?;

        let author = submission.author.email.clone();
        let email = self.compose(submission);

        match self.config.delivery {
            FeedbackDelivery::Synchronous => {
                self.email
                    .send(email)
                    .await
                    .inspect_err(|err| self.log_send_error(err))?;
                info!(%author, "delivered feedback message");
                Ok(FeedbackReceipt::Delivered)
            }
            FeedbackDelivery::Background => {
                self.email_queue.enqueue(email).inspect_err(|err| {
                    let status = self.email_queue.status();
                    error!(
                        %author,
                        workers = status.workers,
                        capacity = status.capacity,
                        queued = status.queued,
                        "failed to queue feedback message: {err}"
                    );
                })?;
                info!(%author, "queued feedback message for delivery");
                Ok(FeedbackReceipt::Accepted)
            }
        }
    }

    async fn send_test_message(&self) -> Result<(), EmailSendError> {
        let email = Email {
            recipients: vec![(*self.config.recipient).clone()],
            subject: "Test Email - Portfolio Website".into(),
            body: "This is a test email. If you receive this, your smtp configuration is working!"
                .into(),
            html_body: None,
            reply_to: None,
        };

        self.email
            .send(email)
            .await
            .inspect(|_| info!(recipient = %self.config.recipient, "delivered test email"))
            .inspect_err(|err| self.log_send_error(err))
    }
}

impl<EmailS, EmailQueue, Template> FeedbackFeatureServiceImpl<EmailS, EmailQueue, Template>
where
    EmailS: EmailService,
    EmailQueue: EmailQueueService,
    Template: TemplateService,
{
    fn compose(&self, submission: FeedbackSubmission) -> Email {
        let FeedbackSubmission {
            author,
            subject,
            content,
        } = submission;

        let name = author.name.into_inner();
        let email = author.email.as_str().to_owned();
        let subject = subject.into_inner();
        let message = content.into_inner();

        let body = format!(
            "New Contact Form Submission\n\
             \n\
             From: {name}\n\
             Email: {email}\n\
             Subject: {subject}\n\
             \n\
             Message:\n\
             {message}\n\
             \n\
             ---\n\
             Reply to: {email}\n"
        );

        let email_subject = format!("Portfolio Contact: {subject} ({name})")
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();

        // The plain text body is enough to deliver the message.
        let html_body = self
            .template
            .render(&FeedbackNotificationTemplate {
                name,
                email,
                subject,
                message,
            })
            .inspect_err(|err| warn!("failed to render html feedback email: {err}"))
            .ok();

        Email {
            recipients: vec![(*self.config.recipient).clone()],
            subject: email_subject,
            body,
            html_body,
            reply_to: Some(author.email.into()),
        }
    }

    fn log_send_error(&self, err: &EmailSendError) {
        let transport = self.email.transport_info();
        error!(
            host = %transport.host,
            port = transport.port,
            security = %transport.security,
            credentials = transport.credentials,
            "failed to deliver email: {err}"
        );
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use folio_email_contracts::{
        queue::{EmailEnqueueError, EmailQueueStatus, MockEmailQueueService},
        MockEmailService, TransportInfo, TransportSecurity,
    };
    use folio_models::feedback::FeedbackValidationError;
    use folio_templates_contracts::MockTemplateService;
    use folio_utils::{assert_matches, logs};
    use pretty_assertions::assert_eq;

    use super::*;

    type Sut = FeedbackFeatureServiceImpl<MockEmailService, MockEmailQueueService, MockTemplateService>;

    fn config(delivery: FeedbackDelivery) -> FeedbackFeatureConfig {
        FeedbackFeatureConfig {
            recipient: Arc::new("Site Owner <owner@example.com>".parse().unwrap()),
            delivery,
        }
    }

    fn form() -> FeedbackForm {
        FeedbackForm {
            name: "Alice".into(),
            email: "alice@x.com".into(),
            subject: "Hi".into(),
            message: "Hello".into(),
        }
    }

    fn notification() -> FeedbackNotificationTemplate {
        FeedbackNotificationTemplate {
            name: "Alice".into(),
            email: "alice@x.com".into(),
            subject: "Hi".into(),
            message: "Hello".into(),
        }
    }

    fn expected_email(html_body: Option<&str>) -> Email {
        Email {
            recipients: vec!["Site Owner <owner@example.com>".parse().unwrap()],
            subject: "Portfolio Contact: Hi (Alice)".into(),
            body: "New Contact Form Submission\n\nFrom: Alice\nEmail: alice@x.com\nSubject: \
                   Hi\n\nMessage:\nHello\n\n---\nReply to: alice@x.com\n"
                .into(),
            html_body: html_body.map(Into::into),
            reply_to: Some("alice@x.com".parse().unwrap()),
        }
    }

    fn transport_info() -> TransportInfo {
        TransportInfo {
            host: "smtp.gmail.com".into(),
            port: 587,
            security: TransportSecurity::Starttls,
            credentials: true,
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let template = MockTemplateService::new().with_render(notification(), "<html/>".into());
        let email = MockEmailService::new().with_send(expected_email(Some("<html/>")), Ok(()));

        let sut = Sut {
            email,
            email_queue: MockEmailQueueService::new(),
            template,
            config: config(FeedbackDelivery::Synchronous),
        };

        // Act
        let result = sut.submit(form()).await;

        // Assert
        assert_eq!(result.unwrap(), FeedbackReceipt::Delivered);
    }

    #[tokio::test]
    async fn plain_body_contains_every_field() {
        // Arrange
        let (tx, rx) = std::sync::mpsc::channel();
        let mut template = MockTemplateService::new();
        template
            .expect_render::<FeedbackNotificationTemplate>()
            .once()
            .return_once(|_| Err(anyhow!("template error")));
        let mut email = MockEmailService::new();
        email.expect_send().once().return_once(move |email| {
            tx.send(email).unwrap();
            Box::pin(std::future::ready(Ok(())))
        });

        let sut = Sut {
            email,
            email_queue: MockEmailQueueService::new(),
            template,
            config: config(FeedbackDelivery::Synchronous),
        };

        // Act
        let result = sut
            .submit(FeedbackForm {
                name: "Bob Builder".into(),
                email: "bob@builder.dev".into(),
                subject: "Job offer".into(),
                message: "Can we fix it?\nYes we can!".into(),
            })
            .await;

        // Assert
        assert_eq!(result.unwrap(), FeedbackReceipt::Delivered);
        let sent = rx.recv().unwrap();
        for value in [
            "From: Bob Builder",
            "Email: bob@builder.dev",
            "Subject: Job offer",
            "Can we fix it?\nYes we can!",
            "Reply to: bob@builder.dev",
        ] {
            assert!(sent.body.contains(value), "{value:?} missing in {:?}", sent.body);
        }
        assert_eq!(sent.subject, "Portfolio Contact: Job offer (Bob Builder)");
        assert_eq!(sent.reply_to, Some("bob@builder.dev".parse().unwrap()));
    }

    #[tokio::test]
    async fn invalid() {
        for form in [
            FeedbackForm {
                name: "".into(),
                email: "a@x.com".into(),
                subject: "s".into(),
                message: "m".into(),
            },
            FeedbackForm {
                email: "  ".into(),
                ..form()
            },
            FeedbackForm {
                subject: "\t\n".into(),
                ..form()
            },
            FeedbackForm {
                message: " ".into(),
                ..form()
            },
            FeedbackForm::default(),
        ] {
            // Arrange
            let sut = Sut {
                email: MockEmailService::new(),
                email_queue: MockEmailQueueService::new(),
                template: MockTemplateService::new(),
                config: config(FeedbackDelivery::Synchronous),
            };

            // Act
            let result = sut.submit(form).await;

            // Assert
            assert_matches!(
                result,
                Err(FeedbackSubmitError::Invalid(FeedbackValidationError::Empty(_)))
            );
        }
    }

    #[tokio::test]
    async fn invalid_email() {
        // Arrange
        let sut = Sut {
            email: MockEmailService::new(),
            email_queue: MockEmailQueueService::new(),
            template: MockTemplateService::new(),
            config: config(FeedbackDelivery::Background),
        };

        // Act
        let result = sut
            .submit(FeedbackForm {
                email: "alice@x.com\r\nBcc: eve@x.com".into(),
                ..form()
            })
            .await;

        // Assert
        assert_matches!(
            result,
            Err(FeedbackSubmitError::Invalid(
                FeedbackValidationError::InvalidEmail
            ))
        );
    }

    #[tokio::test]
    async fn send_error() {
        // Arrange
        let (logs, _guard) = logs::capture();
        let template = MockTemplateService::new().with_render(notification(), "<html/>".into());
        let email = MockEmailService::new()
            .with_send(
                expected_email(Some("<html/>")),
                Err(EmailSendError::Rejected {
                    code: "535".into(),
                    message: "5.7.8 Username and Password not accepted".into(),
                }),
            )
            .with_transport_info(transport_info());

        let sut = Sut {
            email,
            email_queue: MockEmailQueueService::new(),
            template,
            config: config(FeedbackDelivery::Synchronous),
        };

        // Act
        let result = sut.submit(form()).await;

        // Assert
        assert_matches!(
            result,
            Err(FeedbackSubmitError::Send(EmailSendError::Rejected { code, .. })) if code == "535"
        );
        let errors = logs.lines_at("ERROR");
        assert_eq!(errors.len(), 1, "{errors:?}");
        let line = &errors[0];
        assert!(line.contains("failed to deliver email"), "{line}");
        assert!(line.contains("Username and Password not accepted"), "{line}");
        assert!(line.contains("host=smtp.gmail.com"), "{line}");
        assert!(line.contains("port=587"), "{line}");
        assert!(line.contains("security=starttls"), "{line}");
        assert!(line.contains("credentials=true"), "{line}");
    }

    #[tokio::test]
    async fn html_render_error_sends_plain_text() {
        // Arrange
        let mut template = MockTemplateService::new();
        template
            .expect_render::<FeedbackNotificationTemplate>()
            .once()
            .return_once(|_| Err(anyhow!("template error")));
        let email = MockEmailService::new().with_send(expected_email(None), Ok(()));

        let sut = Sut {
            email,
            email_queue: MockEmailQueueService::new(),
            template,
            config: config(FeedbackDelivery::Synchronous),
        };

        // Act
        let result = sut.submit(form()).await;

        // Assert
        assert_eq!(result.unwrap(), FeedbackReceipt::Delivered);
    }

    #[tokio::test]
    async fn no_deduplication() {
        // Arrange
        let mut template = MockTemplateService::new();
        template
            .expect_render::<FeedbackNotificationTemplate>()
            .times(2)
            .returning(|_| Ok("<html/>".into()));
        let mut email = MockEmailService::new();
        email
            .expect_send()
            .times(2)
            .with(mockall::predicate::eq(expected_email(Some("<html/>"))))
            .returning(|_| Box::pin(std::future::ready(Ok(()))));

        let sut = Sut {
            email,
            email_queue: MockEmailQueueService::new(),
            template,
            config: config(FeedbackDelivery::Synchronous),
        };

        // Act
        let first = sut.submit(form()).await;
        let second = sut.submit(form()).await;

        // Assert
        assert_eq!(first.unwrap(), FeedbackReceipt::Delivered);
        assert_eq!(second.unwrap(), FeedbackReceipt::Delivered);
    }

    #[tokio::test]
    async fn recipient_and_reply_to_are_fixed() {
        // Arrange
        let form = FeedbackForm {
            name: "Eve\r\nBcc: eve@evil.com".into(),
            email: "eve@evil.com".into(),
            subject: "To: eve@evil.com".into(),
            message: "Cc: eve@evil.com".into(),
        };

        let mut template = MockTemplateService::new();
        template
            .expect_render::<FeedbackNotificationTemplate>()
            .once()
            .returning(|_| Ok("<html/>".into()));
        let mut email = MockEmailService::new();
        email
            .expect_send()
            .once()
            .withf(|email| {
                email.recipients
                    == vec!["Site Owner <owner@example.com>"
                        .parse::<EmailAddressWithName>()
                        .unwrap()]
                    && email.reply_to
                        == Some("eve@evil.com".parse::<EmailAddressWithName>().unwrap())
                    && !email.subject.contains(['\r', '\n'])
            })
            .returning(|_| Box::pin(std::future::ready(Ok(()))));

        let sut = Sut {
            email,
            email_queue: MockEmailQueueService::new(),
            template,
            config: config(FeedbackDelivery::Synchronous),
        };

        // Act
        let result = sut.submit(form).await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn background_ok() {
        // Arrange
        let template = MockTemplateService::new().with_render(notification(), "<html/>".into());
        let email_queue =
            MockEmailQueueService::new().with_enqueue(expected_email(Some("<html/>")), Ok(()));

        let sut = Sut {
            email: MockEmailService::new(),
            email_queue,
            template,
            config: config(FeedbackDelivery::Background),
        };

        // Act
        let result = sut.submit(form()).await;

        // Assert
        assert_eq!(result.unwrap(), FeedbackReceipt::Accepted);
    }

    #[tokio::test]
    async fn background_queue_full() {
        // Arrange
        let template = MockTemplateService::new().with_render(notification(), "<html/>".into());
        let email_queue = MockEmailQueueService::new()
            .with_enqueue(
                expected_email(Some("<html/>")),
                Err(EmailEnqueueError::Full),
            )
            .with_status(EmailQueueStatus {
                workers: 2,
                capacity: 64,
                queued: 64,
            });

        let sut = Sut {
            email: MockEmailService::new(),
            email_queue,
            template,
            config: config(FeedbackDelivery::Background),
        };

        // Act
        let result = sut.submit(form()).await;

        // Assert
        assert_matches!(
            result,
            Err(FeedbackSubmitError::Enqueue(EmailEnqueueError::Full))
        );
    }

    #[tokio::test]
    async fn send_test_message() {
        // Arrange
        let email = MockEmailService::new().with_send(
            Email {
                recipients: vec!["Site Owner <owner@example.com>".parse().unwrap()],
                subject: "Test Email - Portfolio Website".into(),
                body: "This is a test email. If you receive this, your smtp configuration is \
                       working!"
                    .into(),
                html_body: None,
                reply_to: None,
            },
            Ok(()),
        );

        let sut = Sut {
            email,
            email_queue: MockEmailQueueService::new(),
            template: MockTemplateService::new(),
            config: config(FeedbackDelivery::Background),
        };

        // Act
        let result = sut.send_test_message().await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn send_test_message_error() {
        // Arrange
        let mut email = MockEmailService::new().with_transport_info(transport_info());
        email.expect_send().once().return_once(|_| {
            Box::pin(std::future::ready(Err(EmailSendError::Connection(
                "failed to lookup address information".into(),
            ))))
        });

        let sut = Sut {
            email,
            email_queue: MockEmailQueueService::new(),
            template: MockTemplateService::new(),
            config: config(FeedbackDelivery::Synchronous),
        };

        // Act
        let result = sut.send_test_message().await;

        // Assert
        assert_matches!(result, Err(EmailSendError::Connection(_)));
    }
}
