use clap::Subcommand;
use folio_config::Config;
use folio_email_contracts::{Email, EmailService};
use folio_models::email_address::EmailAddressWithName;
use tracing::info;

use crate::email;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: EmailAddressWithName },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddressWithName) -> anyhow::Result<()> {
    let email_service = email::connect(&config.email).await?;

    email_service
        .send(Email {
            recipients: vec![recipient.clone()],
            subject: "Email Deliverability Test".into(),
            body: "Email deliverability seems to be working!".into(),
            html_body: None,
            reply_to: None,
        })
        .await?;

    info!(%recipient, "Test email has been delivered");

    Ok(())
}
