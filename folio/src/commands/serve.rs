use folio_config::Config;
use folio_di::Provide;
use folio_email_contracts::EmailService;
use tracing::{info, warn};

use crate::{
    email,
    environment::{types::RestServer, ConfigProvider, Provider},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Connecting to smtp server");
    let email = email::connect(&config.email).await?;
    // The pages are still served without a working smtp server.
    if let Err(err) = email.ping().await {
        warn!("Failed to reach smtp server: {err:#}");
    }

    let (email_queue, email_queue_workers) = email::start_queue(email.clone(), &config.feedback);

    // The provider holds queue handles of its own, it must be gone before the
    // queue can drain.
    let server: RestServer = {
        let config_provider = ConfigProvider::from_config(&config);
        Provider::new(email, email_queue, config_provider).provide()
    };
    info!(
        delivery = ?config.feedback.delivery,
        "Starting http server on {}", config.http.address
    );
    let result = server.serve().await;

    info!("Delivering queued emails");
    email_queue_workers
        .shutdown(config.email.timeout.into())
        .await;

    result
}
