use std::sync::Arc;

use folio_api_rest::RestServerConfig;
use folio_config::{Config, DeliveryMode};
use folio_core_feedback_contracts::FeedbackDelivery;
use folio_core_feedback_impl::FeedbackFeatureConfig;
use folio_core_health_impl::HealthFeatureConfig;
use folio_di::provider;
use types::{Email, EmailQueue};

pub mod types;

provider! {
    /// The default provider, capable of providing all the dependencies
    pub Provider {
        email: Email,
        email_queue: EmailQueue,
        ..config: ConfigProvider {
            // API
            RestServerConfig,

            // Core
            FeedbackFeatureConfig,
            HealthFeatureConfig,
        }
    }
}

provider! {
    /// Reduced provider, capable of providing services that only depend on the configuration
    pub ConfigProvider {
        // API
        rest_server_config: RestServerConfig,

        // Core
        feedback_feature_config: FeedbackFeatureConfig,
        health_feature_config: HealthFeatureConfig,
    }
}

impl ConfigProvider {
    pub fn from_config(config: &Config) -> Self {
        let delivery = match config.feedback.delivery {
            DeliveryMode::Synchronous => FeedbackDelivery::Synchronous,
            DeliveryMode::Background => FeedbackDelivery::Background,
        };

        // API
        let rest_server_config = RestServerConfig {
            addr: config.http.address,
            admin_token: config
                .admin
                .as_ref()
                .map(|admin| Arc::new(admin.token.clone())),
        };

        // Core
        let feedback_feature_config = FeedbackFeatureConfig {
            recipient: config.feedback.recipient.clone().into(),
            delivery,
        };

        let health_feature_config = HealthFeatureConfig {
            check_connection: config.health.check_connection,
            cache_ttl: config.health.cache_ttl.into(),
            delivery,
        };

        Self::new(
            rest_server_config,
            feedback_feature_config,
            health_feature_config,
        )
    }
}

#[cfg(test)]
mod tests {
    use folio_di::Provide;
    use folio_email_impl::EmailServiceImpl;
    use types::RestServer;

    use super::*;
    use crate::email;

    #[tokio::test]
    async fn provide_rest_server() {
        let config = folio_config::load_from(&[folio_config::DEFAULT_CONFIG_PATH], None).unwrap();
        let config_provider = ConfigProvider::from_config(&config);

        let email = EmailServiceImpl::dummy().await;
        let (email_queue, _workers) = email::start_queue(email.clone(), &config.feedback);

        let mut provider = Provider::new(email, email_queue, config_provider);
        let _: RestServer = provider.provide();
    }
}
