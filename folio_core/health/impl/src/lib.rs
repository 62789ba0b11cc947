use std::{sync::Arc, time::Duration};

use folio_core_feedback_contracts::FeedbackDelivery;
use folio_core_health_contracts::{DeliveryStatus, HealthFeatureService, HealthStatus};
use folio_di::Build;
use folio_email_contracts::{queue::EmailQueueService, EmailService};
use tokio::{sync::RwLock, time::Instant};
use tracing::error;

#[derive(Debug, Clone, Build)]
pub struct HealthFeatureServiceImpl<Email, EmailQueue> {
    email: Email,
    email_queue: EmailQueue,
    config: HealthFeatureConfig,
    #[state]
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthFeatureConfig {
    pub check_connection: bool,
    pub cache_ttl: Duration,
    pub delivery: FeedbackDelivery,
}

#[derive(Debug, Default)]
struct State {
    cache: RwLock<Option<CachedPing>>,
}

#[derive(Debug)]
struct CachedPing {
    reachable: bool,
    timestamp: Instant,
}

impl<Email, EmailQueue> HealthFeatureService for HealthFeatureServiceImpl<Email, EmailQueue>
where
    Email: EmailService,
    EmailQueue: EmailQueueService,
{
    async fn get_status(&self) -> HealthStatus {
        let delivery = match self.config.delivery {
            FeedbackDelivery::Synchronous => DeliveryStatus::Synchronous,
            FeedbackDelivery::Background => DeliveryStatus::Background(self.email_queue.status()),
        };

        let smtp_reachable = if self.config.check_connection {
            Some(self.ping().await)
        } else {
            None
        };

        HealthStatus {
            transport: self.email.transport_info(),
            delivery,
            smtp_reachable,
        }
    }
}

impl<Email, EmailQueue> HealthFeatureServiceImpl<Email, EmailQueue>
where
    Email: EmailService,
    EmailQueue: EmailQueueService,
{
    async fn ping(&self) -> bool {
        let now = Instant::now();
        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return cached.reachable;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return cached.reachable;
        }

        let reachable = self
            .email
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping smtp server: {err}"))
            .is_ok();

        cache_guard
            .insert(CachedPing {
                reachable,
                timestamp: now,
            })
            .reachable
    }
}
