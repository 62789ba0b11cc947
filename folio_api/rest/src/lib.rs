use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use folio_core_feedback_contracts::FeedbackFeatureService;
use folio_core_health_contracts::HealthFeatureService;
use folio_di::Build;
use folio_models::Sensitive;
use folio_templates_contracts::TemplateService;
use folio_utils::Apply;
use tokio::net::TcpListener;
use tracing::info;

mod extractors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone, Build)]
pub struct RestServer<Health, Feedback, Template> {
    health: Health,
    feedback: Feedback,
    template: Template,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub addr: SocketAddr,
    /// Enables `/test-email` if set.
    pub admin_token: Option<Arc<Sensitive<String>>>,
}

impl<Health, Feedback, Template> RestServer<Health, Feedback, Template>
where
    Health: HealthFeatureService,
    Feedback: FeedbackFeatureService,
    Template: TemplateService,
{
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.config.addr;
        let router = self.router();
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on http://{}", listener.local_addr()?);
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let feedback = Arc::new(self.feedback);
        let template = Arc::new(self.template);

        let router = Router::new()
            .merge(routes::pages::router(Arc::clone(&template)))
            .merge(routes::feedback::router(Arc::clone(&feedback), template))
            .merge(routes::health::router(self.health.into()))
            .apply_map(self.config.admin_token, |router, token| {
                router.merge(routes::test_email::router(feedback, token))
            });

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down http server");
}
