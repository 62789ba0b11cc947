use folio_core_feedback_impl::FeedbackFeatureServiceImpl;
use folio_core_health_impl::HealthFeatureServiceImpl;
use folio_email_impl::{queue::EmailQueueServiceImpl, EmailServiceImpl};
use folio_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = folio_api_rest::RestServer<HealthFeature, FeedbackFeature, Template>;

// Infrastructure
pub type Email = EmailServiceImpl;
pub type EmailQueue = EmailQueueServiceImpl;
pub type Template = TemplateServiceImpl;

// Core
pub type FeedbackFeature = FeedbackFeatureServiceImpl<Email, EmailQueue, Template>;
pub type HealthFeature = HealthFeatureServiceImpl<Email, EmailQueue>;
