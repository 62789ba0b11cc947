use std::sync::Arc;

use axum::{extract::State, response::Response, routing, Router};
use folio_templates_contracts::{
    AboutPage, CertificatesPage, FailPage, HomePage, SentPage, Template, TemplateService,
    TestimonialsPage,
};

use super::render;

pub fn router<T: TemplateService>(service: Arc<T>) -> Router<()> {
    Router::new()
        .route("/", routing::get(page::<T, HomePage>))
        .route("/home", routing::get(page::<T, HomePage>))
        .route("/about", routing::get(page::<T, AboutPage>))
        .route("/certificates", routing::get(page::<T, CertificatesPage>))
        .route("/testimonials", routing::get(page::<T, TestimonialsPage>))
        .route("/sent", routing::get(page::<T, SentPage>))
        .route("/fail", routing::get(page::<T, FailPage>))
        .with_state(service)
}

async fn page<T: TemplateService, P: Template + Default + 'static>(
    service: State<Arc<T>>,
) -> Response {
    render(&**service, &P::default())
}
