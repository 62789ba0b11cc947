use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

/// A template together with the data it is rendered with.
///
/// Names end in `.html` so that every value is html-escaped on rendering.
pub trait Template: Serialize {
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

pub const BASE_TEMPLATE: (&str, &str) = ("base.html", include_str!("../templates/base.html"));

macro_rules! templates {
    ($( $ident:ident ( $path:literal ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = $path;
                const TEMPLATE: &'static str = include_str!(concat!("../templates/", $path));
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    HomePage("home.html"),
    AboutPage("about.html"),
    CertificatesPage("certificates.html"),
    TestimonialsPage("testimonials.html"),
    FeedbackPage("feedback.html"),
    SentPage("sent.html"),
    FailPage("fail.html"),
    FeedbackNotificationTemplate("feedback_notification.html"),
}

// Pages without dynamic content still render from a (empty) map.

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HomePage {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AboutPage {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CertificatesPage {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestimonialsPage {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackPage {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentPage {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FailPage {}

/// Html body of the email the site owner receives for a contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackNotificationTemplate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
