use std::{net::SocketAddr, path::Path};

use anyhow::{ensure, Context};
use config::{Environment, File, FileFormat};
use folio_models::{email_address::EmailAddressWithName, Sensitive};
use serde::Deserialize;

pub use duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Colon separated list of additional config files, applied in order after the
/// defaults.
pub const CONFIG_PATHS_ENV: &str = "FOLIO_CONFIG_PATHS";

/// Environment variables starting with `FOLIO__` override config values, e.g.
/// `FOLIO__EMAIL__PASSWORD` sets `email.password`.
pub const ENV_PREFIX: &str = "FOLIO";
pub const ENV_SEPARATOR: &str = "__";

/// Load the default config, the files listed in [`CONFIG_PATHS_ENV`] and the
/// environment overrides.
pub fn load() -> anyhow::Result<Config> {
    let extra_paths = std::env::var(CONFIG_PATHS_ENV).unwrap_or_default();
    let paths = std::iter::once(DEFAULT_CONFIG_PATH)
        .chain(extra_paths.split(':').filter(|path| !path.is_empty()))
        .collect::<Vec<_>>();

    load_from(&paths, Some(environment()))
}

pub fn load_from(
    paths: &[impl AsRef<Path>],
    environment: Option<Environment>,
) -> anyhow::Result<Config> {
    let mut builder = paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?;
    if let Some(environment) = environment {
        builder = builder.add_source(environment);
    }

    let config: Config = builder
        .build()?
        .try_deserialize()
        .context("Failed to load config")?;

    config.validate()?;

    Ok(config)
}

pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub feedback: FeedbackConfig,
    pub health: HealthConfig,
    pub admin: Option<AdminConfig>,
}

impl Config {
    fn validate(&self) -> anyhow::Result<()> {
        if self.feedback.delivery == DeliveryMode::Background {
            ensure!(
                self.feedback.workers > 0,
                "feedback.workers must be greater than zero"
            );
        }
        ensure!(
            self.feedback.queue_capacity > 0,
            "feedback.queue_capacity must be greater than zero"
        );
        if let Some(admin) = &self.admin {
            ensure!(!admin.token.is_empty(), "admin.token must not be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub address: SocketAddr,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    /// Derived from the port if not set.
    pub security: Option<EmailSecurity>,
    pub username: Option<String>,
    pub password: Option<Sensitive<String>>,
    pub from: EmailAddressWithName,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailSecurity {
    Starttls,
    Tls,
    None,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackConfig {
    /// The site owner, who receives every contact form submission.
    pub recipient: EmailAddressWithName,
    pub delivery: DeliveryMode,
    pub workers: usize,
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    Synchronous,
    Background,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub check_connection: bool,
    pub cache_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct AdminConfig {
    pub token: Sensitive<String>,
}

#[cfg(test)]
mod tests {
    use folio_utils::assert_matches;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        environment().source(Some(
            vars.iter()
                .map(|&(k, v)| (k.to_owned(), v.to_owned()))
                .collect::<config::Map<_, _>>(),
        ))
    }

    #[test]
    fn load_default_config() {
        let config = load_from(&[Path::new(DEFAULT_CONFIG_PATH)], None).unwrap();

        assert_eq!(config.email.port, 587);
        assert_eq!(config.feedback.delivery, DeliveryMode::Synchronous);
        assert!(config.email.password.is_none());
        assert!(config.admin.is_none());
    }

    #[test]
    fn environment_overrides() {
        let config = load_from(
            &[Path::new(DEFAULT_CONFIG_PATH)],
            Some(env(&[
                ("FOLIO__EMAIL__HOST", "smtp.sendgrid.net"),
                ("FOLIO__EMAIL__PORT", "465"),
                ("FOLIO__EMAIL__USERNAME", "apikey"),
                ("FOLIO__EMAIL__PASSWORD", "hunter2"),
                ("FOLIO__FEEDBACK__DELIVERY", "background"),
                ("FOLIO__ADMIN__TOKEN", "secret-token"),
            ])),
        )
        .unwrap();

        assert_eq!(config.email.host, "smtp.sendgrid.net");
        assert_eq!(config.email.port, 465);
        assert_eq!(config.email.username.as_deref(), Some("apikey"));
        assert_eq!(config.email.password.as_deref().map(String::as_str), Some("hunter2"));
        assert_eq!(config.feedback.delivery, DeliveryMode::Background);
        assert_eq!(config.admin.unwrap().token.as_str(), "secret-token");
    }

    #[test]
    fn debug_hides_secrets() {
        let config = load_from(
            &[Path::new(DEFAULT_CONFIG_PATH)],
            Some(env(&[
                ("FOLIO__EMAIL__PASSWORD", "hunter2"),
                ("FOLIO__ADMIN__TOKEN", "secret-token"),
            ])),
        )
        .unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn reject_empty_queue() {
        let result = load_from(
            &[Path::new(DEFAULT_CONFIG_PATH)],
            Some(env(&[("FOLIO__FEEDBACK__QUEUE_CAPACITY", "0")])),
        );

        assert_matches!(result, Err(_));
    }
}
