//! Server configuration
//!
//! All settings come from environment variables with production defaults;
//! a `.env` file is loaded by the binary before this runs.

use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;
use tracing::warn;

/// Fallback business timezone when `TIMEZONE` is missing or unparseable
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Costa_Rica;

#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory; the embedded database lives under it
    pub work_dir: PathBuf,
    pub http_port: u16,
    /// `development` or `production`
    pub environment: String,
    /// Business timezone for civil date/time validation
    pub timezone: Tz,
    /// Base URL of the staff panel, used to build reservation links
    pub admin_base_url: String,
    /// Recipient of staff-facing notification emails
    pub admin_email: String,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,
    /// Minimum spacing between outbound emails, in millis
    pub mailer_min_interval_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let work_dir = env::var("WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/var/lib/mudecoop/server"));

        let http_port = env::var("HTTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);

        let environment =
            env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let timezone = match env::var("TIMEZONE") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(timezone = %raw, "unknown TIMEZONE, falling back to {DEFAULT_TIMEZONE}");
                DEFAULT_TIMEZONE
            }),
            Err(_) => DEFAULT_TIMEZONE,
        };

        let admin_base_url = env::var("ADMIN_BASE_URL")
            .unwrap_or_else(|_| "https://admin.mudecoop.cr".to_string());

        let admin_email = env::var("SMTP_ADMIN_EMAIL")
            .unwrap_or_else(|_| "mudecoop.notificaciones.test@gmail.com".to_string())
            .trim()
            .to_lowercase();

        let smtp_port = env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(587);

        let mailer_min_interval_ms = env::var("MAILER_MIN_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);

        Self {
            work_dir,
            http_port,
            environment,
            timezone,
            admin_base_url,
            admin_email,
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port,
            smtp_username: env::var("SMTP_USER").ok(),
            smtp_password: env::var("SMTP_PASS").ok(),
            smtp_from: env::var("SMTP_FROM").ok(),
            mailer_min_interval_ms,
        }
    }

    /// True when every setting needed to open an SMTP session is present
    pub fn smtp_configured(&self) -> bool {
        self.smtp_host.is_some()
            && self.smtp_username.is_some()
            && self.smtp_password.is_some()
            && self.smtp_from.is_some()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/var/lib/mudecoop/server"),
            http_port: 3000,
            environment: "development".to_string(),
            timezone: DEFAULT_TIMEZONE,
            admin_base_url: "https://admin.mudecoop.cr".to_string(),
            admin_email: "mudecoop.notificaciones.test@gmail.com".to_string(),
            smtp_host: None,
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            smtp_from: None,
            mailer_min_interval_ms: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
        assert!(!config.smtp_configured());
        assert!(!config.is_production());
    }

    #[test]
    fn test_smtp_configured_requires_all_fields() {
        let mut config = Config::default();
        config.smtp_host = Some("smtp.gmail.com".to_string());
        config.smtp_username = Some("bot".to_string());
        assert!(!config.smtp_configured());

        config.smtp_password = Some("secret".to_string());
        config.smtp_from = Some("MUDECOOP <noreply@mudecoop.cr>".to_string());
        assert!(config.smtp_configured());
    }
}
