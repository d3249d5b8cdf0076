//! Configuration types.

use crate::error::ConfigError;

/// Site-wide notification settings.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Site name, prefixed onto every subject line.
    pub site_name: String,
    /// Address all notifications are sent from (and replied to).
    pub sender_address: String,
    /// Administrators who receive postage notices and special-email copies.
    pub site_administrator_emails: Vec<String>,
    /// Maximum PDF attachments per postage email. `None` or zero means
    /// everything goes in one email.
    pub attachment_limit: Option<u32>,
    /// Whether administrators are CC'd on the special-email allow-list.
    pub administrators_get_special_emails: bool,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            site_name: "Roster".to_string(),
            sender_address: "notifier@localhost".to_string(),
            site_administrator_emails: Vec::new(),
            attachment_limit: None,
            administrators_get_special_emails: false,
        }
    }
}

impl NotifierConfig {
    /// Build config from `ROSTER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let site_name = std::env::var("ROSTER_SITE_NAME")
            .map_err(|_| ConfigError::MissingEnvVar("ROSTER_SITE_NAME".into()))?;
        let sender_address = std::env::var("ROSTER_SENDER_ADDRESS")
            .map_err(|_| ConfigError::MissingEnvVar("ROSTER_SENDER_ADDRESS".into()))?;

        let site_administrator_emails: Vec<String> = std::env::var("ROSTER_ADMIN_EMAILS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let attachment_limit = match std::env::var("ROSTER_ATTACHMENT_LIMIT") {
            Err(_) => None,
            Ok(raw) => Some(raw.parse::<u32>().map_err(|e| ConfigError::InvalidValue {
                key: "ROSTER_ATTACHMENT_LIMIT".into(),
                message: e.to_string(),
            })?),
        };

        let administrators_get_special_emails = std::env::var("ROSTER_ADMINS_GET_SPECIAL_EMAILS")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            site_name,
            sender_address,
            site_administrator_emails,
            attachment_limit,
            administrators_get_special_emails,
        })
    }

    /// Sender rendered as a display-name mailbox, e.g. `"Roster <notifier@x>"`.
    pub fn sender_with_name(&self) -> String {
        format!("{} <{}>", self.site_name, self.sender_address)
    }

    /// Subject line with the site-name prefix applied.
    pub fn format_subject(&self, text: &str) -> String {
        format!("{} - {}", self.site_name, text)
    }
}

/// SMTP connection settings for the lettre mailer.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl SmtpConfig {
    /// Build config from environment variables.
    /// Returns `None` if `ROSTER_SMTP_HOST` is not set (transport disabled).
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("ROSTER_SMTP_HOST").ok()?;

        let port: u16 = std::env::var("ROSTER_SMTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(587);

        let username = std::env::var("ROSTER_SMTP_USERNAME").unwrap_or_default();
        let password = std::env::var("ROSTER_SMTP_PASSWORD").unwrap_or_default();

        Some(Self {
            host,
            port,
            username,
            password,
        })
    }
}
