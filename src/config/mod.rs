pub mod credentials;

use std::env;

pub use credentials::ProviderCredentials;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {0}: {1}")]
    Invalid(&'static str, String),
    #[error("Cannot read credentials file {path}: {source}")]
    CredentialsUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed credentials file {path}: {source}")]
    CredentialsMalformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// How the SMTP connection to the mail relay is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpEncryption {
    Tls,
    StartTls,
    None,
}

impl SmtpEncryption {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_lowercase().as_str() {
            "tls" => Ok(Self::Tls),
            "starttls" => Ok(Self::StartTls),
            "none" => Ok(Self::None),
            other => Err(ConfigError::Invalid(
                "SMTP_ENCRYPTION",
                format!("{}. Use 'tls', 'starttls', or 'none'", other),
            )),
        }
    }
}

/// Mail relay account. Only present when both `MAIL_USER` and `MAIL_PASS` are set.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub encryption: SmtpEncryption,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl MailConfig {
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let (username, password) = match (non_empty_var("MAIL_USER"), non_empty_var("MAIL_PASS")) {
            (Some(user), Some(pass)) => (user, pass),
            _ => return Ok(None),
        };

        let host = env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "465".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid("SMTP_PORT", e.to_string()))?;
        let encryption =
            SmtpEncryption::parse(&env::var("SMTP_ENCRYPTION").unwrap_or_else(|_| "tls".into()))?;
        let from = non_empty_var("MAIL_FROM").unwrap_or_else(|| username.clone());

        Ok(Some(Self {
            host,
            port,
            encryption,
            username,
            password,
            from,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
    pub credentials_file: String,
    pub mail: Option<MailConfig>,
    pub production: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid("PORT", e.to_string()))?;
        let base_url = non_empty_var("BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{}", port));
        let credentials_file =
            env::var("IDENTITY_CREDENTIALS_FILE").unwrap_or_else(|_| "credentials.json".into());
        let production = env::var("ENVIRONMENT")
            .map(|env| env == "production")
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            base_url,
            credentials_file,
            mail: MailConfig::from_env()?,
            production,
        })
    }

    /// Where the provider sends users back after they open a sign-in link.
    pub fn sign_in_continue_url(&self) -> String {
        format!("{}/email-link-callback", self.base_url)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
