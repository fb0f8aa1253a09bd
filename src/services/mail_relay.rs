use crate::config::{MailConfig, SmtpEncryption};
use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Failed to build email message: {0}")]
    MessageBuild(String),
    #[error("Failed to send email: {0}")]
    SendFailed(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait Mailer: Send + Sync {
    async fn send_sign_in_link(&self, to_email: &str, link: &str) -> Result<(), MailError>;
}

/// Used when no mail relay account is configured: the link only goes to the log.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_sign_in_link(&self, to_email: &str, link: &str) -> Result<(), MailError> {
        tracing::info!("📧 [LOG MAILER] Sign-in link to: {}", to_email);
        tracing::info!("   Subject: {}", SIGN_IN_SUBJECT);
        tracing::info!("   Link: {}", link);
        tracing::info!("   ---");
        Ok(())
    }
}

pub const SIGN_IN_SUBJECT: &str = "Your sign-in link";

pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = match config.encryption {
            SmtpEncryption::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| MailError::ConfigError(format!("SMTP relay error: {}", e)))?
                .port(config.port)
                .credentials(credentials)
                .build(),
            SmtpEncryption::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| MailError::ConfigError(format!("SMTP starttls error: {}", e)))?
                    .port(config.port)
                    .credentials(credentials)
                    .build()
            }
            SmtpEncryption::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                    .port(config.port)
                    .credentials(credentials)
                    .build()
            }
        };

        Ok(Self {
            mailer,
            from_email: config.from.clone(),
        })
    }
}

pub fn sign_in_html(link: &str) -> String {
    format!(
        r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
</head>
<body style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h1 style="color: #333;">Sign in</h1>
    <p>Click the link below to sign in:</p>
    <p style="text-align: center; margin: 30px 0;">
        <a href="{link}" style="background-color: #2196F3; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px; display: inline-block;">Sign in</a>
    </p>
    <p style="color: #666; font-size: 14px;">Or copy and paste this link into your browser:</p>
    <p style="color: #666; font-size: 14px; word-break: break-all;">{link}</p>
    <p style="color: #999; font-size: 12px; margin-top: 40px;">If you didn't request this link, you can safely ignore this email.</p>
</body>
</html>
"#,
        link = link
    )
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_sign_in_link(&self, to_email: &str, link: &str) -> Result<(), MailError> {
        let email = Message::builder()
            .from(
                self.from_email
                    .parse()
                    .map_err(|e| MailError::MessageBuild(format!("Invalid from address: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| MailError::MessageBuild(format!("Invalid to address: {}", e)))?)
            .subject(SIGN_IN_SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(sign_in_html(link))
            .map_err(|e| MailError::MessageBuild(e.to_string()))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| MailError::SendFailed(e.to_string()))?;

        tracing::info!("Sign-in link mailed to {}", to_email);
        Ok(())
    }
}

/// Picks the SMTP relay when an account is configured, the log mailer otherwise.
pub fn create_mailer(config: Option<&MailConfig>) -> Box<dyn Mailer> {
    match config {
        Some(config) => match SmtpMailer::new(config) {
            Ok(mailer) => {
                tracing::info!("Using SMTP mail relay at {}:{}", config.host, config.port);
                Box::new(mailer)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize SMTP mail relay: {}. Falling back to log mailer",
                    e
                );
                Box::new(LogMailer)
            }
        },
        None => {
            tracing::info!(
                "Mail relay not configured. Sign-in links will be written to the log instead"
            );
            Box::new(LogMailer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        let result = LogMailer
            .send_sign_in_link("someone@example.com", "https://example.com/link")
            .await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_sign_in_html_contains_link_twice() {
        let html = sign_in_html("https://example.com/abc");
        assert_eq!(html.matches("https://example.com/abc").count(), 2);
    }

    #[tokio::test]
    async fn test_smtp_mailer_rejects_bad_recipient_before_sending() {
        let config = MailConfig {
            host: "localhost".to_string(),
            port: 2525,
            encryption: SmtpEncryption::None,
            username: "relay@example.com".to_string(),
            password: "secret".to_string(),
            from: "relay@example.com".to_string(),
        };
        let mailer = SmtpMailer::new(&config).unwrap();

        let result = mailer
            .send_sign_in_link("not-an-address", "https://example.com/link")
            .await;
        assert!(matches!(result, Err(MailError::MessageBuild(_))));
    }
}
