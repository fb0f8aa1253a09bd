use crate::services::identity_provider::{CreatedUser, IdentityError, IdentityProvider};
use crate::services::mail_relay::{MailError, Mailer};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Mail(#[from] MailError),
}

pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
}

pub struct SignInLinkRequest {
    pub email: String,
}

/// Account operations exposed to the web layer. Holds no state of its own.
pub struct AccountService {
    identity: Arc<dyn IdentityProvider>,
    mailer: Arc<dyn Mailer>,
    continue_url: String,
}

impl AccountService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        mailer: Arc<dyn Mailer>,
        continue_url: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            mailer,
            continue_url: continue_url.into(),
        }
    }

    pub async fn register(
        &self,
        request: RegistrationRequest,
    ) -> Result<CreatedUser, AccountServiceError> {
        let user = self
            .identity
            .create_user(&request.email, &request.password)
            .await?;

        tracing::info!(uid = %user.uid, "registered {}", user.email);
        Ok(user)
    }

    /// Obtains a sign-in link for the address and mails it there.
    ///
    /// The mailer is only reached once the provider has issued a link.
    pub async fn send_sign_in_link(
        &self,
        request: SignInLinkRequest,
    ) -> Result<(), AccountServiceError> {
        let link = self
            .identity
            .sign_in_link(&request.email, &self.continue_url)
            .await?;

        self.mailer.send_sign_in_link(&request.email, &link).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::identity_provider::MockIdentityProvider;
    use crate::services::mail_relay::MockMailer;
    use mockall::predicate::*;

    const CONTINUE_URL: &str = "http://localhost:3000/email-link-callback";

    #[tokio::test]
    async fn test_register_returns_provider_user() {
        let mut mock_identity = MockIdentityProvider::new();

        mock_identity
            .expect_create_user()
            .with(eq("new@example.com"), eq("hunter22"))
            .times(1)
            .returning(|email, _| {
                let email = email.to_string();
                Box::pin(async move {
                    Ok(CreatedUser {
                        uid: "uid-1".to_string(),
                        email,
                    })
                })
            });

        let service = AccountService::new(
            Arc::new(mock_identity),
            Arc::new(MockMailer::new()),
            CONTINUE_URL,
        );

        let user = service
            .register(RegistrationRequest {
                email: "new@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.uid, "uid-1");
        assert_eq!(user.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_register_passes_rejection_through() {
        let mut mock_identity = MockIdentityProvider::new();

        mock_identity
            .expect_create_user()
            .times(1)
            .returning(|_, _| {
                Box::pin(async move { Err(IdentityError::Rejected("EMAIL_EXISTS".to_string())) })
            });

        let service = AccountService::new(
            Arc::new(mock_identity),
            Arc::new(MockMailer::new()),
            CONTINUE_URL,
        );

        let result = service
            .register(RegistrationRequest {
                email: "taken@example.com".to_string(),
                password: "hunter22".to_string(),
            })
            .await;

        match result {
            Err(AccountServiceError::Identity(IdentityError::Rejected(msg))) => {
                assert_eq!(msg, "EMAIL_EXISTS")
            }
            _ => panic!("expected provider rejection"),
        }
    }

    #[tokio::test]
    async fn test_sign_in_link_is_mailed_once_to_requester() {
        let mut mock_identity = MockIdentityProvider::new();
        let mut mock_mailer = MockMailer::new();

        mock_identity
            .expect_sign_in_link()
            .with(eq("reader@example.com"), eq(CONTINUE_URL))
            .times(1)
            .returning(|_, _| {
                Box::pin(async move { Ok("https://auth.example.com/link?oob=abc".to_string()) })
            });

        mock_mailer
            .expect_send_sign_in_link()
            .with(
                eq("reader@example.com"),
                eq("https://auth.example.com/link?oob=abc"),
            )
            .times(1)
            .returning(|_, _| Box::pin(async move { Ok(()) }));

        let service =
            AccountService::new(Arc::new(mock_identity), Arc::new(mock_mailer), CONTINUE_URL);

        let result = service
            .send_sign_in_link(SignInLinkRequest {
                email: "reader@example.com".to_string(),
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_mailer_untouched_when_provider_fails() {
        let mut mock_identity = MockIdentityProvider::new();
        let mut mock_mailer = MockMailer::new();

        mock_identity
            .expect_sign_in_link()
            .times(1)
            .returning(|_, _| {
                Box::pin(async move { Err(IdentityError::Rejected("INVALID_EMAIL".to_string())) })
            });
        mock_mailer.expect_send_sign_in_link().times(0);

        let service =
            AccountService::new(Arc::new(mock_identity), Arc::new(mock_mailer), CONTINUE_URL);

        let result = service
            .send_sign_in_link(SignInLinkRequest {
                email: "bad".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AccountServiceError::Identity(_))));
    }

    #[tokio::test]
    async fn test_mail_failure_surfaces() {
        let mut mock_identity = MockIdentityProvider::new();
        let mut mock_mailer = MockMailer::new();

        mock_identity
            .expect_sign_in_link()
            .returning(|_, _| Box::pin(async move { Ok("https://link".to_string()) }));
        mock_mailer
            .expect_send_sign_in_link()
            .times(1)
            .returning(|_, _| {
                Box::pin(async move { Err(MailError::SendFailed("relay down".to_string())) })
            });

        let service =
            AccountService::new(Arc::new(mock_identity), Arc::new(mock_mailer), CONTINUE_URL);

        let result = service
            .send_sign_in_link(SignInLinkRequest {
                email: "reader@example.com".to_string(),
            })
            .await;
        match result {
            Err(AccountServiceError::Mail(e)) => assert!(e.to_string().contains("relay down")),
            _ => panic!("expected mail failure"),
        }
    }
}
