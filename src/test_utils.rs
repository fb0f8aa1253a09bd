pub mod test_helpers {
    use crate::config::ProviderCredentials;
    use crate::services::{
        AccountService, IdentityProvider, IdentityToolkitClient, MailError, Mailer,
    };
    use crate::AppState;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    pub const TEST_CONTINUE_URL: &str = "http://localhost:3000/email-link-callback";

    /// Credentials pointing the identity client at a local stand-in server
    pub fn credentials_for(endpoint: &str) -> ProviderCredentials {
        ProviderCredentials {
            project_id: "test-project".to_string(),
            api_key: "test-api-key".to_string(),
            access_token: None,
            endpoint: Some(endpoint.to_string()),
        }
    }

    /// Mailer that keeps every (recipient, link) pair instead of sending it
    #[derive(Default)]
    pub struct RecordingMailer {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingMailer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().map(|s| s.clone()).unwrap_or_default()
        }

        pub fn count(&self) -> usize {
            self.sent().len()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_sign_in_link(&self, to_email: &str, link: &str) -> Result<(), MailError> {
            if let Ok(mut sent) = self.sent.lock() {
                sent.push((to_email.to_string(), link.to_string()));
            }
            Ok(())
        }
    }

    /// Mailer whose relay is always down
    pub struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send_sign_in_link(&self, _to_email: &str, _link: &str) -> Result<(), MailError> {
            Err(MailError::SendFailed("relay unavailable".to_string()))
        }
    }

    pub fn create_test_state(
        identity: Arc<dyn IdentityProvider>,
        mailer: Arc<dyn Mailer>,
    ) -> AppState {
        AppState {
            account_service: Arc::new(AccountService::new(identity, mailer, TEST_CONTINUE_URL)),
            production: false,
        }
    }

    /// App state wired to a real identity client talking to `endpoint`
    pub fn create_state_for_endpoint(endpoint: &str, mailer: Arc<dyn Mailer>) -> AppState {
        let identity = Arc::new(IdentityToolkitClient::new(credentials_for(endpoint)));
        create_test_state(identity, mailer)
    }
}
