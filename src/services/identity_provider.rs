//! Client for the managed identity provider.
//!
//! The provider owns every account: this crate never stores users or
//! passwords. Two operations are used, both speaking the Identity Toolkit
//! REST dialect:
//!
//! - `POST /v1/accounts:signUp` creates an email/password account
//! - `POST /v1/accounts:sendOobCode` with `requestType=EMAIL_SIGNIN` and
//!   `returnOobLink=true` issues a sign-in link without mailing it, so the
//!   link can go out through our own mail relay
//!
//! Error bodies look like `{"error": {"code": 400, "message": "EMAIL_EXISTS"}}`;
//! the message is passed through untouched so it can be shown to the user.

use crate::config::ProviderCredentials;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The provider answered and refused the request (duplicate account,
    /// malformed email, weak password, ...).
    #[error("{0}")]
    Rejected(String),

    #[error("Identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status without the usual error envelope.
    #[error("Identity provider returned {0}")]
    UnexpectedStatus(reqwest::StatusCode),

    #[error("Identity provider did not return a sign-in link")]
    MissingLink,
}

/// Account as reported back by the provider after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedUser {
    pub uid: String,
    pub email: String,
}

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait IdentityProvider: Send + Sync {
    async fn create_user(&self, email: &str, password: &str) -> Result<CreatedUser, IdentityError>;
    async fn sign_in_link(&self, email: &str, continue_url: &str) -> Result<String, IdentityError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'static str,
    email: &'a str,
    continue_url: &'a str,
    can_handle_code_in_app: bool,
    return_oob_link: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeResponse {
    #[serde(default)]
    oob_link: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Identity Toolkit REST client.
///
/// Cheap to clone; the inner `reqwest::Client` pools connections.
#[derive(Clone)]
pub struct IdentityToolkitClient {
    client: reqwest::Client,
    credentials: ProviderCredentials,
}

impl IdentityToolkitClient {
    pub fn new(credentials: ProviderCredentials) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            credentials,
        }
    }

    fn url(&self, operation: &str) -> String {
        format!("{}/v1/accounts:{}", self.credentials.endpoint(), operation)
    }

    async fn post<B, R>(&self, operation: &str, body: &B) -> Result<R, IdentityError>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let mut request = self
            .client
            .post(self.url(operation))
            .query(&[("key", self.credentials.api_key.as_str())])
            .json(body);

        if let Some(token) = &self.credentials.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<R>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => {
                tracing::warn!(
                    operation,
                    %status,
                    "identity provider rejected request: {}",
                    envelope.error.message
                );
                Err(IdentityError::Rejected(envelope.error.message))
            }
            Err(_) => {
                tracing::error!(operation, %status, "unexpected identity provider response");
                Err(IdentityError::UnexpectedStatus(status))
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitClient {
    async fn create_user(&self, email: &str, password: &str) -> Result<CreatedUser, IdentityError> {
        let response: SignUpResponse = self
            .post(
                "signUp",
                &SignUpRequest {
                    email,
                    password,
                    return_secure_token: false,
                },
            )
            .await?;

        Ok(CreatedUser {
            uid: response.local_id,
            email: response.email.unwrap_or_else(|| email.to_string()),
        })
    }

    async fn sign_in_link(&self, email: &str, continue_url: &str) -> Result<String, IdentityError> {
        let response: OobCodeResponse = self
            .post(
                "sendOobCode",
                &OobCodeRequest {
                    request_type: "EMAIL_SIGNIN",
                    email,
                    continue_url,
                    can_handle_code_in_app: true,
                    return_oob_link: true,
                },
            )
            .await?;

        response
            .oob_link
            .filter(|link| !link.is_empty())
            .ok_or(IdentityError::MissingLink)
    }
}
