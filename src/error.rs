use crate::services::{AccountServiceError, IdentityError};
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Failures surfaced by the form handlers. Each variant remembers which form
/// the user came from so the error page can link back to it.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Registration failed: {0}")]
    Registration(#[source] AccountServiceError),

    #[error("Sign-in link failed: {0}")]
    SignInLink(#[source] AccountServiceError),
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub heading: &'a str,
    pub message: String,
    pub back_href: &'a str,
    pub back_label: &'a str,
}

impl AppError {
    fn source_error(&self) -> &AccountServiceError {
        match self {
            AppError::Registration(e) | AppError::SignInLink(e) => e,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.source_error() {
            AccountServiceError::Identity(IdentityError::Rejected(_)) => StatusCode::BAD_REQUEST,
            AccountServiceError::Identity(_) | AccountServiceError::Mail(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.source_error().to_string();

        let (heading, back_href, back_label) = match self {
            AppError::Registration(_) => ("Registration failed", "/register", "Back to registration"),
            AppError::SignInLink(_) => (
                "Could not send sign-in link",
                "/email-link",
                "Back to email sign-in",
            ),
        };

        tracing::warn!(%status, "{}: {}", heading, message);

        let template = ErrorTemplate {
            heading,
            message,
            back_href,
            back_label,
        };

        let html = template.render().unwrap_or_else(|_| {
            format!(
                "<html><body><h1>{}</h1><p><a href=\"{}\">{}</a></p></body></html>",
                heading, back_href, back_label
            )
        });

        (status, Html(html)).into_response()
    }
}
