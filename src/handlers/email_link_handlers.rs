use crate::error::{AppError, Result};
use crate::services::SignInLinkRequest;
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse, Form};
use serde::Deserialize;

#[derive(Template, WebTemplate)]
#[template(path = "email_link.html")]
struct EmailLinkTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "email_link_sent.html")]
struct EmailLinkSentTemplate {
    email: String,
}

#[derive(Deserialize)]
pub struct EmailLinkForm {
    #[serde(default)]
    pub email: String,
}

pub async fn show_email_link_form() -> impl IntoResponse {
    EmailLinkTemplate
}

pub async fn submit_email_link_form(
    State(state): State<AppState>,
    Form(form): Form<EmailLinkForm>,
) -> Result<impl IntoResponse> {
    let email = form.email.trim().to_string();

    state
        .account_service
        .send_sign_in_link(SignInLinkRequest {
            email: email.clone(),
        })
        .await
        .map_err(AppError::SignInLink)?;

    Ok(EmailLinkSentTemplate { email })
}
