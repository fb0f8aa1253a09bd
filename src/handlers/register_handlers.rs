use crate::error::{AppError, Result};
use crate::services::RegistrationRequest;
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse, Form};
use serde::Deserialize;

#[derive(Template, WebTemplate)]
#[template(path = "register.html")]
struct RegisterTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "register_success.html")]
struct RegisterSuccessTemplate {
    email: String,
    uid: String,
}

/// Missing fields are forwarded as empty strings; the provider decides what
/// counts as a valid account.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn show_register_form() -> impl IntoResponse {
    RegisterTemplate
}

pub async fn submit_register_form(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<impl IntoResponse> {
    let user = state
        .account_service
        .register(RegistrationRequest {
            email: form.email.trim().to_string(),
            password: form.password,
        })
        .await
        .map_err(AppError::Registration)?;

    Ok(RegisterSuccessTemplate {
        email: user.email,
        uid: user.uid,
    })
}
