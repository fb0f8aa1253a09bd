use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::RawQuery, http::StatusCode, response::IntoResponse};

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
struct IndexTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "email_link_callback.html")]
struct EmailLinkCallbackTemplate;

#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    path: String,
}

pub async fn index_handler() -> impl IntoResponse {
    IndexTemplate
}

/// Liveness probe target. Touches nothing external.
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Landing page for links opened from the sign-in email.
///
/// Completing the sign-in happens in the browser; the query string carries
/// the provider's one-time code and is not inspected here.
pub async fn email_link_callback_handler(RawQuery(query): RawQuery) -> impl IntoResponse {
    tracing::debug!(has_query = query.is_some(), "email link callback hit");
    EmailLinkCallbackTemplate
}

pub async fn not_found_handler(uri: axum::http::Uri) -> impl IntoResponse {
    tracing::debug!("no route for {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            path: uri.path().to_string(),
        },
    )
}
