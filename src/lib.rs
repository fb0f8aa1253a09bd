pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use axum::{middleware::from_fn_with_state, routing::get, Router};
use crate::middleware::security_headers::SecurityHeaders;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<services::AccountService>,
    pub production: bool,
}

/// The full route table. Anything not listed falls through to a 404 page.
pub fn build_router(state: AppState) -> Router {
    let security = SecurityHeaders {
        hsts: state.production,
    };

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/health", get(handlers::health_handler))
        .route(
            "/register",
            get(handlers::show_register_form).post(handlers::submit_register_form),
        )
        .route(
            "/email-link",
            get(handlers::show_email_link_form).post(handlers::submit_email_link_form),
        )
        .route(
            "/email-link-callback",
            get(handlers::email_link_callback_handler),
        )
        .fallback(handlers::not_found_handler)
        .layer(from_fn_with_state(security, middleware::add_security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
