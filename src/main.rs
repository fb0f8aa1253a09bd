use hello_auth::{
    build_router,
    config::{AppConfig, ProviderCredentials},
    services::{create_mailer, AccountService, IdentityToolkitClient, Mailer},
    AppState,
};
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hello_auth=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Without provider credentials there is nothing to serve
    let credentials = ProviderCredentials::load(&config.credentials_file).map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;
    tracing::info!(
        "Loaded identity provider credentials for project {}",
        credentials.project_id
    );

    let identity = Arc::new(IdentityToolkitClient::new(credentials));
    let mailer: Arc<dyn Mailer> = Arc::from(create_mailer(config.mail.as_ref()));
    let account_service = Arc::new(AccountService::new(
        identity,
        mailer,
        config.sign_in_continue_url(),
    ));

    let app = build_router(AppState {
        account_service,
        production: config.production,
    });

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
