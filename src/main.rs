use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use codehub_backend::{
    AppState, activation::CodeStore, config::Config, database, mail::HttpMailer, routes,
    storage::ArchiveStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    #[cfg(debug_assertions)]
    tracing::info!("Running in debug mode with CORS enabled");

    #[cfg(not(debug_assertions))]
    tracing::info!("Running in production mode with CORS disabled");

    let pool = database::connect(&config.database_url)
        .await
        .expect("Failed to open the database");

    let archives = ArchiveStore::init(&config.upload_dir)
        .await
        .expect("Failed to prepare upload directories");

    let state = AppState {
        pool,
        config: config.clone(),
        codes: Arc::new(CodeStore::new()),
        mailer: Arc::new(HttpMailer::new(&config)),
        archives,
    };

    let router = routes::router(state);

    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router,
    )
    .await
    .expect("Failed to start server");
}
