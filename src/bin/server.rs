use sheet_optimizer::api::{AppState, router};
use sheet_optimizer::config::ServerConfig;
use tracing::Level;

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let _sentry = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init(sentry::ClientOptions {
            dsn: dsn.parse().ok(),
            release: sentry::release_name!(),
            ..Default::default()
        })
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .unwrap_or_else(|e| {
            eprintln!("Error: failed to open {}: {e}", config.log_file);
            std::process::exit(1);
        });

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let addr = config.addr();
    let app = router(AppState {
        timeout: config.timeout,
    });

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap_or_else(|e| {
        eprintln!("Error: failed to bind {addr}: {e}");
        std::process::exit(1);
    });
    eprintln!("Listening on {addr}");
    tracing::info!(%addr, "server started");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server stopped");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
