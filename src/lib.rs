pub mod api;
pub mod config;
pub mod favorites;
pub mod middleware;
pub mod server;
pub mod tmdb;
pub mod util;

use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("TMDB client error: {0}")]
    Tmdb(#[from] tmdb::TmdbError),
    #[error("Server error: {0}")]
    Server(String),
}

pub async fn run(config: config::Config) -> Result<(), ServerError> {
    if config.debug_logs {
        info!("Debug logging enabled");
    }

    let addr = config.listen_addr()?;
    let tmdb = tmdb::TmdbClient::new(&config.tmdb)?;

    info!("Environment: {:?}", config.environment);
    info!("Serving static files from {}", config.appdir);
    info!("TMDB API key held server-side");

    let tls_paths = config
        .tls_paths()
        .map(|(cert, key)| (cert.to_string(), key.to_string()));

    let state = server::AppState::new(config, tmdb);
    let app = server::build_router(state);

    if let Some((cert_path, key_path)) = tls_paths {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("TMDB proxy server running on https://{}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("TMDB proxy server running on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}
