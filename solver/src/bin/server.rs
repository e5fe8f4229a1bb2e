use tl_prob::env_config;
use tl_prob::server::create_router;

#[tokio::main]
async fn main() {
    env_config::init_tracing("info");
    env_config::init_rayon_threads();
    let port = env_config::server_port();
    let config = env_config::engine_config();
    tracing::info!(port, max_table_cells = config.max_table_cells, "starting tl-prob server");

    let app = create_router(config);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(port, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!("server is running on port {}. Press Ctrl+C to stop.", port);
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }

    tracing::info!("stopping server");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install CTRL+C signal handler");
    }
}
