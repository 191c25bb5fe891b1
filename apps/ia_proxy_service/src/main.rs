use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use dotenvy::dotenv;
use ia_proxy_service::{
    app_module::AppState, app_router::application_router, config::AppConfig,
    shared::rate_limiter::RateLimiter,
};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Refusing to start: {}", e);
            return Err(e).context("invalid configuration");
        }
    };
    let port = config.port;

    let state = AppState::new(config);
    spawn_rate_limit_sweeper(state.rate_limiter.clone());

    let app = application_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("unable to bind port {}", port))?;

    tracing::info!("Server started, listening on port {}", port);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber_builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_level(true)
        .with_span_events(FmtSpan::CLOSE);

    let environment = env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
    if environment == "dev" {
        tracing::subscriber::set_global_default(
            subscriber_builder.pretty().with_ansi(true).finish(),
        )
        .context("setting dev subscriber failed")?;
    } else {
        tracing::subscriber::set_global_default(
            subscriber_builder.json().with_ansi(false).finish(),
        )
        .context("setting prod subscriber failed")?;
    }

    Ok(())
}

fn spawn_rate_limit_sweeper(limiter: Arc<RateLimiter>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(limiter.window());
        loop {
            interval.tick().await;
            limiter.sweep();
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
