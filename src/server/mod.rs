pub mod error;
pub mod state;

use crate::handlers::{facilitator, participant};
use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use log::info;
use state::AppState;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::signal;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/facilitator/results", get(facilitator::all_results))
        .route("/api/facilitator/:subject/:topic", get(facilitator::topic_view))
        .route("/api/facilitator/:subject/:topic/results", get(facilitator::topic_results))
        .route(
            "/api/facilitator/:subject/:topic/active",
            post(facilitator::activate_poll),
        )
        .route(
            "/:subject/:topic",
            get(participant::show_active_poll).post(participant::submit_answer),
        )
        .route(
            "/:subject/:topic/:poll",
            get(participant::legacy_poll_redirect).post(participant::legacy_poll_redirect),
        )
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} in {:?}",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}

pub async fn serve(address: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!("Listening on {}", address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
