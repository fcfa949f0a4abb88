use anyhow::Context;
use axum::Router;
use axum::routing::{get, post, put};
use axum_prometheus::PrometheusMetricLayer;

use tokio::net;
use crate::domain::AppState;
use crate::infrastructure::http::handlers::health_check;
use handlers::site_management::{
    default_legacy_content, fetch_default_site_management, fetch_site_management,
    legacy_content, publish, reset_draft_to_defaults, reset_draft_to_published,
    restore_version, save_draft,
};

mod api;
mod handlers;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig<'a> {
    pub port: &'a str,
}

/// The application's HTTP server. The underlying HTTP package is opaque to module consumers.
pub struct HttpServer {
    router: axum::Router,
    listener: net::TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub async fn new(state: impl AppState, config: HttpServerConfig<'_>) -> anyhow::Result<Self> {
        let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
            |request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                tracing::info_span!("http_request", method = ?request.method(), uri)
            },
        );
        // see: https://github.com/metrics-rs/metrics
        // see: https://github.com/Ptrskay3/axum-prometheus
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

        let router = router(state)
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(trace_layer)
            .layer(prometheus_layer);

        let listener = net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("failed to listen on {}", config.port))?;

        Ok(Self { router, listener })
    }

    /// Runs the HTTP server.
    pub async fn run(self) -> anyhow::Result<()> {
        if let Ok(address) = self.listener.local_addr() {
            tracing::debug!("listening on {}", address);
        }
        axum::serve(self.listener, self.router)
            .await
            .context("received error from running server")?;
        Ok(())
    }
}

/// Application routes without the metrics and tracing layers.
fn router<S: AppState>(state: S) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes<S: AppState>() -> Router<S> {
    Router::new()
        .route("/sites/{site_id}/management", get(fetch_site_management::<S>))
        .route("/sites/{site_id}/management/draft", put(save_draft::<S>))
        .route("/sites/{site_id}/management/publish", post(publish::<S>))
        .route("/sites/{site_id}/management/reset", post(reset_draft_to_published::<S>))
        .route("/sites/{site_id}/management/defaults", post(reset_draft_to_defaults::<S>))
        .route(
            "/sites/{site_id}/management/versions/{version}/restore",
            post(restore_version::<S>),
        )
        .route("/sites/{site_id}/legacy", get(legacy_content::<S>))
        .route("/site/management", get(fetch_default_site_management::<S>))
        .route("/site/legacy", get(default_legacy_content::<S>))
}
