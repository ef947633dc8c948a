//! Application host: binds a listener and serves the composed API

use std::time::Duration;

use axum::{
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    Json, Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{handlers, RouterAggregator};
use crate::config::{ApiConfig, DocsConfig, ServerConfig};
use crate::error::{AppError, ErrorResponse, Result};

/// Application metadata published in the OpenAPI document
#[derive(Debug, Clone)]
pub struct AppMetadata {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

impl AppMetadata {
    /// An empty OpenAPI document carrying this metadata
    pub fn openapi(&self) -> OpenApi {
        OpenApiBuilder::new()
            .info(
                InfoBuilder::new()
                    .title(self.title.clone())
                    .version(self.version.clone())
                    .description(self.description.clone())
                    .build(),
            )
            .build()
    }
}

impl From<&ApiConfig> for AppMetadata {
    fn from(config: &ApiConfig) -> Self {
        Self {
            title: config.title.clone(),
            version: config.version.clone(),
            description: config.description.clone(),
        }
    }
}

/// Compose the served application: API routes, docs, 404 fallback and HTTP layers
pub fn build_app(
    api: &RouterAggregator,
    metadata: &AppMetadata,
    docs: &DocsConfig,
    server: &ServerConfig,
) -> Result<Router> {
    let mut app = api.build()?;

    if docs.enabled {
        check_docs_paths(api, docs)?;
        let document = api.openapi(metadata.openapi());
        app = app.merge(
            SwaggerUi::new(docs.swagger_path.clone()).url(docs.openapi_path.clone(), document),
        );
        info!(
            swagger = %docs.swagger_path,
            openapi = %docs.openapi_path,
            "API documentation enabled"
        );
    }

    Ok(app.fallback(handlers::not_found).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::map_response(json_error_body))
            .layer(TimeoutLayer::new(Duration::from_secs(
                server.request_timeout_secs,
            ))),
    ))
}

/// Give the router's own bodiless 405 and the timeout's 408 the same
/// `{"detail": ...}` body as every other error
async fn json_error_body(response: Response) -> Response {
    let detail = match response.status() {
        StatusCode::METHOD_NOT_ALLOWED => "Method Not Allowed",
        StatusCode::REQUEST_TIMEOUT => "Request Timeout",
        _ => return response,
    };

    if response.headers().contains_key(header::CONTENT_TYPE) {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);

    (
        parts,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
        .into_response()
}

/// Documentation endpoints share the path space with the API
fn check_docs_paths(api: &RouterAggregator, docs: &DocsConfig) -> Result<()> {
    docs.check_distinct().map_err(|e| AppError::RouteConflict(e.to_string()))?;

    let swagger = docs.swagger_path.trim_end_matches('/');
    let swagger_dir = format!("{}/", swagger);

    for route in api.routes() {
        if route.path == docs.openapi_path
            || route.path == swagger
            || route.path.starts_with(&swagger_dir)
        {
            return Err(AppError::RouteConflict(format!(
                "{} {} collides with the documentation endpoints",
                route.method, route.path
            )));
        }
    }

    Ok(())
}

/// Bind the configured listening address
pub async fn bind(server: &ServerConfig) -> Result<TcpListener> {
    let listener = TcpListener::bind(server.address()).await?;
    Ok(listener)
}

/// Serve `app` on `listener` until Ctrl+C or SIGTERM
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
