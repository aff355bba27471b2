//! # rentctl: availability and reservations for event-equipment rental
//!
//! `rentctl` is the stock-side backend of an event-equipment rental business:
//! it tracks how many units of each catalog product are owned, holds
//! date-ranged reservations against them, and answers the two questions the
//! booking site and the admin console keep asking — "how many are free on
//! this day?" and "how busy is this month?".
//!
//! ## Architecture
//!
//! The HTTP layer is [Axum](https://github.com/tokio-rs/axum); persistence is
//! PostgreSQL via SQLx with embedded migrations. The crate splits into three
//! layers:
//!
//! - The **availability engine** ([`availability`]) is pure computation over
//!   fetched rows: a single day-boundary overlap primitive, per-product
//!   availability with status classification, month-level utilization bands,
//!   and the peak-overlap sum used by the capacity check.
//! - The **database layer** ([`db`]) uses the repository pattern: one
//!   repository per table, wrapping a `&mut PgConnection` so the same code
//!   runs over a pool connection or a transaction.
//! - The **API layer** ([`api`]) validates input, assembles rows, and maps
//!   the engine's output and the error taxonomy onto HTTP.
//!
//! ## Capacity invariant
//!
//! Reservation creation is the one path that can violate "reserved never
//! exceeds owned": two concurrent requests could both pass a naive check and
//! both insert. The create handler therefore runs check-then-insert inside a
//! transaction holding a per-stock advisory lock
//! ([`db::handlers::Reservations::lock_stock`]); availability reads stay
//! lock-free and may observe a slightly stale snapshot, which is fine for
//! display.
//!
//! ## Quick start
//!
//! ```no_run
//! use clap::Parser;
//! use rentctl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = rentctl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!     rentctl::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await
//! }
//! ```

pub mod api;
pub mod availability;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use axum::{
    http::{self, HeaderValue},
    routing::{delete, get, post},
    Router,
};
use bon::Builder;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, instrument, Level};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;
use config::CorsOrigin;
use openapi::ApiDoc;

/// Application state shared across all request handlers.
///
/// Constructed once at startup and cloned per request; there are no
/// process-global clients.
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the rentctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().trim_end_matches('/').parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(config.cors.allow_credentials)
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE]);

    if let Some(max_age) = config.cors.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router: public availability queries under
/// `/api/v1`, admin stock management under `/admin/api/v1`, API docs at
/// `/admin/docs`.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let public_routes = Router::new()
        .route("/availability", get(api::handlers::availability::get_availability))
        .route("/availability/calendar", get(api::handlers::availability::get_calendar));

    // Expected to sit behind the deployment's auth proxy; this service does
    // not implement sessions itself.
    let admin_routes = Router::new()
        .route(
            "/stock",
            get(api::handlers::stocks::list_stock).post(api::handlers::stocks::upsert_stock),
        )
        .route("/stock/reservations", post(api::handlers::reservations::create_reservation))
        .route(
            "/stock/reservations/{id}",
            delete(api::handlers::reservations::cancel_reservation),
        );

    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api/v1", public_routes)
        .nest("/admin/api/v1", admin_routes)
        .with_state(state)
        .merge(Scalar::with_url("/admin/docs", ApiDoc::openapi()))
        .layer(cors_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    Ok(router)
}

/// Main application struct that owns the router, the connection pool, and the
/// configuration.
///
/// Lifecycle: [`Application::new`] connects to PostgreSQL and runs
/// migrations; [`Application::serve`] binds the listener and handles requests
/// until the shutdown future resolves, then closes the pool.
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance, connecting a fresh pool from the
    /// configured database URL.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create an application over an existing pool (used by tests, which get
    /// their pool from the test harness). Migrations run in either case;
    /// they are idempotent.
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        let pool = match pool {
            Some(pool) => pool,
            None => PgPool::connect(&config.database_url).await?,
        };
        migrator().run(&pool).await?;

        let state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("rentctl listening on http://{bind_addr}");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::create_test_app;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_healthz(pool: PgPool) {
        let server = create_test_app(pool).await;
        let response = server.get("/healthz").await;
        response.assert_status_ok();
        response.assert_text("OK");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_openapi_docs_served(pool: PgPool) {
        let server = create_test_app(pool).await;
        let response = server.get("/admin/docs").await;
        response.assert_status_ok();
    }
}
