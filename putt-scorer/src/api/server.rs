use anyhow::Context;
use axum::{
    extract::State,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::{trace::{Sampler, SdkTracerProvider}, Resource};
use std::env;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::api::error::{ApiError, ApiResult};
use crate::api::handlers::{
    adjust_score_handler, compare_handicaps_handler, generate_gift_codes_handler,
    get_handicap_handler, recalculate_handicap_handler, update_profile_handler,
};
use crate::api::state::AppState;
use crate::config::Config;
use crate::db;

const SERVICE_NAME: &str = "putt-scorer";

pub fn init_tracing() {
    let enable_otel = env::var("OTEL_ENABLED").map(|v| v == "true").unwrap_or(false);

    let otel_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4318/v1/traces".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_target(false)
                .with_span_events(if enable_otel {
                    fmt::format::FmtSpan::NONE
                } else {
                    fmt::format::FmtSpan::CLOSE
                }),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=info,hyper=warn,tower=warn,h2=error")),
        );

    if enable_otel {
        match init_opentelemetry(&otel_endpoint) {
            Ok(provider) => {
                opentelemetry::global::set_tracer_provider(provider.clone());
                let tracer = provider.tracer(SERVICE_NAME);

                subscriber.with(OpenTelemetryLayer::new(tracer)).init();

                info!("OpenTelemetry enabled: {}", otel_endpoint);
            }
            Err(e) => {
                subscriber.init();
                tracing::error!("Failed to initialize OpenTelemetry: {}. Continuing with logs only.", e);
            }
        }
    } else {
        subscriber.init();
    }
}

fn init_opentelemetry(endpoint: &str) -> Result<SdkTracerProvider, Box<dyn std::error::Error>> {
    let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    let service_name = env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| SERVICE_NAME.to_string());

    // default 1%
    let sampling_rate = env::var("OTEL_TRACE_SAMPLING_RATE")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.01)
        .clamp(0.0, 1.0);

    let resource = Resource::builder()
        .with_attribute(KeyValue::new("service.name", service_name))
        .with_attribute(KeyValue::new("service.version", env!("CARGO_PKG_VERSION")))
        .with_attribute(KeyValue::new("deployment.environment", environment))
        .build();

    let exporter = SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()?;

    let provider = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(Sampler::TraceIdRatioBased(sampling_rate))
        .with_batch_exporter(exporter)
        .build();

    info!("OpenTelemetry sampling rate: {}%", sampling_rate * 100.0);

    Ok(provider)
}

/// Build the router over an already constructed state
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/api/calculate-handicap",
            get(get_handicap_handler)
                .post(recalculate_handicap_handler)
                .put(update_profile_handler),
        )
        .route("/api/handicap/adjust", post(adjust_score_handler))
        .route("/api/handicap/compare", get(compare_handicaps_handler))
        .route("/api/admin/gift-codes/generate", post(generate_gift_codes_handler))
        .route("/health", get(health_check))
        .route("/health/db", get(database_health_check))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn database_health_check(State(state): State<AppState>) -> ApiResult<&'static str> {
    db::health_check(&state.pool)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;
    Ok("OK")
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    info!("Starting Proof of Putt scorer");

    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = db::create_pool(&config)
        .await
        .context("Failed to create database pool")?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let app = create_app(AppState::new(pool.clone(), config));

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutting down gracefully...");
    };

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Database pool closed");

    Ok(())
}
