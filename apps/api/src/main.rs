use campus_voice_api::{
    config::{Config, StorageBackend},
    infrastructure::{
        database::pool::create_pool,
        ml::{
            gemini_client::GeminiClient, heuristic_analyzer::HeuristicAnalyzer,
            traits::{AbuseClassifier, ComplaintAnalyzer},
        },
        repositories::in_memory::InMemoryStore,
        security::{abuse_detector::AbuseDetector, rate_limiter::RateLimiter},
    },
    presentation::http::{
        routes::create_router,
        state::{AppState, Repositories},
    },
    workers::urgency_sweep::UrgencySweepWorker,
};
use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use http::{HeaderValue, Method, header};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Uses RUST_LOG if set, otherwise sensible defaults
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| {
            tracing_subscriber::EnvFilter::try_new(
                "info,campus_voice_api=debug,tower_http=debug",
            )
        })
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;

    let (db, repos) = match config.storage_backend {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let db = create_pool(url, config.database_max_connections).await?;
            let mut migrator = sqlx::migrate!("./migrations");
            migrator.set_ignore_missing(config.ignore_missing_migrations);
            migrator.run(&db).await?;
            (Some(db.clone()), Repositories::postgres(db))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            (None, Repositories::in_memory(InMemoryStore::new()))
        }
    };

    let rate_limiter = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            Some(Arc::new(RateLimiter::new(client, 3600)))
        }
        None => None,
    };

    let (analyzer, detector): (Arc<dyn ComplaintAnalyzer>, AbuseDetector) =
        match &config.gemini_api_key {
            Some(key) => {
                let gemini = Arc::new(GeminiClient::new(
                    key.clone(),
                    config.gemini_model.clone(),
                    Duration::from_secs(config.ai_timeout_seconds),
                )?);
                tracing::info!(model = %config.gemini_model, "Model-backed analysis enabled");
                let classifier: Arc<dyn AbuseClassifier> = gemini.clone();
                let analyzer: Arc<dyn ComplaintAnalyzer> = gemini;
                (analyzer, AbuseDetector::new(Some(classifier)))
            }
            None => {
                tracing::info!("GEMINI_API_KEY not set; using heuristic analysis only");
                let heuristic: Arc<dyn ComplaintAnalyzer> = Arc::new(HeuristicAnalyzer);
                (heuristic, AbuseDetector::new(None))
            }
        };

    let state = AppState {
        db,
        config: config.clone(),
        repos,
        detector,
        analyzer,
        rate_limiter,
    };

    if let Some(admin) = &config.bootstrap_admin {
        state
            .auth()
            .bootstrap_admin(&admin.username, &admin.email, &admin.password_hash)
            .await?;
    }

    if config.urgency_sweep_interval_seconds > 0 {
        let sweep =
            UrgencySweepWorker::new(state.cluster_engine(), config.urgency_sweep_interval_seconds);
        tokio::spawn(async move { sweep.start().await });
    }

    let origins = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    let app = create_router(state)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Campus Voice API listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("SIGTERM received, initiating graceful shutdown");
        }
    }
}
