use axum::{http::HeaderValue, routing::get};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use shulea_server::{app, config::Config, migrator, telemetry};
use tower_cookies::Key;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    telemetry::init_telemetry("shulea-server", &config)?;

    let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();

    let db = Database::connect(&config.database_url).await?;
    migrator::Migrator::up(&db, None).await?;

    shulea_server::metrics::init_metrics(&db).await;

    let session_key = match &config.session_secret {
        Some(secret) => Key::try_from(secret.as_slice())?,
        None => {
            tracing::warn!("SESSION_SECRET not set, sessions will not survive a restart");
            Key::generate()
        }
    };
    let cors_origin = config.cors_origin.parse::<HeaderValue>()?;

    let app = app::router(db, session_key, cors_origin)
        .layer(prometheus_layer)
        .route("/metrics", get(move || async move { metric_handle.render() }));

    tracing::info!("listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
