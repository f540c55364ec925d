use crate::api;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Extension, Router,
};
use sea_orm::DatabaseConnection;
use tower_cookies::Key;

async fn health_check() -> &'static str {
    "OK"
}

/// Builds every route the portal serves. Metrics export is layered on by the
/// binary so tests can build routers freely.
pub fn router(db: DatabaseConnection, session_key: Key, cors_origin: HeaderValue) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(api::auth::register))
        .route("/login", post(api::auth::login))
        .route("/logout", post(api::auth::logout));

    let protected_routes = Router::new()
        .route(
            "/profile",
            get(api::profile::get_profile).put(api::profile::update_profile),
        )
        .route(
            "/students",
            get(api::students::list_students).post(api::students::create_student),
        )
        .route(
            "/students/:id",
            get(api::students::get_student).put(api::students::update_student),
        )
        .route(
            "/students/:id/marks",
            get(api::marks::list_marks).post(api::marks::record_mark),
        )
        .route("/students/:id/performance", get(api::marks::get_performance))
        .route(
            "/alerts",
            get(api::alerts::list_alerts).put(api::alerts::mark_alert_read),
        )
        .route("/schools", post(api::schools::create_school))
        .route(
            "/schools/:id/theme",
            get(api::schools::get_theme).put(api::schools::update_theme),
        )
        .route(
            "/education-content",
            get(api::education::list_content).post(api::education::create_content),
        )
        .route_layer(axum::middleware::from_fn(api::middleware::auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes)
        .merge(protected_routes)
        .layer(Extension(db))
        .layer(Extension(session_key))
        .layer(tower_cookies::CookieManagerLayer::new())
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched| matched.as_str());

                    // "METHOD /matched/path", e.g. "POST /students/:id/marks"
                    let span_name = match matched_path {
                        Some(path) => format!("{} {}", request.method(), path),
                        None => format!("{} {}", request.method(), request.uri().path()),
                    };

                    let user_ip = request
                        .headers()
                        .get("x-forwarded-for")
                        .and_then(|v| v.to_str().ok())
                        .or_else(|| {
                            request
                                .headers()
                                .get("x-real-ip")
                                .and_then(|v| v.to_str().ok())
                        })
                        .unwrap_or("unknown");

                    // Handlers fill in the empty fields
                    tracing::info_span!(
                        "request",
                        "otel.name" = span_name,
                        user_ip = user_ip,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        table = tracing::field::Empty,
                        action = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        student_id = tracing::field::Empty,
                        business_event = tracing::field::Empty,
                        error = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_request(|_request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {})
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, span: &tracing::Span| {
                        span.record("status", tracing::field::display(response.status()));
                        span.record("latency", tracing::field::debug(latency));
                        tracing::info!("request completed");
                    },
                ),
        )
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(cors_origin)
                .allow_methods([Method::GET, Method::POST, Method::PUT])
                .allow_headers([axum::http::header::CONTENT_TYPE])
                .allow_credentials(true),
        )
}
