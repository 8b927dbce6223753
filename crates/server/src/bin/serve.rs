use axum::middleware;
use tower_http::{
    propagate_header::PropagateHeaderLayer,
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    trace::TraceLayer,
};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    server::config::load_config();
    server::health::record_start_time();

    if server::config::feature_flags().telemetry {
        server::telemetry::init_telemetry();
    }

    let pool = server::db::create_pool();
    server::db::run_migrations(&pool).await;

    let state = server::db::AppState { pool };

    let mut router = server::rest::api_router();

    // Innermost layer so request spans see the claims the auth
    // middleware inserts.
    if server::config::feature_flags().telemetry {
        router = router.layer(server::telemetry::OtelTraceLayer);
    }

    let app = router
        .layer(middleware::from_fn(server::auth::middleware::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateHeaderLayer::new(axum::http::HeaderName::from_static(
            "x-request-id",
        )))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));

    tracing::info!("Lifecycle engine listening on {addr}");
    axum::serve(listener, app)
        .await
        .expect("Server crashed");
}
