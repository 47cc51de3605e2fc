use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use quickdraw::{
    routes::{health, websocket},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing; RUST_LOG overrides the default filter
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quickdraw=info,tower_http=warn".into()),
        )
        .init();

    println!("🎨 Quickdraw game server starting...");

    // Create application state
    let state = AppState::new();
    println!("🔗 Room store initialized");

    // Browser clients are served from anywhere; the protocol carries
    // no credentials or cookies.
    let cors = CorsLayer::permissive();

    // Build router with all routes
    let app = Router::new()
        // Service banner and health
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/stats", get(health::stats))
        // WebSocket gateway
        .route("/ws", get(websocket::websocket_handler))
        // Static files (client bundle)
        .nest_service("/static", ServeDir::new("static"))
        // Add state
        .with_state(state)
        // Add middleware layers (applied in reverse order)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors));

    // Bind to address
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = format!("0.0.0.0:{}", port);

    println!("🚀 Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("✅ Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
