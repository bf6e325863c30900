use std::error::Error;
use std::net::SocketAddr;
use axum::{
    routing::get,
    Router,
    extract::State,
    response::{ Html, IntoResponse },
    http::header::CONTENT_TYPE,
};
use serde::Serialize;
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, error };

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const STYLE_CSS: &str = include_str!("../../assets/style.css");
const WIDGET_JS: &str = include_str!("../../assets/widget.js");

/// Tells the page where to open its socket. The host is whatever the browser
/// used to load the page.
#[derive(Serialize, Clone, Debug)]
pub struct WidgetConfig {
    pub ws_port: u16,
    pub ws_path: String,
}

#[derive(Clone)]
struct AppState {
    widget: WidgetConfig,
}

pub fn router(ws_port: u16) -> Router {
    let app_state = AppState {
        widget: WidgetConfig { ws_port, ws_path: "/".to_string() },
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/static/style.css", get(style_handler))
        .route("/static/widget.js", get(script_handler))
        .route("/api/widget-config", get(widget_config_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(cors)
        .with_state(app_state)
}

/// Binds `addr` and serves the widget page in the background. Returns the
/// address actually bound.
pub async fn start_http_server(
    addr: &str,
    ws_port: u16,
) -> Result<SocketAddr, Box<dyn Error + Send + Sync>> {
    let listener = tokio::net::TcpListener::bind(addr).await
        .map_err(|e| format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e))?;
    let local_addr = listener.local_addr()?;
    info!("Starting HTTP server on: http://{}", local_addr);

    let app = router(ws_port);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app.into_make_service()).await {
            error!("HTTP server error: {}", e);
        }
    });

    Ok(local_addr)
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn style_handler() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

async fn script_handler() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/javascript; charset=utf-8")], WIDGET_JS)
}

async fn widget_config_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.widget)
}
