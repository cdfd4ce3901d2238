//! Control bridge: REST endpoints plus a WebSocket event stream for a web
//! dashboard.
//!
//! `POST /api/send` sends a text, `GET /api/status` reports the session and
//! `GET /ws` streams [`HubEvent`](crate::hub::HubEvent)s.

mod ws;

use crate::hub::Hub;
use crate::types::UserInfo;
use crate::Error;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub const DEFAULT_PORT: u16 = 3001;

/// Request body for POST /api/send.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    /// Phone number or full JID.
    pub to: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SendResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub connected: bool,
    pub name: String,
    pub user: Option<UserInfo>,
}

async fn handle_send(
    State(hub): State<Arc<Hub>>,
    Json(body): Json<SendRequest>,
) -> Result<Json<SendResponse>, (StatusCode, Json<ErrorResponse>)> {
    hub.send_text(&body.to, &body.text).await.map_err(|e| {
        if !matches!(e, Error::NotConnected) {
            tracing::warn!(to = %body.to, error = %e, "api send failed");
        }
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;
    Ok(Json(SendResponse { ok: true }))
}

async fn handle_status(State(hub): State<Arc<Hub>>) -> Json<StatusResponse> {
    let user = hub.user();
    Json(StatusResponse {
        connected: user.is_some(),
        name: hub.bot_name().to_string(),
        user,
    })
}

/// Build the bridge router. CORS is open to any origin.
pub fn router(hub: Arc<Hub>) -> Router {
    Router::new()
        .route("/api/send", post(handle_send))
        .route("/api/status", get(handle_status))
        .route("/ws", get(ws::handle_upgrade))
        .layer(CorsLayer::permissive())
        .with_state(hub)
}

/// Serve the bridge on an already bound listener until the server fails.
pub async fn serve(listener: TcpListener, hub: Arc<Hub>) -> crate::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "bridge listening");
    }
    axum::serve(listener, router(hub))
        .await
        .map_err(anyhow::Error::from)?;
    Ok(())
}
