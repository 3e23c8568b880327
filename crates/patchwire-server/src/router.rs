//! Axum router wiring (HTTP -> WS upgrade).
//!
//! Exposes `/v1/ws` for WebSocket upgrades and `/healthz` for liveness.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/ws", get(transport::ws::ws_upgrade))
        .route("/healthz", get(ops::healthz))
        .with_state(state)
}
