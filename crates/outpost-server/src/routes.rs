/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! HTTP routes for the dispatcher API.
//!
//! - `GET /health` liveness probe
//! - `GET /messages` sent messages, content clamped for display
//! - `POST /toggle` flips the dispatch pause flag

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use outpost::MessagePayload;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/messages", get(list_sent_messages))
        .route("/toggle", post(toggle_pause))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Returns sent messages, newest capped by the configured read limit.
///
/// Content is clamped to the display limit; clamping never fails on short
/// content. Pending messages are not exposed here.
async fn list_sent_messages(
    State(state): State<AppState>,
) -> Result<Json<Vec<MessagePayload>>, ApiError> {
    let messages = state.dal.messages().select_sent(state.sent_read_limit).await?;
    let payloads = messages
        .iter()
        .map(|message| message.to_read_view())
        .collect();
    Ok(Json(payloads))
}

/// Flips the pause flag and acknowledges the toggle.
///
/// The new state takes effect on the next dispatch tick; an in-flight
/// cycle is never interrupted.
async fn toggle_pause(State(state): State<AppState>) -> Json<serde_json::Value> {
    let paused = state.pause.toggle();
    info!(
        "Dispatch pause toggled, dispatch is now {}",
        if paused { "paused" } else { "running" }
    );
    Json(serde_json::json!({ "message": "Toggled pause" }))
}
