// ABOUTME: HTTP API - lead CRUD plus the chat and reset endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use leadloop::prelude::*;

/// Shared server state. A single runtime serves one conversation at a
/// time; the mutex serializes chat requests against it.
pub struct AppState {
    pub store: Arc<LeadStore>,
    pub runtime: Mutex<AgentRuntime>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn not_found(what: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: format!("{} not found", what),
        }),
    )
}

fn internal(err: impl std::fmt::Display) -> ApiError {
    tracing::error!(error = %err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

/// Build the router with all endpoints. CORS is permissive for the dev UI.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/leads", get(list_leads).post(create_lead))
        .route(
            "/leads/{id}",
            get(get_lead).patch(update_lead).delete(delete_lead),
        )
        .route("/chat", post(chat))
        .route("/chat/reset", post(reset_chat))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_leads(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Lead>>, ApiError> {
    let leads = state.store.list().await.map_err(internal)?;
    Ok(Json(leads))
}

async fn get_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Lead>, ApiError> {
    match state.store.get(id).await.map_err(internal)? {
        Some(lead) => Ok(Json(lead)),
        None => Err(not_found("Lead")),
    }
}

async fn create_lead(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<LeadCreate>,
) -> Result<(StatusCode, Json<Lead>), ApiError> {
    let lead = state.store.create(fields).await.map_err(internal)?;
    Ok((StatusCode::CREATED, Json(lead)))
}

async fn update_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(patch): Json<LeadUpdate>,
) -> Result<Json<Lead>, ApiError> {
    match state.store.update(id, patch).await.map_err(internal)? {
        Some(lead) => Ok(Json(lead)),
        None => Err(not_found("Lead")),
    }
}

async fn delete_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state.store.delete(id).await.map_err(internal)?;
    Ok(Json(serde_json::json!({ "ok": deleted })))
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct ChatReply {
    reply: String,
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatBody>,
) -> Json<ChatReply> {
    let mut runtime = state.runtime.lock().await;
    let reply = runtime.run(&body.message).await;
    Json(ChatReply { reply })
}

async fn reset_chat(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    state.runtime.lock().await.reset_memory();
    Json(serde_json::json!({ "ok": true }))
}
