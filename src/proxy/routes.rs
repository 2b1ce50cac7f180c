use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::error::{ForwardError, ProxyError};
use super::ProxyState;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProcessRecipeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `POST /api/process-recipe`: forwards `{url}` and returns the backend body as-is.
pub async fn process_recipe(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Json<Value>, ProxyError> {
    let request: ProcessRecipeRequest = serde_json::from_slice(&body)
        .map_err(|e| ProxyError::Recipe(ForwardError::InvalidBody(e)))?;

    let recipe_url = non_empty(request.url).ok_or(ProxyError::MissingRecipeUrl)?;

    info!(recipe_url = %recipe_url, "Processing recipe");

    let data = state
        .backend
        .add_and_process_recipe(&recipe_url)
        .await
        .map_err(|e| ProxyError::Recipe(e.into()))?;

    Ok(Json(data))
}

/// `POST /api/chat`: forwards `{url, query}` and wraps the backend body under `data`.
pub async fn chat(
    State(state): State<ProxyState>,
    body: Bytes,
) -> Result<Json<Value>, ProxyError> {
    let request: ChatRequest = serde_json::from_slice(&body)
        .map_err(|e| ProxyError::Chat(ForwardError::InvalidBody(e)))?;

    let query = non_empty(request.query).ok_or(ProxyError::MissingMessage)?;
    let recipe_url = request.url.unwrap_or_default();

    debug!(recipe_url = %recipe_url, query_len = query.len(), "Forwarding chat message");

    let data = state
        .backend
        .chat(&recipe_url, &query)
        .await
        .map_err(|e| ProxyError::Chat(e.into()))?;

    Ok(Json(json!({ "data": data })))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
