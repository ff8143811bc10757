//! HTTP route handlers for the summarizer API.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::loader::ContentKind;
use crate::session::{SessionError, SessionId, Turn};
use crate::summarizer::SummaryStyle;

use super::error::ApiError;
use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/summarize", post(summarize))
        .route("/ask", post(ask))
        .with_state(state)
}

/// Liveness message.
async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Article Summarizer API is running"
    }))
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let sessions = state.store.count().await;
    Json(serde_json::json!({
        "status": "ok",
        "service": "article-summarizer",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.model.model_name(),
        "sessions": sessions
    }))
}

/// Summarize request.
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    /// Article or YouTube URL.
    pub url: String,
    /// Summary style selector; unknown values fall back to executive.
    pub style: Option<String>,
}

/// Summarize response.
#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    /// Summary text.
    pub summary: String,
    /// Key insights in model order.
    pub key_insights: Vec<String>,
    /// How the URL was classified.
    pub content_type: ContentKind,
    /// Session for follow-up questions.
    pub session_id: SessionId,
}

/// Fetch, summarize and open a session.
async fn summarize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let Json(request) = payload?;
    let loaded = state.loader.load(request.url.trim()).await?;
    state.model.check_credentials()?;

    let style = SummaryStyle::from_selector(request.style.as_deref());
    let summary = state
        .summarizer
        .summarize(&loaded.text, loaded.kind, style)
        .await?;

    let session_id = state
        .store
        .create(loaded.text, loaded.kind, summary.clone())
        .await?;
    tracing::info!(%session_id, content_type = %loaded.kind, %style, "Session created");

    Ok(Json(SummarizeResponse {
        summary: summary.summary,
        key_insights: summary.key_insights,
        content_type: loaded.kind,
        session_id,
    }))
}

/// Ask request.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Identifier returned by `/summarize`.
    pub session_id: String,
    /// Follow-up question.
    pub question: String,
}

/// Ask response.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// Model answer.
    pub answer: String,
    /// Full conversation log of the session, oldest first.
    pub conversation_history: Vec<Turn>,
}

/// Answer a follow-up question within a session.
async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(request) = payload?;
    let id = SessionId::from_str(&request.session_id).map_err(|_| SessionError::NotFound)?;
    let answer = state.qa.answer(id, &request.question).await?;

    Ok(Json(AskResponse {
        answer: answer.answer,
        conversation_history: answer.history,
    }))
}
