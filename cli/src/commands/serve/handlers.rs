//! # Helpdesk HTTP Handlers
//!
//! File: cli/src/commands/serve/handlers.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Route table and request handlers for the session API:
//!
//! | Method   | Path                          | Result                               |
//! |----------|-------------------------------|--------------------------------------|
//! | `GET`    | `/health`                     | `{"status":"ok"}`                    |
//! | `GET`    | `/api/tools`                  | tool vocabulary                      |
//! | `POST`   | `/api/sessions`               | `201 {"session_id": ...}`            |
//! | `GET`    | `/api/sessions/{id}/messages` | transcript                           |
//! | `POST`   | `/api/sessions/{id}/messages` | `200` reply, `204` for blank input   |
//! | `DELETE` | `/api/sessions/{id}`          | `204`                                |
//!
//! Unknown sessions answer `404` with `{"error": "..."}`. Model failures are
//! not HTTP errors: they come back as a normal `200` assistant message, the
//! same as in the terminal.
//!
use super::sessions::{SessionLimits, SessionRegistry};
use crate::assistant::tools::TOOL_VOCABULARY;
use crate::assistant::{Message, MessagePipeline};
use crate::core::error::HelpdeskError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<MessagePipeline>,
    pub sessions: SessionRegistry,
}

impl AppState {
    #[cfg(test)]
    pub fn new(pipeline: MessagePipeline) -> Self {
        Self::with_limits(pipeline, SessionLimits::default())
    }

    pub fn with_limits(pipeline: MessagePipeline, limits: SessionLimits) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            sessions: SessionRegistry::with_limits(limits),
        }
    }
}

#[derive(Error, Debug)]
pub enum HttpError {
    #[error(transparent)]
    Helpdesk(#[from] HelpdeskError),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Helpdesk(HelpdeskError::SessionNotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Helpdesk(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn not_found(id: Uuid) -> HttpError {
    HelpdeskError::SessionNotFound { id: id.to_string() }.into()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub text: String,
}

/// Builds the API router over `state`. Middleware is added by the caller.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tools", get(list_tools))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", delete(delete_session))
        .route(
            "/api/sessions/{id}/messages",
            get(list_messages).post(submit_message),
        )
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_tools() -> impl IntoResponse {
    Json(TOOL_VOCABULARY)
}

async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    let session_id = state.sessions.insert(state.pipeline.new_session()).await;
    info!("Created session {}", session_id);
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse { session_id }),
    )
}

async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Message>>, HttpError> {
    let session = state.sessions.get(&id).await.ok_or_else(|| not_found(id))?;
    let session = session.lock().await;
    Ok(Json(session.messages().to_vec()))
}

async fn submit_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitRequest>,
) -> Result<Response, HttpError> {
    let session = state.sessions.get(&id).await.ok_or_else(|| not_found(id))?;
    // Held for the whole turn so a session's turns never interleave.
    let mut session = session.lock().await;
    match state.pipeline.submit(&mut session, &request.text).await {
        Some(reply) => Ok((StatusCode::OK, Json(reply)).into_response()),
        None => {
            debug!("Blank submission to session {}", id);
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpError> {
    if state.sessions.remove(&id).await {
        info!(
            "Closed session {} ({} still open)",
            id,
            state.sessions.len().await
        );
        Ok(StatusCode::NO_CONTENT)
    } else {
        warn!("Close requested for unknown session {}", id);
        Err(not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::generator::Generator;
    use crate::assistant::pipeline::{PipelineSettings, GREETING_REPLY};
    use crate::core::error::ApiError;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    struct EchoGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Generator for EchoGenerator {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ApiError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("Answer number {}.", n))
        }
    }

    fn test_state() -> (AppState, Arc<EchoGenerator>) {
        let generator = Arc::new(EchoGenerator {
            calls: AtomicUsize::new(0),
        });
        let pipeline = MessagePipeline::new(
            generator.clone(),
            String::new(),
            PipelineSettings {
                transcript_max_chars: 3000,
                cache_capacity: 16,
            },
        )
        .unwrap();
        (AppState::new(pipeline), generator)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn create(app: &Router) -> String {
        let request = Request::builder()
            .method("POST")
            .uri("/api/sessions")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = test_state();
        let app = routes(state);
        let (status, body) = send(&app, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_list_tools() {
        let (state, _) = test_state();
        let app = routes(state);
        let (status, body) = send(&app, get_req("/api/tools")).await;
        assert_eq!(status, StatusCode::OK);
        let tools = body.as_array().unwrap();
        assert_eq!(tools.len(), TOOL_VOCABULARY.len());
        assert_eq!(tools[0]["key"], "argocd");
    }

    #[tokio::test]
    async fn test_conversation_flow() {
        let (state, generator) = test_state();
        let app = routes(state);
        let id = create(&app).await;
        let uri = format!("/api/sessions/{}/messages", id);

        let (status, reply) = send(&app, post_json(&uri, json!({ "text": "hello" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["role"], "assistant");
        assert_eq!(reply["content"], GREETING_REPLY);

        let (status, reply) =
            send(&app, post_json(&uri, json!({ "text": "How do I deploy with ArgoCD?" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(reply["content"]
            .as_str()
            .unwrap()
            .starts_with("Answer number 1."));
        assert_eq!(reply["tools"][0]["key"], "argocd");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

        let (status, messages) = send(&app, get_req(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        let messages = messages.as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "hello");
    }

    #[tokio::test]
    async fn test_blank_submission_is_no_content() {
        let (state, generator) = test_state();
        let app = routes(state);
        let id = create(&app).await;
        let uri = format!("/api/sessions/{}/messages", id);

        let (status, body) = send(&app, post_json(&uri, json!({ "text": "   " }))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);

        let (_, messages) = send(&app, get_req(&uri)).await;
        assert!(messages.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_cache() {
        let (state, generator) = test_state();
        let app = routes(state);
        let first = format!("/api/sessions/{}/messages", create(&app).await);
        let second = format!("/api/sessions/{}/messages", create(&app).await);
        let question = json!({ "text": "What is Vault?" });

        send(&app, post_json(&first, question.clone())).await;
        send(&app, post_json(&first, question.clone())).await;
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

        send(&app, post_json(&second, question)).await;
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (state, _) = test_state();
        let app = routes(state);
        let uri = format!("/api/sessions/{}/messages", Uuid::new_v4());

        let (status, body) = send(&app, get_req(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not found"));

        let (status, _) = send(&app, post_json(&uri, json!({ "text": "hi" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (state, _) = test_state();
        let sessions = state.sessions.clone();
        let app = routes(state);
        let id = create(&app).await;
        let delete_req = || {
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/sessions/{}", id))
                .body(Body::empty())
                .unwrap()
        };

        let (status, _) = send(&app, delete_req()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(sessions.len().await, 0);

        let (status, _) = send(&app, delete_req()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
