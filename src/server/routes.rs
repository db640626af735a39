//! Route handlers and wire types for the API server.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::auth::{AuthenticatedUser, TelegramUser};
use crate::error::EchoError;
use crate::feed::scheduler::CycleOutcome;
use crate::feed::types::{Agent, Post};
use crate::server::AppState;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/agents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    /// Free-text persona prompt (10-500 chars).
    pub prompt: String,
}

/// Response body for `POST /api/agents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgentResponse {
    /// The created agent.
    pub agent: Agent,
    /// The agent's initial post.
    pub post: Post,
}

/// Response body for `POST /api/feed/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Whether a cycle actually ran (false when suppressed).
    pub triggered: bool,
    /// Posts merged into the feed by this cycle.
    pub posts_added: usize,
    /// Per-agent failures, when a cycle ran.
    #[serde(default)]
    pub failures: Vec<GenerateFailure>,
}

/// One failed generation within a manual cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateFailure {
    /// Affected agent.
    pub agent_id: String,
    /// Failure description.
    pub error: String,
}

/// Request body for `POST /api/auth/telegram`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramAuthRequest {
    /// Phone number as entered by the user.
    pub phone_number: String,
}

/// Response body for `POST /api/auth/telegram`.
///
/// The wallet's private key is never included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramAuthResponse {
    /// Always true on success.
    pub success: bool,
    /// Fabricated session token.
    pub session: String,
    /// Public wallet fields only.
    pub wallet: WalletPublic,
}

/// Public subset of a wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletPublic {
    /// Hex-encoded public key.
    pub public_key: String,
}

/// Query parameters for the storage routes.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageQuery {
    /// Telegram user ID. Optional on GET (list all), required on DELETE.
    pub id: Option<String>,
}

/// Generic success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always true.
    pub success: bool,
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The error details.
    pub error: ErrorBody,
}

/// Error details within an [`ErrorResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub message: String,
    /// Error type (e.g. `"invalid_request_error"`, `"server_error"`).
    #[serde(rename = "type")]
    pub error_type: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    let error_type = if status.is_client_error() {
        "invalid_request_error"
    } else {
        "server_error"
    };
    (
        status,
        Json(ErrorResponse {
            error: ErrorBody {
                message: message.into(),
                error_type: error_type.to_owned(),
            },
        }),
    )
}

/// Map a crate error to an HTTP status.
fn status_for(err: &EchoError) -> StatusCode {
    match err {
        EchoError::Validation(_) => StatusCode::BAD_REQUEST,
        EchoError::Generation(_) => StatusCode::BAD_GATEWAY,
        EchoError::Auth(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ---------------------------------------------------------------------------
// Agent + feed handlers
// ---------------------------------------------------------------------------

/// `POST /api/agents` — create an agent and its initial post.
pub async fn handle_create_agent(
    State(state): State<AppState>,
    Json(request): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<CreateAgentResponse>), ApiError> {
    match state.creator.create_agent(&request.prompt).await {
        Ok((agent, post)) => Ok((StatusCode::CREATED, Json(CreateAgentResponse { agent, post }))),
        Err(e) => {
            error!("agent creation failed: {e}");
            Err(error_response(status_for(&e), e.to_string()))
        }
    }
}

/// `GET /api/agents` — list registered agents in creation order.
pub async fn handle_list_agents(State(state): State<AppState>) -> Json<Vec<Agent>> {
    Json(state.registry.read().await.snapshot())
}

/// `GET /api/feed` — feed contents, newest first.
pub async fn handle_feed(State(state): State<AppState>) -> Json<Vec<Post>> {
    Json(state.feed.read().await.posts().to_vec())
}

/// `POST /api/feed/generate` — manual post-generation trigger.
///
/// Shares the scheduler's overlap guard: a trigger arriving while a cycle
/// is in flight (or with no agents registered) reports `triggered: false`.
pub async fn handle_generate_now(State(state): State<AppState>) -> Json<GenerateResponse> {
    let outcome = state.scheduler.run_cycle().await;
    let response = match outcome {
        CycleOutcome::Skipped(_) => GenerateResponse {
            triggered: false,
            posts_added: 0,
            failures: Vec::new(),
        },
        CycleOutcome::Completed {
            posts_added,
            failures,
        } => GenerateResponse {
            triggered: true,
            posts_added,
            failures: failures
                .into_iter()
                .map(|f| GenerateFailure {
                    agent_id: f.agent_id,
                    error: f.error,
                })
                .collect(),
        },
    };
    Json(response)
}

// ---------------------------------------------------------------------------
// Auth + storage handlers
// ---------------------------------------------------------------------------

/// `POST /api/auth/telegram` — stubbed phone-number auth.
///
/// Fabricates a session token and a placeholder wallet, persists the user
/// record and the wallet file, and responds without the private key.
pub async fn handle_telegram_auth(
    State(state): State<AppState>,
    Json(request): Json<TelegramAuthRequest>,
) -> Result<Json<TelegramAuthResponse>, ApiError> {
    let auth = state.auth.as_ref().ok_or_else(|| {
        error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "authentication is not configured",
        )
    })?;

    let session = auth
        .start_auth(&request.phone_number)
        .map_err(|e| error_response(status_for(&e), e.to_string()))?;

    let wallet = state.wallets.create_wallet();

    // Stub ID; a real flow would take this from Telegram verification.
    let telegram_id = Utc::now().timestamp_millis();

    let user = AuthenticatedUser {
        telegram: TelegramUser {
            id: telegram_id,
            phone_number: request.phone_number,
            username: None,
            first_name: None,
            last_name: None,
        },
        wallet: wallet.clone(),
        session_token: session.clone(),
        updated_at: None,
    };

    state
        .wallets
        .save_wallet_to_file(&wallet, telegram_id)
        .and_then(|()| state.users.save(&user))
        .map_err(|e| {
            error!("authentication persistence failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
        })?;

    Ok(Json(TelegramAuthResponse {
        success: true,
        session,
        wallet: WalletPublic {
            public_key: wallet.public_key,
        },
    }))
}

/// `GET /api/storage[?id=]` — one user record, or all of them.
pub async fn handle_storage_get(
    State(state): State<AppState>,
    Query(query): Query<StorageQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(id) = query.id else {
        let users = state
            .users
            .list()
            .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
        let json = serde_json::to_value(users)
            .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
        return Ok(Json(json));
    };

    let id = parse_user_id(&id)?;
    let user = state
        .users
        .get(id)
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, format!("no user with id {id}")))?;

    let json = serde_json::to_value(user)
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(json))
}

/// `POST /api/storage` — upsert a user record.
pub async fn handle_storage_save(
    State(state): State<AppState>,
    Json(user): Json<AuthenticatedUser>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.users.save(&user).map_err(|e| {
        error!("user save failed: {e}");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store user data")
    })?;
    Ok(Json(SuccessResponse { success: true }))
}

/// `DELETE /api/storage?id=` — delete a user record.
pub async fn handle_storage_delete(
    State(state): State<AppState>,
    Query(query): Query<StorageQuery>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = query
        .id
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, "User ID is required"))?;
    let id = parse_user_id(&id)?;

    let removed = state
        .users
        .delete(id)
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    if !removed {
        return Err(error_response(
            StatusCode::NOT_FOUND,
            format!("no user with id {id}"),
        ));
    }
    Ok(Json(SuccessResponse { success: true }))
}

fn parse_user_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("invalid user id: {raw:?}"),
        )
    })
}
