//! HTTP API server.
//!
//! Exposes the agent/feed operations and the auth/storage stubs over a
//! small axum router.
//!
//! ## Endpoints
//!
//! - `POST /api/agents` — create an agent (persona + initial post)
//! - `GET  /api/agents` — list registered agents
//! - `GET  /api/feed` — feed contents, newest first
//! - `POST /api/feed/generate` — manual post-generation trigger
//! - `POST /api/auth/telegram` — stubbed phone-number auth
//! - `GET/POST/DELETE /api/storage` — flat-file user records

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;

use crate::auth::TelegramAuthService;
use crate::auth::wallet::WalletService;
use crate::config::ServerConfig;
use crate::error::{EchoError, Result};
use crate::feed::{AgentCreator, AgentRegistry, FeedScheduler, FeedStore};
use crate::storage::UserStore;

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registered agents.
    pub registry: Arc<RwLock<AgentRegistry>>,
    /// Feed contents.
    pub feed: Arc<RwLock<FeedStore>>,
    /// Agent-creation fast path.
    pub creator: Arc<AgentCreator>,
    /// Scheduler handle for the manual trigger.
    pub scheduler: Arc<FeedScheduler>,
    /// Telegram auth stub. `None` when no bot token is configured; the
    /// auth route then answers 503.
    pub auth: Option<Arc<TelegramAuthService>>,
    /// Wallet generation/persistence.
    pub wallets: Arc<WalletService>,
    /// Flat-file user store.
    pub users: Arc<UserStore>,
}

/// HTTP server owning the bound listener and the serve task.
pub struct ApiServer {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl ApiServer {
    /// Start the API server.
    ///
    /// Binds to `{config.host}:{config.port}` (use port `0` for
    /// auto-assign) and begins serving in a background tokio task.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot bind.
    pub async fn start(state: AppState, config: &ServerConfig) -> Result<Self> {
        let app = router(state);

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| EchoError::Server(format!("bind failed on {bind_addr}: {e}")))?;

        let addr = listener
            .local_addr()
            .map_err(|e| EchoError::Server(format!("failed to get local addr: {e}")))?;

        info!("API server listening on http://{addr}/api");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("API server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Build the API router over the shared state.
fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/agents",
            post(routes::handle_create_agent).get(routes::handle_list_agents),
        )
        .route("/api/feed", get(routes::handle_feed))
        .route("/api/feed/generate", post(routes::handle_generate_now))
        .route("/api/auth/telegram", post(routes::handle_telegram_auth))
        .route(
            "/api/storage",
            get(routes::handle_storage_get)
                .post(routes::handle_storage_save)
                .delete(routes::handle_storage_delete),
        )
        .with_state(state)
}
