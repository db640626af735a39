//! Agent Echo server binary.
//!
//! Loads configuration, wires the generation client, feed state, scheduler
//! and HTTP API together, and runs until interrupted.

use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use agent_echo::auth::TelegramAuthService;
use agent_echo::auth::wallet::WalletService;
use agent_echo::config::EchoConfig;
use agent_echo::feed::{AgentCreator, AgentRegistry, FeedScheduler, FeedStore};
use agent_echo::generation::{GenerationClient, OpenAiCompatClient};
use agent_echo::server::{ApiServer, AppState};
use agent_echo::storage::UserStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = load_config();

    let client: Arc<dyn GenerationClient> = Arc::new(OpenAiCompatClient::new(&config.generation)?);
    let registry = Arc::new(RwLock::new(AgentRegistry::new()));
    let feed = Arc::new(RwLock::new(FeedStore::new()));

    let creator = Arc::new(AgentCreator::new(
        Arc::clone(&registry),
        Arc::clone(&feed),
        Arc::clone(&client),
        &config.feed,
    ));

    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel();
    let scheduler = Arc::new(
        FeedScheduler::new(
            Arc::clone(&registry),
            Arc::clone(&feed),
            Arc::clone(&client),
            &config.feed,
        )
        .with_notices(notice_tx),
    );

    // Surface per-agent generation failures as log warnings.
    tokio::spawn(async move {
        while let Some(notice) = notice_rx.recv().await {
            warn!("feed notice: {notice:?}");
        }
    });

    let auth = match config
        .auth
        .bot_token
        .resolve()
        .ok()
        .flatten()
        .map(TelegramAuthService::new)
    {
        Some(Ok(service)) => Some(Arc::new(service)),
        Some(Err(e)) => {
            warn!("auth disabled: {e}");
            None
        }
        None => {
            warn!("auth disabled: no Telegram bot token configured");
            None
        }
    };
    let wallets = Arc::new(WalletService::new(config.storage.wallets_dir()));
    let users = Arc::new(UserStore::new(config.storage.users_dir()));

    let state = AppState {
        registry,
        feed,
        creator,
        scheduler: Arc::clone(&scheduler),
        auth,
        wallets,
        users,
    };

    let server = ApiServer::start(state, &config.server).await?;
    info!("agent-echo ready on port {}", server.port());

    let shutdown = CancellationToken::new();
    let scheduler_handle = scheduler.run(shutdown.clone());

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    // Stop future cycles; an in-flight cycle settles before the task exits.
    shutdown.cancel();
    let _ = scheduler_handle.await;
    server.shutdown();

    Ok(())
}

/// Load config from the default path, falling back to defaults when the
/// file does not exist.
fn load_config() -> EchoConfig {
    let path = EchoConfig::default_config_path();
    match EchoConfig::from_file(&path) {
        Ok(config) => {
            info!("loaded config from {}", path.display());
            config
        }
        Err(e) => {
            info!("using default config ({e})");
            EchoConfig::default()
        }
    }
}
