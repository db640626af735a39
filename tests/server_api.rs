//! End-to-end API tests over a bound listener.
//!
//! Full wiring: a wiremock-backed generation client, temp-dir flat-file
//! storage, and the real axum server on an auto-assigned port.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agent_echo::auth::TelegramAuthService;
use agent_echo::auth::wallet::WalletService;
use agent_echo::config::{EchoConfig, GenerationConfig, SecretRef, ServerConfig};
use agent_echo::feed::{AgentCreator, AgentRegistry, FeedScheduler, FeedStore};
use agent_echo::generation::{GenerationClient, OpenAiCompatClient};
use agent_echo::server::{ApiServer, AppState};
use agent_echo::storage::UserStore;

struct TestHarness {
    server: ApiServer,
    provider: MockServer,
    data_dir: tempfile::TempDir,
    http: reqwest::Client,
}

impl TestHarness {
    async fn start() -> Self {
        let provider = MockServer::start().await;
        let data_dir = tempfile::tempdir().unwrap();
        let config = EchoConfig {
            generation: GenerationConfig {
                api_url: provider.uri(),
                api_model: "test-model".to_owned(),
                api_key: SecretRef::None,
                timeout_secs: 5,
                ..GenerationConfig::default()
            },
            server: ServerConfig {
                host: "127.0.0.1".to_owned(),
                port: 0,
            },
            ..EchoConfig::default()
        };

        let client: Arc<dyn GenerationClient> =
            Arc::new(OpenAiCompatClient::new(&config.generation).unwrap());
        let registry = Arc::new(RwLock::new(AgentRegistry::new()));
        let feed = Arc::new(RwLock::new(FeedStore::new()));

        let state = AppState {
            registry: Arc::clone(&registry),
            feed: Arc::clone(&feed),
            creator: Arc::new(AgentCreator::new(
                Arc::clone(&registry),
                Arc::clone(&feed),
                Arc::clone(&client),
                &config.feed,
            )),
            scheduler: Arc::new(FeedScheduler::new(
                registry,
                feed,
                client,
                &config.feed,
            )),
            auth: Some(Arc::new(TelegramAuthService::new("123456:test-token").unwrap())),
            wallets: Arc::new(WalletService::new(data_dir.path().join("wallets"))),
            users: Arc::new(UserStore::new(data_dir.path().join("users"))),
        };

        let server = ApiServer::start(state, &config.server).await.unwrap();
        Self {
            server,
            provider,
            data_dir,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, route: &str) -> String {
        format!("http://{}{route}", self.server.addr())
    }

    async fn mock_completion(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": content },
                    "finish_reason": "stop"
                }]
            })))
            .mount(&self.provider)
            .await;
    }
}

#[tokio::test]
async fn create_agent_then_generate_grows_the_feed() {
    let harness = TestHarness::start().await;
    harness.mock_completion("generated text").await;

    let response = harness
        .http
        .post(harness.url("/api/agents"))
        .json(&json!({ "prompt": "A cheerful optimist who loves technology" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let created: serde_json::Value = response.json().await.unwrap();
    assert_eq!(created["agent"]["description"], "generated text");
    assert!(created["post"]["id"].as_str().unwrap().starts_with("post-"));

    // The initial post is in the feed.
    let feed: serde_json::Value = harness
        .http
        .get(harness.url("/api/feed"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(feed.as_array().unwrap().len(), 1);

    // Manual trigger adds one post per registered agent.
    let generated: serde_json::Value = harness
        .http
        .post(harness.url("/api/feed/generate"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(generated["triggered"], true);
    assert_eq!(generated["posts_added"], 1);

    let feed: serde_json::Value = harness
        .http
        .get(harness.url("/api/feed"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(feed.as_array().unwrap().len(), 2);

    let agents: serde_json::Value = harness
        .http
        .get(harness.url("/api/agents"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(agents.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn short_prompt_is_rejected_with_400() {
    let harness = TestHarness::start().await;

    let response = harness
        .http
        .post(harness.url("/api/agents"))
        .json(&json!({ "prompt": "too short" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn provider_failure_maps_to_bad_gateway() {
    let harness = TestHarness::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&harness.provider)
        .await;

    let response = harness
        .http
        .post(harness.url("/api/agents"))
        .json(&json!({ "prompt": "A cheerful optimist who loves technology" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 502);
}

#[tokio::test]
async fn generate_without_agents_reports_untriggered() {
    let harness = TestHarness::start().await;

    let generated: serde_json::Value = harness
        .http
        .post(harness.url("/api/feed/generate"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(generated["triggered"], false);
    assert_eq!(generated["posts_added"], 0);
}

#[tokio::test]
async fn telegram_auth_persists_user_and_redacts_private_key() {
    let harness = TestHarness::start().await;

    let response = harness
        .http
        .post(harness.url("/api/auth/telegram"))
        .json(&json!({ "phone_number": "+1 (555) 867-5309" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["session"].as_str().unwrap().starts_with("session_"));
    assert!(body["session"].as_str().unwrap().ends_with("_15558675309"));
    assert!(body["wallet"]["public_key"].is_string());
    assert!(body["wallet"].get("private_key").is_none());

    // User record and wallet file were written.
    let users: Vec<_> = std::fs::read_dir(harness.data_dir.path().join("users"))
        .unwrap()
        .collect();
    assert_eq!(users.len(), 1);
    let wallets: Vec<_> = std::fs::read_dir(harness.data_dir.path().join("wallets"))
        .unwrap()
        .collect();
    assert_eq!(wallets.len(), 1);
}

#[tokio::test]
async fn digitless_phone_number_is_rejected() {
    let harness = TestHarness::start().await;

    let response = harness
        .http
        .post(harness.url("/api/auth/telegram"))
        .json(&json!({ "phone_number": "not a phone" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn storage_routes_round_trip() {
    let harness = TestHarness::start().await;

    let user = json!({
        "telegram": { "id": 777, "phone_number": "+15550001" },
        "wallet": {
            "public_key": "ab",
            "private_key": "cd",
            "created_at": "2026-01-01T00:00:00Z"
        },
        "session_token": "session_1_15550001"
    });

    // Upsert.
    let response = harness
        .http
        .post(harness.url("/api/storage"))
        .json(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // Fetch by ID; save stamped updated_at.
    let fetched: serde_json::Value = harness
        .http
        .get(harness.url("/api/storage?id=777"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["telegram"]["id"], 777);
    assert!(fetched["updated_at"].is_string());

    // List all.
    let all: serde_json::Value = harness
        .http
        .get(harness.url("/api/storage"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 1);

    // Delete, then the record is gone.
    let response = harness
        .http
        .delete(harness.url("/api/storage?id=777"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = harness
        .http
        .get(harness.url("/api/storage?id=777"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = harness
        .http
        .delete(harness.url("/api/storage?id=777"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn storage_delete_requires_an_id() {
    let harness = TestHarness::start().await;

    let response = harness
        .http
        .delete(harness.url("/api/storage"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = harness
        .http
        .delete(harness.url("/api/storage?id=not-a-number"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}
