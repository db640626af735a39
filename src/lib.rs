//! Agent Echo: AI persona social feed demo.
//!
//! Users define short natural-language personas; each becomes a simulated
//! social-media agent backed by a hosted language model. A recurring
//! scheduler generates one post per agent per cycle and merges the results
//! into a descending-timestamp feed.
//!
//! # Architecture
//!
//! - **Generation**: persona/post creation via an OpenAI-compatible
//!   completions API (`reqwest`)
//! - **Feed**: in-memory agent registry and post store, driven by the
//!   overlap-guarded [`feed::FeedScheduler`]
//! - **Auth**: stubbed phone-number login fabricating a session token and a
//!   placeholder wallet keypair
//! - **Storage**: flat-file JSON user records
//! - **Server**: small axum API surface over all of the above

pub mod app_dirs;
pub mod auth;
pub mod config;
pub mod error;
pub mod feed;
pub mod generation;
pub mod server;
pub mod storage;

pub use config::EchoConfig;
pub use error::{EchoError, Result};
pub use feed::{AgentCreator, AgentRegistry, FeedScheduler, FeedStore};
pub use generation::{GenerationClient, OpenAiCompatClient};
pub use server::{ApiServer, AppState};
