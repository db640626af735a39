//! Stubbed phone-number authentication slice.
//!
//! Disconnected from the feed: fabricates a session token and a placeholder
//! wallet keypair, persisted as flat JSON files. No real identity
//! verification or custodial key management happens here.

pub mod telegram;
pub mod wallet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use telegram::TelegramAuthService;
pub use wallet::{Wallet, WalletService};

/// Telegram user fields captured by the auth stub.
///
/// The `id` is fabricated (unix millis at auth time); real Telegram
/// verification is out of scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramUser {
    /// Numeric user ID.
    pub id: i64,
    /// Phone number as submitted.
    pub phone_number: String,
    /// Optional Telegram username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Optional first name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Optional last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// A user record produced by the auth flow and persisted as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Telegram identity fields.
    pub telegram: TelegramUser,
    /// Placeholder wallet (includes the private key; never returned over
    /// the API).
    pub wallet: Wallet,
    /// Fabricated session token.
    pub session_token: String,
    /// Stamped on every save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
