//! Telegram authentication stub.
//!
//! Fabricates a session token from the submitted phone number. A real
//! deployment would drive Telegram's login flow here; this service only
//! mirrors its surface.

use chrono::Utc;

use crate::error::{EchoError, Result};

/// Stubbed Telegram auth service.
///
/// Constructed once and injected where needed; there is no process-global
/// instance.
pub struct TelegramAuthService {
    #[allow(dead_code)]
    token: String,
}

impl TelegramAuthService {
    /// Create the service with a bot token.
    ///
    /// The stub never calls Telegram, but an empty token is still rejected
    /// so a misconfigured deployment fails at startup rather than at the
    /// first login.
    ///
    /// # Errors
    ///
    /// Returns an error when the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(EchoError::Auth("Telegram bot token is required".to_owned()));
        }
        Ok(Self { token })
    }

    /// Begin the auth flow for a phone number, returning a session token.
    ///
    /// The token has the shape `session_{unix_millis}_{phone digits}`.
    ///
    /// # Errors
    ///
    /// Returns an error when the phone number contains no digits.
    pub fn start_auth(&self, phone_number: &str) -> Result<String> {
        let digits: String = phone_number.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(EchoError::Auth(
                "phone number must contain digits".to_owned(),
            ));
        }
        Ok(format!("session_{}_{digits}", Utc::now().timestamp_millis()))
    }

    /// Release any held resources. No-op in the stub.
    pub fn cleanup(&self) {}
}
