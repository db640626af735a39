//! Centralized application directory paths.
//!
//! Provides a single source of truth for the filesystem paths used by the
//! service. Uses the [`dirs`] crate for platform-appropriate resolution.
//!
//! # Directory Layout
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | App data | `~/Library/Application Support/agent-echo/` | `~/.local/share/agent-echo/` |
//! | Config | `~/Library/Application Support/agent-echo/` | `~/.config/agent-echo/` |
//!
//! # Environment Overrides
//!
//! - `AGENT_ECHO_DATA_DIR` — overrides [`data_dir`]
//! - `AGENT_ECHO_CONFIG_DIR` — overrides [`config_dir`]

use std::path::PathBuf;

/// Application data root directory.
///
/// Used for persistent user data: user JSON records and wallet files.
///
/// Resolves to `dirs::data_dir()/agent-echo/` by default. Override with
/// the `AGENT_ECHO_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("AGENT_ECHO_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("agent-echo"))
        .unwrap_or_else(|| PathBuf::from("/tmp/agent-echo-data"))
}

/// Application config directory.
///
/// Used for `config.toml`. Resolves to `dirs::config_dir()/agent-echo/` by
/// default. Override with the `AGENT_ECHO_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("AGENT_ECHO_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("agent-echo"))
        .unwrap_or_else(|| PathBuf::from("/tmp/agent-echo-config"))
}
