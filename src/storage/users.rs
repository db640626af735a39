//! Flat-file JSON user store.
//!
//! One pretty-printed JSON file per user under the users directory, named
//! `{telegram_id}.json`. This is the only durable state in the system.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::warn;

use crate::auth::AuthenticatedUser;
use crate::error::{EchoError, Result};

/// Flat-file store for [`AuthenticatedUser`] records.
pub struct UserStore {
    users_dir: PathBuf,
}

impl UserStore {
    /// Create a store rooted at the given directory.
    pub fn new(users_dir: impl Into<PathBuf>) -> Self {
        Self {
            users_dir: users_dir.into(),
        }
    }

    /// Save (upsert) a user record, stamping `updated_at`.
    ///
    /// Returns the stamped record as written.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be serialized/written.
    pub fn save(&self, user: &AuthenticatedUser) -> Result<AuthenticatedUser> {
        std::fs::create_dir_all(&self.users_dir)
            .map_err(|e| EchoError::Storage(format!("cannot create users dir: {e}")))?;

        let mut stamped = user.clone();
        stamped.updated_at = Some(Utc::now());

        let json = serde_json::to_string_pretty(&stamped)
            .map_err(|e| EchoError::Storage(format!("cannot serialize user: {e}")))?;

        let path = self.user_path(stamped.telegram.id);
        std::fs::write(&path, json)
            .map_err(|e| EchoError::Storage(format!("cannot write user file: {e}")))?;

        Ok(stamped)
    }

    /// Load a user record by Telegram ID. `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error on read failures other than not-found, or when the
    /// file cannot be parsed.
    pub fn get(&self, telegram_id: i64) -> Result<Option<AuthenticatedUser>> {
        let path = self.user_path(telegram_id);
        let raw = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(EchoError::Storage(format!("cannot read user file: {e}")));
            }
        };

        let user = serde_json::from_str(&raw)
            .map_err(|e| EchoError::Storage(format!("cannot parse user file: {e}")))?;
        Ok(Some(user))
    }

    /// List every stored user record.
    ///
    /// Unparseable files are skipped with a warning rather than failing the
    /// whole listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be enumerated.
    pub fn list(&self) -> Result<Vec<AuthenticatedUser>> {
        let entries = match std::fs::read_dir(&self.users_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(EchoError::Storage(format!("cannot list users dir: {e}")));
            }
        };

        let mut users = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| EchoError::Storage(format!("cannot read entry: {e}")))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()))
            {
                Ok(user) => users.push(user),
                Err(e) => warn!("skipping unreadable user file {}: {e}", path.display()),
            }
        }
        Ok(users)
    }

    /// Delete a user record. Returns `true` when a file was removed.
    ///
    /// # Errors
    ///
    /// Returns an error on deletion failures other than not-found.
    pub fn delete(&self, telegram_id: i64) -> Result<bool> {
        match std::fs::remove_file(self.user_path(telegram_id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(EchoError::Storage(format!("cannot delete user file: {e}"))),
        }
    }

    /// The directory user records are written to.
    #[must_use]
    pub fn users_dir(&self) -> &Path {
        &self.users_dir
    }

    fn user_path(&self, telegram_id: i64) -> PathBuf {
        self.users_dir.join(format!("{telegram_id}.json"))
    }
}
