//! Placeholder wallet keypair generation and persistence.
//!
//! Generates demo keypair material only: 32 random bytes as the private
//! key, with the public key derived by hashing. Real custodial key
//! management is explicitly out of scope.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{EchoError, Result};

/// A generated wallet. Both keys are hex-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    /// Hex-encoded public key.
    pub public_key: String,
    /// Hex-encoded private key. Persisted but never returned over the API.
    pub private_key: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Creates wallets and persists them as flat JSON files.
pub struct WalletService {
    wallets_dir: PathBuf,
}

impl WalletService {
    /// Create a wallet service rooted at the given directory.
    pub fn new(wallets_dir: impl Into<PathBuf>) -> Self {
        Self {
            wallets_dir: wallets_dir.into(),
        }
    }

    /// Generate a new placeholder wallet.
    #[must_use]
    pub fn create_wallet(&self) -> Wallet {
        let secret: [u8; 32] = rand::random();
        let public = Sha256::digest(secret);

        Wallet {
            public_key: hex::encode(public),
            private_key: hex::encode(secret),
            created_at: Utc::now(),
        }
    }

    /// Persist a wallet to `{wallets_dir}/{user_id}.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save_wallet_to_file(&self, wallet: &Wallet, user_id: i64) -> Result<()> {
        std::fs::create_dir_all(&self.wallets_dir)
            .map_err(|e| EchoError::Wallet(format!("cannot create wallet dir: {e}")))?;

        let json = serde_json::to_string_pretty(wallet)
            .map_err(|e| EchoError::Wallet(format!("cannot serialize wallet: {e}")))?;

        let path = self.wallet_path(user_id);
        std::fs::write(&path, json)
            .map_err(|e| EchoError::Wallet(format!("cannot write wallet file: {e}")))?;

        Ok(())
    }

    /// Path to a persisted wallet file.
    #[must_use]
    pub fn wallet_path(&self, user_id: i64) -> PathBuf {
        self.wallets_dir.join(format!("{user_id}.json"))
    }

    /// The directory wallets are written to.
    #[must_use]
    pub fn wallets_dir(&self) -> &Path {
        &self.wallets_dir
    }
}
