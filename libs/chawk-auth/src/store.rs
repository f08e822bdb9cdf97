//! On-disk token cache.
//!
//! Layout: `{"access_token", "token_type", "expires_in", "expiry"}` with
//! `expiry` in RFC 3339. The parent directory is created on first save.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::TokenError;
use crate::secret::SecretString;

/// A token together with the instant it stops being valid.
#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub access_token: SecretString,
    pub token_type: String,
    pub expires_in: u64,
    pub expiry: OffsetDateTime,
}

impl IssuedToken {
    /// True once `now + skew` has reached the expiry.
    pub fn is_expired(&self, now: OffsetDateTime, skew: std::time::Duration) -> bool {
        if self.access_token.is_empty() {
            return true;
        }
        let skew = time::Duration::try_from(skew).unwrap_or(time::Duration::MAX);
        now.saturating_add(skew) >= self.expiry
    }
}

#[derive(Serialize, Deserialize)]
struct StoredToken {
    access_token: String,
    token_type: String,
    #[serde(default)]
    expires_in: u64,
    #[serde(with = "time::serde::rfc3339")]
    expiry: OffsetDateTime,
}

pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when there is no file yet.
    pub async fn load(&self) -> Result<Option<IssuedToken>, TokenError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(TokenError::Cache(format!(
                    "read {}: {e}",
                    self.path.display()
                )));
            }
        };
        let stored: StoredToken = serde_json::from_slice(&raw)
            .map_err(|e| TokenError::Cache(format!("parse {}: {e}", self.path.display())))?;
        Ok(Some(IssuedToken {
            access_token: SecretString::new(stored.access_token),
            token_type: stored.token_type,
            expires_in: stored.expires_in,
            expiry: stored.expiry,
        }))
    }

    /// Write the token, owner-only permissions on unix.
    pub async fn save(&self, token: &IssuedToken) -> Result<(), TokenError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            create_private_dir(dir)
                .await
                .map_err(|e| TokenError::Cache(format!("create {}: {e}", dir.display())))?;
        }

        let stored = StoredToken {
            access_token: token.access_token.expose().to_owned(),
            token_type: token.token_type.clone(),
            expires_in: token.expires_in,
            expiry: token.expiry,
        };
        let body = zeroize::Zeroizing::new(
            serde_json::to_vec_pretty(&stored)
                .map_err(|e| TokenError::Cache(format!("encode token: {e}")))?,
        );
        drop(zeroize::Zeroizing::new(stored.access_token));

        write_private_file(&self.path, &body)
            .await
            .map_err(|e| TokenError::Cache(format!("write {}: {e}", self.path.display())))
    }

    /// Remove the cached token. A missing file is not an error.
    pub async fn clear(&self) -> Result<(), TokenError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TokenError::Cache(format!(
                "remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(unix)]
async fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true).mode(0o700);
    builder.create(dir).await
}

#[cfg(not(unix))]
async fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await
}

#[cfg(unix)]
async fn write_private_file(path: &Path, body: &[u8]) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .await?;
    file.write_all(body).await?;
    file.flush().await
}

#[cfg(not(unix))]
async fn write_private_file(path: &Path, body: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(path, body).await
}
