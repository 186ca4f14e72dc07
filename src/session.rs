// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session store: the single place holding the admin's tokens and profile.
//!
//! Flows receive the store as an `Arc<dyn SessionStore>` so tests can swap in
//! an in-memory store. Writes are last-write-wins; there is no expiry or
//! validation of what is stored.

use crate::error::{ClientError, Result};
use crate::models::{Profile, Session, SessionTokens};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

/// Persisted holder of the admin session.
pub trait SessionStore: Send + Sync {
    /// Current session, or `None` if nothing has been stored.
    fn get(&self) -> Result<Option<Session>>;

    /// Store tokens and profile. Empty or absent values keep the previous ones.
    fn set(&self, tokens: SessionTokens, profile: Option<Profile>) -> Result<()>;

    /// Forget everything.
    fn clear(&self) -> Result<()>;

    /// Last-written access token.
    fn access_token(&self) -> Result<Option<String>> {
        Ok(self.get()?.and_then(|s| s.access_token))
    }
}

/// Merge a login result into an existing session.
fn apply(session: &mut Session, tokens: SessionTokens, profile: Option<Profile>) {
    if !tokens.access_token.is_empty() {
        session.access_token = Some(tokens.access_token);
    }
    if let Some(refresh) = tokens.refresh_token.filter(|t| !t.is_empty()) {
        session.refresh_token = Some(refresh);
    }
    if let Some(profile) = profile {
        session.profile = Some(profile);
    }
    session.saved_at = Some(Utc::now());
}

// ─── In-memory store ─────────────────────────────────────────

/// Process-lifetime store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<Session>> {
        let session = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok((!session.is_empty()).then(|| session.clone()))
    }

    fn set(&self, tokens: SessionTokens, profile: Option<Profile>) -> Result<()> {
        let mut session = self.inner.write().unwrap_or_else(|e| e.into_inner());
        apply(&mut session, tokens, profile);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut session = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *session = Session::default();
        Ok(())
    }
}

// ─── File-backed store ───────────────────────────────────────

/// On-disk layout, using the same keys the browser build kept in local storage.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    /// Profile as a JSON string, not a nested object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
}

impl StoredSession {
    fn into_session(self) -> Result<Session> {
        let profile = match self.user_profile {
            Some(raw) => Some(
                serde_json::from_str(&raw)
                    .map_err(|e| ClientError::Session(format!("corrupt userProfile: {}", e)))?,
            ),
            None => None,
        };

        Ok(Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            profile,
            saved_at: self.saved_at,
        })
    }

    fn from_session(session: &Session) -> Result<Self> {
        let user_profile = match &session.profile {
            Some(p) => Some(
                serde_json::to_string(p).map_err(|e| ClientError::Session(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            user_profile,
            saved_at: session.saved_at,
        })
    }
}

/// Store persisted as a JSON file, surviving process restarts.
///
/// File I/O is synchronous `std::fs` on the calling task: every `get`/`set`
/// briefly blocks the runtime thread it runs on.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn parse(&self, raw: &str) -> Result<Option<Session>> {
        let stored: StoredSession = serde_json::from_str(raw).map_err(|e| {
            ClientError::Session(format!("corrupt session file {}: {}", self.path.display(), e))
        })?;

        let session = stored.into_session()?;
        Ok((!session.is_empty()).then_some(session))
    }

    fn read(&self) -> Result<Option<Session>> {
        match self.read_raw()? {
            Some(raw) => self.parse(&raw),
            None => Ok(None),
        }
    }

    fn write(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(&StoredSession::from_session(session)?)
            .map_err(|e| ClientError::Session(e.to_string()))?;

        // Write-then-rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("json.tmp");
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&tmp)?;
        // A stale temp file keeps its old mode, so set it explicitly too
        #[cfg(unix)]
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        file.write_all(&json)?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<Session>> {
        self.read()
    }

    fn set(&self, tokens: SessionTokens, profile: Option<Profile>) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        // Re-login must be able to replace a corrupt or half-written file
        let mut session = match self.read_raw()? {
            Some(raw) => match self.parse(&raw) {
                Ok(existing) => existing.unwrap_or_default(),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Discarding unreadable session file"
                    );
                    Session::default()
                }
            },
            None => Session::default(),
        };
        apply(&mut session, tokens, profile);
        self.write(&session)?;
        tracing::debug!(path = %self.path.display(), "Session written");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
