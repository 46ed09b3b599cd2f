//! Saved logins.
//!
//! Every server gets its own entry in `sessions.json` in the cache
//! directory, so switching `MERITCAMP_API_URL` between servers does not
//! throw away the other logins. Expired entries are pruned on save.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Profile;

const SESSIONS_FILE: &str = "sessions.json";

/// Token lifetime in minutes, matching the engine default.
pub const TOKEN_EXPIRY_MINUTES: i64 = 720;

/// Sessions this close to expiry should be replaced by a fresh login
const RENEW_WITHIN_MINUTES: i64 = 15;

/// A logged-in session as seen by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub profile: Profile,
    pub api_url: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(token: String, profile: Profile, api_url: String) -> Self {
        Self {
            token,
            profile,
            api_url,
            expires_at: Utc::now() + Duration::minutes(TOKEN_EXPIRY_MINUTES),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn expires_soon(&self) -> bool {
        Utc::now() + Duration::minutes(RENEW_WITHIN_MINUTES) >= self.expires_at
    }

    pub fn minutes_until_expiry(&self) -> i64 {
        (self.expires_at - Utc::now()).num_minutes().max(0)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    sessions: BTreeMap<String, SessionData>,
}

/// The saved login for one server.
pub struct Session {
    path: PathBuf,
    api_url: String,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(cache_dir: PathBuf, api_url: &str) -> Self {
        Self {
            path: cache_dir.join(SESSIONS_FILE),
            api_url: api_url.to_string(),
            data: None,
        }
    }

    fn read_file(&self) -> Result<SessionFile> {
        if !self.path.exists() {
            return Ok(SessionFile::default());
        }
        let contents = std::fs::read_to_string(&self.path).context("Failed to read sessions file")?;
        serde_json::from_str(&contents).context("Failed to parse sessions file")
    }

    fn write_file(&self, file: &SessionFile) -> Result<()> {
        if file.sessions.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(file)?)?;
        Ok(())
    }

    /// Load this server's session. Returns false when there is none or it
    /// has expired.
    pub fn load(&mut self) -> Result<bool> {
        let mut file = self.read_file()?;
        match file.sessions.remove(&self.api_url) {
            Some(data) if !data.is_expired() => {
                self.data = Some(data);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Write this server's session, keeping the other servers' entries.
    /// An unreadable file is replaced.
    pub fn save(&self) -> Result<()> {
        let mut file = self.read_file().unwrap_or_else(|e| {
            debug!(error = %e, "Replacing unreadable sessions file");
            SessionFile::default()
        });
        file.sessions.retain(|_, data| !data.is_expired());
        if let Some(ref data) = self.data {
            file.sessions.insert(self.api_url.clone(), data.clone());
        }
        self.write_file(&file)
    }

    /// Drop this server's session from memory and disk
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let mut file = self.read_file().unwrap_or_default();
        if file.sessions.remove(&self.api_url).is_some() {
            self.write_file(&file)?;
        }
        Ok(())
    }

    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    pub fn is_valid(&self) -> bool {
        self.data.as_ref().is_some_and(|d| !d.is_expired())
    }
}
