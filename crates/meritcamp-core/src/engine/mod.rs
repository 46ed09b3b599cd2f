//! In-process registration engine.
//!
//! `Registry` owns every entity of the registration system and enforces the
//! rules the REST API documents: role-based authorization, class-size and
//! purchaser limits, registration windows and completion reconciliation.
//! Operations are grouped by resource in the submodules.
//!
//! State lives in memory behind a `tokio::sync::RwLock` and can be persisted
//! to a JSON snapshot with [`Registry::persist`].

mod accounts;
mod catalog;
mod enrollment;
mod events;
mod purchases;
mod reports;
mod scouts;
mod state;

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::auth::password::{generate_token, hash_password};
use crate::config::RegistryConfig;
use crate::error::{Error, Result};
use crate::models::{NewUser, Profile, Role, User};
use crate::rules::Caller;
use crate::store::SnapshotStore;

use state::State;

/// Snapshot name inside the data directory
const SNAPSHOT_NAME: &str = "registry";

#[derive(Debug, Clone)]
struct SessionEntry {
    user_id: i64,
    created_at: DateTime<Utc>,
}

pub struct Registry {
    state: RwLock<State>,
    sessions: RwLock<HashMap<String, SessionEntry>>,
    config: RegistryConfig,
    store: Option<SnapshotStore>,
    last_saved: RwLock<Option<DateTime<Utc>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl Registry {
    /// Create an empty, memory-only registry
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            state: RwLock::new(State::default()),
            sessions: RwLock::new(HashMap::new()),
            config,
            store: None,
            last_saved: RwLock::new(None),
        }
    }

    /// Open a registry backed by a snapshot in `dir`, loading it if present
    pub fn open(dir: impl AsRef<Path>, config: RegistryConfig) -> anyhow::Result<Self> {
        let store = SnapshotStore::new(dir.as_ref())?;
        let (state, saved_at) = match store.load::<State>(SNAPSHOT_NAME)? {
            Some(snapshot) => {
                info!(
                    dir = %store.dir().display(),
                    age = %snapshot.age_display(),
                    "Loaded registry snapshot"
                );
                (snapshot.data, Some(snapshot.saved_at))
            }
            None => (State::default(), None),
        };

        Ok(Self {
            state: RwLock::new(state),
            sessions: RwLock::new(HashMap::new()),
            config,
            store: Some(store),
            last_saved: RwLock::new(saved_at),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Write the current state to the snapshot directory. A memory-only
    /// registry has nowhere to write and reports an error.
    pub async fn persist(&self) -> anyhow::Result<()> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Registry has no data directory"))?;
        let state = self.state.read().await;
        let saved_at = store.save(SNAPSHOT_NAME, &*state)?;
        *self.last_saved.write().await = Some(saved_at);
        Ok(())
    }

    /// Age of the last snapshot written or loaded, e.g. "5m ago"
    pub async fn snapshot_age(&self) -> Option<String> {
        let saved_at = (*self.last_saved.read().await)?;
        let snapshot = crate::store::Snapshot {
            data: (),
            saved_at,
        };
        Some(snapshot.age_display())
    }

    /// Insert a user directly, bypassing signup validation. Any role may be
    /// seeded, including admin.
    pub async fn seed_user(&self, user: NewUser) -> Result<Profile> {
        let email = normalize_email(&user.email)?;
        let password_hash = hash_password(&user.password)?;

        let mut state = self.state.write().await;
        if state.email_taken(&email, None) {
            return Err(Error::BadRequest(format!("email already in use: {}", email)));
        }
        let id = state.next_id();
        let record = User {
            id,
            email,
            password_hash,
            firstname: user.firstname,
            lastname: user.lastname,
            role: user.role,
            details: user.details,
            created_at: Utc::now(),
        };
        let profile = record.profile();
        state.users.insert(id, record);
        debug!(user_id = id, role = %profile.role, "Seeded user");
        Ok(profile)
    }

    /// Mint a session token for an existing user. Expired sessions are
    /// dropped at the same time.
    pub async fn issue_token(&self, user_id: i64) -> Result<String> {
        if !self.state.read().await.users.contains_key(&user_id) {
            return Err(Error::NotFound(format!("user {}", user_id)));
        }
        let now = Utc::now();
        let token = generate_token();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        if sessions.len() < before {
            debug!(pruned = before - sessions.len(), "Dropped expired sessions");
        }
        sessions.insert(
            token.clone(),
            SessionEntry {
                user_id,
                created_at: now,
            },
        );
        Ok(token)
    }

    fn is_expired(&self, entry: &SessionEntry, now: DateTime<Utc>) -> bool {
        now >= entry.created_at + Duration::minutes(self.config.session_expiry_minutes)
    }

    /// Drop a session token. Unknown tokens are ignored.
    pub async fn revoke_token(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Profiles holding a role, ordered by id
    pub async fn users_with_role(&self, role: Role) -> Vec<Profile> {
        let state = self.state.read().await;
        state
            .users
            .values()
            .filter(|u| u.role == role)
            .map(User::profile)
            .collect()
    }

    /// Resolve a bearer token to the calling user
    async fn caller(&self, token: Option<&str>) -> Result<Caller> {
        let token = token.ok_or_else(|| Error::unauthorized("authentication required"))?;
        let user_id = {
            let sessions = self.sessions.read().await;
            let entry = sessions
                .get(token)
                .ok_or_else(|| Error::unauthorized("invalid session token"))?;
            if self.is_expired(entry, Utc::now()) {
                return Err(Error::unauthorized("session expired"));
            }
            entry.user_id
        };

        let state = self.state.read().await;
        let user = state
            .users
            .get(&user_id)
            .ok_or_else(|| Error::unauthorized("account no longer exists"))?;
        Ok(Caller {
            user_id,
            role: user.role,
        })
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Trim a required text field, rejecting blanks
pub(crate) fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::BadRequest(format!("{} is required", field)))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Lowercase and sanity-check an email address
pub(crate) fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_ascii_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(Error::BadRequest(format!("invalid email: {}", email)))
    }
}
