//! Remembered login passwords.
//!
//! A coordinator who logs in from the CLI can keep their password in the
//! OS keychain. Entries are keyed by server and email, so the same address
//! registered on a local test server and on the camp's live server keeps
//! two passwords.

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "meritcamp";

/// Keychain access for one server's accounts
pub struct CredentialStore {
    server: String,
}

impl CredentialStore {
    pub fn new(server: &str) -> Self {
        Self {
            server: server.to_string(),
        }
    }

    fn entry(&self, email: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, &account_key(&self.server, email))
            .with_context(|| format!("No keychain entry available for {}", email))
    }

    pub fn store(&self, email: &str, password: &str) -> Result<()> {
        self.entry(email)?
            .set_password(password)
            .context("Failed to save login password")
    }

    /// The remembered password, if this email has logged in to this server
    pub fn get_password(&self, email: &str) -> Result<String> {
        self.entry(email)?
            .get_password()
            .context("No remembered password")
    }

    pub fn delete(&self, email: &str) -> Result<()> {
        self.entry(email)?
            .delete_credential()
            .context("Failed to forget login password")
    }
}

/// Keychain account name. Emails are case-insensitive logins and a trailing
/// slash does not change the server.
fn account_key(server: &str, email: &str) -> String {
    format!(
        "{}|{}",
        server.trim_end_matches('/'),
        email.trim().to_ascii_lowercase()
    )
}
