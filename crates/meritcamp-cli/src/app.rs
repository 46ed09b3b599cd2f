//! Application state for the command-line tool.
//!
//! `App` ties together the stored configuration, the saved session and the
//! backend commands run against: a remote server through `ApiClient`, or a
//! snapshot directory opened as a local `Registry`.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use meritcamp_core::auth::{CredentialStore, Session, SessionData};
use meritcamp_core::models::{Credentials, Event, Role};
use meritcamp_core::{ApiClient, Backend, Config, LocalClient, Registry, RegistryConfig};

pub enum Mode {
    Remote(ApiClient),
    Local(LocalClient),
}

pub struct App {
    pub config: Config,
    pub session: Session,
    mode: Mode,
}

impl App {
    /// Talk to the configured server, reusing a saved session when one is valid
    pub fn remote() -> Result<Self> {
        let config = Config::load().context("Failed to load config")?;
        let mut client = ApiClient::new(&config.api_url())?;
        let mut session = Session::new(config.cache_dir()?, client.base_url());
        match session.load() {
            Ok(true) => client.set_token(session.token().map(str::to_string)),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable sessions file"),
        }
        Ok(Self {
            config,
            session,
            mode: Mode::Remote(client),
        })
    }

    /// Open the snapshot in `dir`
    pub fn local(dir: &Path) -> Result<Self> {
        let config = Config::load().context("Failed to load config")?;
        let session = Session::new(config.cache_dir()?, &dir.display().to_string());
        let registry = Registry::open(dir, RegistryConfig::default())
            .with_context(|| format!("Failed to open registry at {}", dir.display()))?;
        Ok(Self {
            config,
            session,
            mode: Mode::Local(LocalClient::new(Arc::new(registry))),
        })
    }

    /// Snapshot directory from the environment or config file
    pub fn default_data_dir() -> Result<PathBuf> {
        Config::load()?.data_dir()
    }

    pub fn backend(&self) -> &dyn Backend {
        match self.mode {
            Mode::Remote(ref client) => client,
            Mode::Local(ref client) => client,
        }
    }

    pub fn registry(&self) -> Option<&Arc<Registry>> {
        match self.mode {
            Mode::Remote(_) => None,
            Mode::Local(ref client) => Some(client.registry()),
        }
    }

    /// Make sure commands run with a session.
    ///
    /// Local snapshots act as their first admin. Remote commands need a
    /// saved login.
    pub async fn ensure_authenticated(&mut self) -> Result<()> {
        match self.mode {
            Mode::Local(ref mut client) => {
                let registry = Arc::clone(client.registry());
                let admin = registry
                    .users_with_role(Role::Admin)
                    .await
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        anyhow::anyhow!("Snapshot has no admin user. Run `meritcamp --local <dir> seed` first.")
                    })?;
                let token = registry.issue_token(admin.id).await?;
                client.set_token(Some(token));
                Ok(())
            }
            Mode::Remote(ref client) => match self.session.data {
                Some(ref data) if client.token().is_some() && !data.is_expired() => {
                    if data.expires_soon() {
                        warn!(minutes = data.minutes_until_expiry(), "Session expires soon");
                        eprintln!("Session expires soon; run `meritcamp login` to renew it.");
                    }
                    Ok(())
                }
                _ => bail!("Not logged in. Run `meritcamp login` first."),
            },
        }
    }

    /// Prompt for credentials and log in to the configured server
    pub async fn login_interactive(&mut self) -> Result<()> {
        let Mode::Remote(ref mut client) = self.mode else {
            bail!("login is only available against a server");
        };
        println!("\n=== meritcamp login ({}) ===\n", client.base_url());

        let email = match self.config.last_email {
            Some(ref last) => {
                let input = prompt(&format!("Email [{}]: ", last))?;
                if input.is_empty() {
                    last.clone()
                } else {
                    input
                }
            }
            None => prompt("Email: ")?,
        };

        let keychain = CredentialStore::new(client.base_url());
        let stored = keychain.get_password(&email).ok();
        let password = match stored {
            Some(password) if prompt("Use stored password? [Y/n]: ")?.to_lowercase() != "n" => {
                password
            }
            _ => rpassword::prompt_password("Password: ")?,
        };

        println!("\nAuthenticating...");
        let auth = client
            .authenticate(&Credentials {
                email: email.clone(),
                password: password.clone(),
            })
            .await?;

        if let Err(e) = keychain.store(&email, &password) {
            warn!(error = %e, "Failed to store credentials");
        }
        self.config.last_email = Some(email);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        self.session.update(SessionData::new(
            auth.token,
            auth.profile.clone(),
            client.base_url().to_string(),
        ));
        self.session.save()?;
        info!(user_id = auth.profile.id, "Logged in");
        println!("Logged in as {} ({})", auth.profile.full_name(), auth.profile.role);
        Ok(())
    }

    /// Forget the session and the stored password
    pub fn logout(&mut self) -> Result<()> {
        if let Some(data) = self.session.data.as_ref() {
            let keychain = CredentialStore::new(&data.api_url);
            if let Err(e) = keychain.delete(&data.profile.email) {
                warn!(error = %e, "Failed to delete stored credentials");
            }
        }
        self.session.clear()?;
        if let Mode::Remote(ref mut client) = self.mode {
            client.set_token(None);
        }
        Ok(())
    }

    /// The event named on the command line: an id, or the current event
    pub async fn resolve_event(&self, arg: Option<&str>) -> Result<Event> {
        match arg {
            None | Some("current") => Ok(self.backend().current_event().await?),
            Some(id) => {
                let id: i64 = id
                    .parse()
                    .with_context(|| format!("Invalid event id: {}", id))?;
                Ok(self.backend().get_event(id).await?)
            }
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
