//! Authentication: password hashing, session tokens and credential storage.
//!
//! This module provides:
//! - `password`: argon2 hashing and bearer token generation used by the engine
//! - `Session`: client-side session persistence with expiry
//! - `CredentialStore`: remembered passwords in the OS keychain, per server

pub mod credentials;
pub mod password;
pub mod session;

pub use credentials::CredentialStore;
pub use password::{generate_token, hash_password, verify_password};
pub use session::{Session, SessionData};
