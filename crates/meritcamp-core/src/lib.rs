//! Core library for meritcamp, a merit badge event registration system.
//!
//! - [`engine::Registry`]: the in-process registration engine
//! - [`api::ApiClient`]: typed client for a registration server
//! - [`backend::Backend`]: the operations both of them provide
//! - [`fixtures`]: builders for test and demo data

pub mod api;
pub mod auth;
pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod models;
pub mod rules;
pub mod store;
pub mod utils;

pub use api::{ApiClient, ApiError, ApiResult};
pub use backend::{Backend, LocalClient};
pub use config::{Config, RegistryConfig};
pub use engine::Registry;
pub use error::{Error, Result};
