//! REST API client module for a merit badge registration server.
//!
//! This module provides the `ApiClient` for talking to a server over HTTP.
//! Requests authenticate with the bearer token returned by signup or
//! authentication. Every endpoint is exposed through the
//! [`Backend`](crate::backend::Backend) trait.

pub mod client;
mod endpoints;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
