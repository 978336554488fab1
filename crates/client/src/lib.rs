//! HTTP client for the partflow upload coordination service.
//!
//! [`ApiClient`] implements [`partflow_upload::CoordinationService`] over
//! the service's REST API and additionally exposes the uploaded-file
//! listing for UI collaborators.

mod client;
mod config;

pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
