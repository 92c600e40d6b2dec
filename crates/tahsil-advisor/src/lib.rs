//! tahsil-advisor: remote collaborators and configuration.
//!
//! Implements the `Advisor` trait against the tahsil web service
//! (school suggestions and grade analysis) and loads the `tahsil.toml`
//! configuration shared by the CLI.

pub mod backend;
pub mod config;
pub mod error;
pub mod mock;

pub use backend::BackendAdvisor;
pub use config::{create_advisor, load_config, load_config_from, BackendConfig, TahsilConfig};
pub use error::AdvisorError;
