//! pangolin-api: HTTP client for the Pangolin setup daemon
//!
//! The daemon owns the actual deployment machinery; this crate only speaks
//! its small JSON API: environment info, autodetected defaults, connection
//! probes, config persistence, and the deploy trigger.

pub mod client;
pub mod error;

pub use client::{EnvResponse, SetupClient, StatusResponse, TestConnectionRequest};
pub use error::SetupApiError;
