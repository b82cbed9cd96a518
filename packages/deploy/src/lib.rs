//! Sitewright Deploy - Deployment bridge to the external hosting endpoint
//!
//! Stateless request/response only: ship the current file set, surface the
//! returned URL or error directly. No retries, and nothing here touches
//! sandbox state.

pub mod client;

pub use client::{
    DeployClient, DeployError, DeployRequest, DeployResponse, DeployResult, LoadedProject,
    ProjectResponse,
};

/// Version information for the deploy crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
