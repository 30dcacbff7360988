//! Operations modules for interacting with external systems.
//!
//! This module contains the integration layers for the two systems the
//! actions coordinate:
//!
//! - [`git`]: Working-directory Git operations (clone, branch sync, staging, committing, pushing)
//! - [`azure`]: Pull request management against the Azure DevOps REST API
//! - [`azure_http`]: Curl-based HTTP client for making Azure DevOps API requests
//!
//! Each submodule provides trait-based abstractions with real and mock implementations
//! to support both production use and testing.

pub mod azure;
pub mod azure_http;
pub mod git;
