//! GitHub REST API access.
//!
//! This module provides the HTTP client for the repository listing and
//! clone-traffic endpoints, and the page-walking helper they share.

pub mod client;
pub mod pagination;

pub use client::{ApiConfig, FetchError, GithubClient, TrafficSource};
