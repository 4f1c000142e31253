//! HTTP client for the GitHub API

pub mod client;

pub use client::{classify_invite_response, GitHubApiClient};
