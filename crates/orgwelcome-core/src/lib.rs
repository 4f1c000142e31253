//! # orgwelcome core
//!
//! Post-release contributor invitations for GitHub organizations.
//!
//! Runs as a hook after a package/version is published: locates the pull
//! request the release came from, enumerates its contributors (including
//! `Co-authored-by:` trailers), filters bots and excluded accounts, and
//! invites the rest to an organization and optional team. Invitations are
//! idempotent: the platform's duplicate signal is treated as success.
//!
//! ## Example
//!
//! ```no_run
//! use orgwelcome_core::{invite_contributors, InviteConfig};
//!
//! # async fn example() -> orgwelcome_core::Result<()> {
//! let config = InviteConfig {
//!     token: Some("ghp_example".into()),
//!     repository: Some("acme/widgets".into()),
//!     event_path: Some("/tmp/event.json".into()),
//!     organization: Some("acme".into()),
//!     dry_run: true,
//!     ..Default::default()
//! };
//!
//! let summary = invite_contributors(&config).await?;
//! println!("Would invite: {}", summary.would_invite.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod contributors;
pub mod error;
pub mod event;
pub mod http;
pub mod processor;
pub mod trailers;
pub mod types;

pub use error::{Error, ErrorKind, Result};
pub use event::TriggerEvent;
pub use http::GitHubApiClient;
pub use processor::InviteProcessor;
pub use types::{
    CommitRecord, InviteConfig, InviteOutcome, InviteRole, Organization, PullRequest, RemoteUser,
    RepositoryInfo, RunSummary, Team, KNOWN_BOT_EXCLUSIONS,
};

/// Split an `owner/repo` identifier into its two parts
pub fn split_repository(repository: &str) -> Result<(&str, &str)> {
    let parts: Vec<&str> = repository.split('/').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(Error::Config(format!(
            "Invalid repository identifier (expected owner/repo): {}",
            repository
        )));
    }

    Ok((parts[0], parts[1]))
}

/// Run one invitation pass.
///
/// This is the main entry point for the library. It validates the identity
/// configuration, reads the trigger event (if any), and drives the
/// processor: locate PR, resolve contributors, filter, resolve
/// organization/team, invite. Returns a [`RunSummary`]; a run with nothing
/// to do is `Ok` with an empty summary.
pub async fn invite_contributors(config: &InviteConfig<'_>) -> Result<RunSummary> {
    let token = config
        .token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::Config("GITHUB_TOKEN is required".to_string()))?;

    let repository = config
        .repository
        .as_deref()
        .filter(|r| !r.is_empty())
        .ok_or_else(|| Error::Config("GITHUB_REPOSITORY is required".to_string()))?;

    let (owner, repo) = split_repository(repository)?;

    let client = match config.api_base_url.as_deref() {
        Some(base_url) => GitHubApiClient::new(base_url.to_string(), token.to_string()),
        None => GitHubApiClient::from_env(token.to_string()),
    };

    let event = event::load_event(config.event_path.as_deref())?;

    let processor = InviteProcessor::new(&client, config, owner, repo);
    processor.process(event.as_ref()).await
}

/// Synchronous variant of [`invite_contributors`].
///
/// Creates a new Tokio runtime and blocks on the async version. Prefer the
/// async version if you're already in an async context.
pub fn invite_contributors_sync(config: &InviteConfig<'_>) -> Result<RunSummary> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Runtime(e.to_string()))?
        .block_on(invite_contributors(config))
}
