//! Trigger event payload handling and pull request location

use crate::error::{Error, Result};
use crate::http::GitHubApiClient;
use crate::types::PullRequest;
use serde::Deserialize;

/// The structured event document a CI runner hands to the process.
///
/// Only the fields this tool reads are modeled; everything else in the
/// payload is ignored. All fields are optional because the payload shape
/// depends on the event type (pull request event vs. push event).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriggerEvent {
    /// Present on pull request events
    #[serde(default)]
    pub pull_request: Option<EventPullRequest>,
    /// Present on push events
    #[serde(default)]
    pub head_commit: Option<EventCommit>,
    /// Commit list on push events; may be empty
    #[serde(default)]
    pub commits: Vec<EventCommit>,
}

/// `pull_request` fragment of an event payload
#[derive(Debug, Clone, Deserialize)]
pub struct EventPullRequest {
    /// PR number
    pub number: u64,
}

/// Commit fragment of an event payload
#[derive(Debug, Clone, Deserialize)]
pub struct EventCommit {
    /// Commit SHA
    pub id: String,
}

/// How the triggering pull request can be found from an event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey<'a> {
    /// The payload names the PR directly
    PullRequestNumber(u64),
    /// The payload only names a commit; look up its associated pulls
    CommitSha(&'a str),
}

impl TriggerEvent {
    /// Parse an event payload from raw JSON
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| Error::EventParse(format!("Invalid event payload: {}", e)))
    }

    /// Extract the PR search key, in payload precedence order:
    /// `pull_request.number`, then `head_commit.id`, then the first entry
    /// of `commits`. `None` means there is nothing to locate.
    pub fn search_key(&self) -> Option<SearchKey<'_>> {
        if let Some(pr) = &self.pull_request {
            return Some(SearchKey::PullRequestNumber(pr.number));
        }

        if let Some(head) = &self.head_commit {
            return Some(SearchKey::CommitSha(&head.id));
        }

        self.commits
            .first()
            .map(|commit| SearchKey::CommitSha(&commit.id))
    }
}

/// Read the event document from the path the runner supplies.
///
/// An absent path yields `Ok(None)` ("no event data", not an error); an
/// unreadable file or malformed JSON is a hard failure.
pub fn load_event(path: Option<&str>) -> Result<Option<TriggerEvent>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let raw = std::fs::read_to_string(path)?;
    Ok(Some(TriggerEvent::from_json(&raw)?))
}

/// Resolve the concrete pull request a run is about.
///
/// Commit-keyed events query the commit's associated pulls and take the
/// first result; an empty association list signals "nothing to do" and
/// returns `Ok(None)` rather than an error.
pub async fn locate_pull_request(
    client: &GitHubApiClient,
    owner: &str,
    repo: &str,
    event: Option<&TriggerEvent>,
) -> Result<Option<PullRequest>> {
    let Some(event) = event else {
        return Ok(None);
    };

    let number = match event.search_key() {
        None => return Ok(None),
        Some(SearchKey::PullRequestNumber(number)) => number,
        Some(SearchKey::CommitSha(sha)) => {
            let pulls = client.list_commit_pulls(owner, repo, sha).await?;
            match pulls.first() {
                // First associated PR wins when a commit belongs to several
                // (cherry-picks and the like).
                Some(&number) => number,
                None => return Ok(None),
            }
        }
    };

    let pr = client.get_pull(owner, repo, number).await?;
    Ok(Some(pr))
}
