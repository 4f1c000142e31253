//! GitHub REST API client for contributor and invitation operations

use crate::error::{Error, Result};
use crate::types::{
    CommitRecord, InviteOutcome, InviteRole, Organization, PullRequest, RemoteUser,
    RepositoryInfo, Team,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// GitHub API account object (users and organizations share the shape)
#[derive(Debug, Deserialize)]
struct ApiAccount {
    login: String,
    id: u64,
}

/// GitHub API repository object
#[derive(Debug, Deserialize)]
struct ApiRepository {
    full_name: String,
    organization: Option<ApiAccount>,
}

/// GitHub API pull request object
#[derive(Debug, Deserialize)]
struct ApiPullRequest {
    number: u64,
    user: ApiAccount,
}

/// Entry of the pull request commit listing
#[derive(Debug, Deserialize)]
struct ApiCommitEntry {
    sha: String,
    /// Linked GitHub account; null when the commit email matches no account
    author: Option<ApiAccount>,
    commit: ApiCommitDetail,
}

/// Git-level commit data nested in a commit entry
#[derive(Debug, Deserialize)]
struct ApiCommitDetail {
    message: String,
}

/// GitHub API team object
#[derive(Debug, Deserialize)]
struct ApiTeam {
    id: u64,
    slug: String,
}

/// Error body shape returned by the API on failures
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Classify an invitation response into an explicit outcome.
///
/// 2xx creates the invitation; 422 is the platform's duplicate/conflict
/// signal ("already a member or already invited") and counts as success.
/// Anything else is a failure carrying the remote message when the body
/// has one.
pub fn classify_invite_response(status: reqwest::StatusCode, body: &str) -> InviteOutcome {
    if status.is_success() {
        return InviteOutcome::Invited;
    }

    if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY {
        return InviteOutcome::AlreadySatisfied;
    }

    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| format!("GitHub API returned error: {}", status));

    InviteOutcome::Failed(message)
}

/// GitHub API client for the invitation pipeline.
///
/// Every method is a single blocking-style round trip; callers sequence
/// them, nothing fans out.
pub struct GitHubApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for GitHubApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubApiClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl GitHubApiClient {
    /// Create a new GitHub API client
    pub fn new(base_url: String, token: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("orgwelcome/0.1.0")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url,
            token,
        }
    }

    /// Create a client against `GITHUB_API_URL` (or api.github.com)
    pub fn from_env(token: String) -> Self {
        let base_url = std::env::var("GITHUB_API_URL")
            .unwrap_or_else(|_| "https://api.github.com".to_string());

        Self::new(base_url, token)
    }

    /// Fetch repository metadata (used for the owning-organization fallback)
    ///
    /// Endpoint: GET /repos/{owner}/{repo}
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<RepositoryInfo> {
        let url = format!("{}/repos/{}/{}", self.base_url, owner, repo);
        let repository: ApiRepository = self
            .get_json(&url, &format!("repository {}/{}", owner, repo))
            .await?;

        Ok(RepositoryInfo {
            full_name: repository.full_name,
            organization: repository.organization.map(|org| org.login),
        })
    }

    /// Fetch a pull request by number
    ///
    /// Endpoint: GET /repos/{owner}/{repo}/pulls/{number}
    pub async fn get_pull(&self, owner: &str, repo: &str, number: u64) -> Result<PullRequest> {
        let url = format!("{}/repos/{}/{}/pulls/{}", self.base_url, owner, repo, number);
        let pr: ApiPullRequest = self
            .get_json(&url, &format!("pull request #{}", number))
            .await?;

        Ok(PullRequest {
            number: pr.number,
            author_login: pr.user.login,
        })
    }

    /// List pull requests associated with a commit, first result first
    ///
    /// Endpoint: GET /repos/{owner}/{repo}/commits/{sha}/pulls
    pub async fn list_commit_pulls(&self, owner: &str, repo: &str, sha: &str) -> Result<Vec<u64>> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}/pulls",
            self.base_url, owner, repo, sha
        );
        let pulls: Vec<ApiPullRequest> = self
            .get_json(&url, &format!("pulls for commit {}", sha))
            .await?;

        Ok(pulls.into_iter().map(|pr| pr.number).collect())
    }

    /// Fetch the complete commit list of a pull request.
    ///
    /// Endpoint: GET /repos/{owner}/{repo}/pulls/{number}/commits
    /// Paginates via the Link header (GitHub returns max 100 per page) so
    /// the caller always sees the full sequence.
    pub async fn list_pull_commits(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<CommitRecord>> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/commits",
            self.base_url, owner, repo, number
        );

        let mut all_commits = Vec::new();
        let mut page = 1;

        loop {
            let request = self
                .client
                .get(&url)
                .query(&[("per_page", "100"), ("page", &page.to_string())])
                .header("Authorization", format!("Bearer {}", self.token));

            let response = request
                .send()
                .await
                .map_err(|e| Error::Http(format!("Failed to fetch PR commits: {}", e)))?;

            self.check_status(&response, &format!("commits of pull request #{}", number))?;

            let has_next = response
                .headers()
                .get("Link")
                .and_then(|v| v.to_str().ok())
                .map(|link| link.contains("rel=\"next\""))
                .unwrap_or(false);

            let commits: Vec<ApiCommitEntry> = response
                .json()
                .await
                .map_err(|e| Error::Http(format!("Failed to parse PR commits response: {}", e)))?;

            all_commits.extend(commits.into_iter().map(|entry| CommitRecord {
                sha: entry.sha,
                author_login: entry.author.map(|account| account.login),
                message: entry.commit.message,
            }));

            if !has_next {
                break;
            }

            page += 1;

            // Safety limit
            if page > 100 {
                return Err(Error::Http(
                    "Pull request has too many commits (>10000)".to_string(),
                ));
            }
        }

        Ok(all_commits)
    }

    /// Fetch an organization by login
    ///
    /// Endpoint: GET /orgs/{org}
    pub async fn get_organization(&self, login: &str) -> Result<Organization> {
        let url = format!("{}/orgs/{}", self.base_url, login);
        let org: ApiAccount = self
            .get_json(&url, &format!("organization '{}'", login))
            .await?;

        Ok(Organization {
            id: org.id,
            login: org.login,
        })
    }

    /// Fetch a team by slug within an organization
    ///
    /// Endpoint: GET /orgs/{org}/teams/{slug}
    pub async fn get_team_by_slug(&self, org: &str, slug: &str) -> Result<Team> {
        let url = format!("{}/orgs/{}/teams/{}", self.base_url, org, slug);
        let team: ApiTeam = self
            .get_json(&url, &format!("team '{}' in organization '{}'", slug, org))
            .await?;

        Ok(Team {
            id: team.id,
            slug: team.slug,
        })
    }

    /// Fetch a user by login
    ///
    /// Endpoint: GET /users/{login}
    pub async fn get_user(&self, login: &str) -> Result<RemoteUser> {
        let url = format!("{}/users/{}", self.base_url, login);
        let user: ApiAccount = self.get_json(&url, &format!("user '{}'", login)).await?;

        Ok(RemoteUser {
            id: user.id,
            login: user.login,
        })
    }

    /// Issue an organization invitation and classify the response.
    ///
    /// Endpoint: POST /orgs/{org}/invitations
    /// Transport failures are `Err`; everything the API answered with is an
    /// `InviteOutcome`, including the tolerated duplicate case.
    pub async fn invite_user(
        &self,
        organization: &Organization,
        user: &RemoteUser,
        role: InviteRole,
        team: Option<&Team>,
    ) -> Result<InviteOutcome> {
        let url = format!("{}/orgs/{}/invitations", self.base_url, organization.login);

        let mut body = serde_json::json!({
            "invitee_id": user.id,
            "role": role.as_str(),
        });
        if let Some(team) = team {
            body["team_ids"] = serde_json::json!([team.id]);
        }

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Failed to send invitation request: {}", e)))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        Ok(classify_invite_response(status, &body))
    }

    /// Authenticated GET returning deserialized JSON, with the shared
    /// status handling (rate limit, not-found, generic failure).
    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(|e| Error::Http(format!("Failed to fetch {}: {}", what, e)))?;

        self.check_status(&response, what)?;

        response
            .json()
            .await
            .map_err(|e| Error::Http(format!("Failed to parse response for {}: {}", what, e)))
    }

    /// Map non-success statuses to errors; 403 gets the rate-limit check.
    fn check_status(&self, response: &reqwest::Response, what: &str) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let ratelimit_remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok());

        Err(classify_fetch_error(status, ratelimit_remaining, what))
    }
}

/// Map a failed GET status to the right error.
///
/// A 403 is a rate limit only when the quota is actually exhausted
/// (`x-ratelimit-remaining: 0`); a permission 403 stays a plain HTTP
/// error. 404 means the named entity does not exist.
fn classify_fetch_error(
    status: reqwest::StatusCode,
    ratelimit_remaining: Option<&str>,
    what: &str,
) -> Error {
    if status == reqwest::StatusCode::FORBIDDEN && ratelimit_remaining == Some("0") {
        return Error::RateLimitExceeded(format!(
            "GitHub API rate limit exceeded fetching {}. Consider using a token with more quota.",
            what
        ));
    }

    if status == reqwest::StatusCode::NOT_FOUND {
        return Error::Lookup(format!("{} not found", what));
    }

    Error::Http(format!(
        "GitHub API returned error for {}: {}",
        what, status
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_client_creation() {
        let client = GitHubApiClient::new(
            "https://api.github.com".to_string(),
            "test_token".to_string(),
        );
        assert_eq!(client.base_url, "https://api.github.com");
        assert_eq!(client.token, "test_token");
    }

    #[test]
    fn test_client_debug_redacts_token() {
        let client = GitHubApiClient::new(
            "https://api.github.com".to_string(),
            "ghp_SuperSecret42".to_string(),
        );
        let debug_output = format!("{:?}", client);
        assert!(
            !debug_output.contains("ghp_SuperSecret42"),
            "Debug output must not contain the actual token: {}",
            debug_output
        );
        assert!(debug_output.contains("<redacted>"));
    }

    #[test]
    fn test_classify_created_is_invited() {
        let outcome = classify_invite_response(reqwest::StatusCode::CREATED, "{}");
        assert_eq!(outcome, InviteOutcome::Invited);
    }

    #[test]
    fn test_classify_conflict_is_already_satisfied() {
        // 422 is how the API reports "already invited or already a member".
        let body = r#"{"message": "Validation Failed", "errors": [{"code": "unprocessable"}]}"#;
        let outcome = classify_invite_response(reqwest::StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(outcome, InviteOutcome::AlreadySatisfied);
    }

    #[test]
    fn test_classify_failure_carries_remote_message() {
        let body = r#"{"message": "Must be an organization owner"}"#;
        let outcome = classify_invite_response(reqwest::StatusCode::FORBIDDEN, body);
        assert_eq!(
            outcome,
            InviteOutcome::Failed("Must be an organization owner".to_string())
        );
    }

    #[test]
    fn test_classify_failure_without_body_message() {
        let outcome = classify_invite_response(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "");
        match outcome {
            InviteOutcome::Failed(message) => assert!(message.contains("500")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_exhausted_quota_403_is_rate_limit() {
        let err = classify_fetch_error(
            reqwest::StatusCode::FORBIDDEN,
            Some("0"),
            "organization 'acme'",
        );
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    }

    #[test]
    fn test_permission_403_is_plain_http_error() {
        // A token-scope rejection also comes back as 403, but with quota
        // left; it must not be reported as a rate limit.
        let err = classify_fetch_error(
            reqwest::StatusCode::FORBIDDEN,
            Some("4999"),
            "organization 'acme'",
        );
        assert_eq!(err.kind(), ErrorKind::Http);

        let err = classify_fetch_error(reqwest::StatusCode::FORBIDDEN, None, "user 'alice'");
        assert_eq!(err.kind(), ErrorKind::Http);
    }

    #[test]
    fn test_not_found_is_lookup_error() {
        let err = classify_fetch_error(reqwest::StatusCode::NOT_FOUND, None, "team 'core'");
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(err.message(), "team 'core' not found");
    }

    #[test]
    fn test_other_statuses_are_http_errors() {
        let err = classify_fetch_error(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            Some("100"),
            "pull request #7",
        );
        assert_eq!(err.kind(), ErrorKind::Http);
        assert!(err.message().contains("pull request #7"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let client = GitHubApiClient::new("http://127.0.0.1:9".to_string(), "t".to_string());
        let err = client.get_user("alice").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Http);
        assert!(err.message().contains("user 'alice'"));
    }
}
