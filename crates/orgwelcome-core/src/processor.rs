//! Invitation orchestration

use crate::contributors::{filter_contributors, resolve_contributors};
use crate::error::{Error, Result};
use crate::event::{locate_pull_request, TriggerEvent};
use crate::http::GitHubApiClient;
use crate::types::{InviteConfig, InviteOutcome, Organization, RunSummary, Team};

/// Fold one classified invitation outcome into the run summary.
///
/// The duplicate outcome records and continues; a failure aborts with an
/// error naming the affected login, leaving later logins untouched.
fn record_outcome(login: &str, outcome: InviteOutcome, summary: &mut RunSummary) -> Result<()> {
    match outcome {
        InviteOutcome::Invited => summary.invited.push(login.to_string()),
        InviteOutcome::AlreadySatisfied => summary.already_satisfied.push(login.to_string()),
        InviteOutcome::Failed(message) => {
            return Err(Error::Invitation {
                login: login.to_string(),
                message,
            });
        }
    }

    Ok(())
}

/// Orchestrates one invitation run: locate the PR, resolve and filter
/// contributors, resolve the target organization/team, invite each login.
///
/// A single linear pass with no retries; the surrounding pipeline re-runs
/// the whole thing on the next trigger if needed.
pub struct InviteProcessor<'a> {
    client: &'a GitHubApiClient,
    config: &'a InviteConfig<'a>,
    owner: &'a str,
    repo: &'a str,
}

impl<'a> InviteProcessor<'a> {
    /// Create a new processor for one run
    pub fn new(
        client: &'a GitHubApiClient,
        config: &'a InviteConfig<'a>,
        owner: &'a str,
        repo: &'a str,
    ) -> Self {
        Self {
            client,
            config,
            owner,
            repo,
        }
    }

    /// Run the pipeline. A missing pull request or an empty invite list is
    /// a successful no-op; a missing organization or a non-idempotent
    /// invitation failure aborts the run.
    pub async fn process(&self, event: Option<&TriggerEvent>) -> Result<RunSummary> {
        let mut summary = RunSummary {
            dry_run: self.config.dry_run,
            ..Default::default()
        };

        // Step 1: Locate the triggering pull request
        let Some(pr) = locate_pull_request(self.client, self.owner, self.repo, event).await? else {
            return Ok(summary);
        };
        summary.pull_request = Some(pr.number);

        // Step 2: Resolve contributors over the full commit list, then filter
        let commits = self
            .client
            .list_pull_commits(self.owner, self.repo, pr.number)
            .await?;
        let contributors = resolve_contributors(&pr, &commits, self.config.include_co_authors);
        let to_invite = filter_contributors(&contributors, self.config);

        if to_invite.is_empty() {
            return Ok(summary);
        }
        summary.candidates = to_invite;

        // Steps 3-4: org/team resolution and the invitation loop
        let candidates = summary.candidates.clone();
        self.invite_candidates(&candidates, &mut summary).await?;

        Ok(summary)
    }

    /// The second phase of a run: resolve the target organization and
    /// optional team, then invite the already-filtered candidates.
    ///
    /// Organization resolution happens here, after contributor resolution,
    /// so a missing organization fails at exactly this step.
    pub async fn invite_candidates(
        &self,
        candidates: &[String],
        summary: &mut RunSummary,
    ) -> Result<()> {
        // Step 3: Resolve the target organization and optional team
        let organization = self.resolve_organization().await?;
        let team = self.resolve_team(&organization).await?;

        // Step 4: Invite each remaining login in sorted order
        self.invite_logins(&organization, team.as_ref(), candidates, summary)
            .await
    }

    /// Explicit config name first, then the repository's owning
    /// organization; having neither is a fatal misconfiguration.
    async fn resolve_organization(&self) -> Result<Organization> {
        if let Some(name) = self.config.organization.as_deref() {
            return self.client.get_organization(name).await;
        }

        let repository = self.client.get_repository(self.owner, self.repo).await?;
        match repository.organization {
            Some(login) => self.client.get_organization(&login).await,
            None => Err(Error::Config(
                "No organization configured and the repository does not belong to one; \
                 set the organization option"
                    .to_string(),
            )),
        }
    }

    /// No team when no slug is configured; a configured slug that does not
    /// resolve propagates as a lookup failure.
    async fn resolve_team(&self, organization: &Organization) -> Result<Option<Team>> {
        match self.config.team_slug.as_deref() {
            None => Ok(None),
            Some(slug) => {
                let team = self
                    .client
                    .get_team_by_slug(&organization.login, slug)
                    .await?;
                Ok(Some(team))
            }
        }
    }

    /// The invitation loop. Dry-run emits one notice per login and touches
    /// nothing remote. The duplicate outcome continues silently; any other
    /// failure aborts the remaining logins.
    pub async fn invite_logins(
        &self,
        organization: &Organization,
        team: Option<&Team>,
        logins: &[String],
        summary: &mut RunSummary,
    ) -> Result<()> {
        for login in logins {
            if self.config.dry_run {
                println!("[orgwelcome] would invite @{}", login);
                summary.would_invite.push(login.clone());
                continue;
            }

            let user = self.client.get_user(login).await?;
            let outcome = self
                .client
                .invite_user(organization, &user, self.config.role, team)
                .await?;

            record_outcome(login, outcome, summary)?;
        }

        Ok(())
    }
}
