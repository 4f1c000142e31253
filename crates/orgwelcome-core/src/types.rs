//! Core type definitions

use std::borrow::Cow;

/// Logins excluded from invitations unless the exclusion list is overridden.
pub const KNOWN_BOT_EXCLUSIONS: [&str; 4] = [
    "dependabot-preview[bot]",
    "dependabot-preview",
    "dependabot",
    "dependabot[bot]",
];

/// Suffix GitHub appends to automation account logins.
pub const BOT_LOGIN_SUFFIX: &str = "[bot]";

/// Organization membership role carried by an invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum InviteRole {
    /// Regular organization member
    #[default]
    DirectMember,
    /// Organization administrator
    Admin,
    /// Billing manager
    BillingManager,
}

impl InviteRole {
    /// Wire representation used by the invitations API
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DirectMember => "direct_member",
            Self::Admin => "admin",
            Self::BillingManager => "billing_manager",
        }
    }

    /// Parse from the configuration string - case-sensitive, no aliases
    #[inline]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "direct_member" => Some(Self::DirectMember),
            "admin" => Some(Self::Admin),
            "billing_manager" => Some(Self::BillingManager),
            _ => None,
        }
    }
}

/// Configuration input for one invitation run.
///
/// Borrowing (`Cow`) so the CLI can pass argument strings without copies;
/// owned values work the same for library callers.
#[derive(Debug, Clone)]
pub struct InviteConfig<'a> {
    // Identity
    /// API token (required; the run fails without it)
    pub token: Option<Cow<'a, str>>,
    /// `owner/repo` identifier of the repository the release ran in (required)
    pub repository: Option<Cow<'a, str>>,
    /// Path to the trigger event JSON document; absent means "no event data"
    pub event_path: Option<Cow<'a, str>>,
    /// API base URL override (GitHub Enterprise); default is api.github.com
    pub api_base_url: Option<Cow<'a, str>>,

    // Invitation target
    /// Target organization; falls back to the repository's owning organization
    pub organization: Option<Cow<'a, str>>,
    /// Team slug within the organization; no team when unset
    pub team_slug: Option<Cow<'a, str>>,
    /// Membership role carried by each invitation
    pub role: InviteRole,

    // Contributor selection
    /// Drop logins ending in `[bot]`
    pub skip_bots: bool,
    /// Collect `Co-authored-by:` trailer logins from commit messages
    pub include_co_authors: bool,
    /// Explicit exclusion list; `None` means the known-bot default list
    pub exclude_users: Option<Vec<Cow<'a, str>>>,

    /// Report intended invitations without issuing them
    pub dry_run: bool,
}

impl Default for InviteConfig<'_> {
    fn default() -> Self {
        Self {
            token: None,
            repository: None,
            event_path: None,
            api_base_url: None,
            organization: None,
            team_slug: None,
            role: InviteRole::DirectMember,
            skip_bots: true,
            include_co_authors: true,
            exclude_users: None,
            dry_run: false,
        }
    }
}

impl InviteConfig<'_> {
    /// The exclusion list in effect: the explicit override, or the known bots.
    pub fn effective_exclusions(&self) -> Vec<&str> {
        match &self.exclude_users {
            Some(users) => users.iter().map(|u| u.as_ref()).collect(),
            None => KNOWN_BOT_EXCLUSIONS.to_vec(),
        }
    }
}

/// The pull request under consideration, fetched once per run
#[derive(Debug, Clone)]
pub struct PullRequest {
    /// PR number within the repository
    pub number: u64,
    /// Login of the PR author
    pub author_login: String,
}

/// A single commit belonging to the pull request
#[derive(Debug, Clone)]
pub struct CommitRecord {
    /// Commit SHA
    pub sha: String,
    /// Login of the linked GitHub account, if the commit has one
    pub author_login: Option<String>,
    /// Raw multi-line commit message
    pub message: String,
}

/// Repository metadata needed for organization fallback
#[derive(Debug, Clone)]
pub struct RepositoryInfo {
    /// `owner/repo` name
    pub full_name: String,
    /// Login of the owning organization, if the repository belongs to one
    pub organization: Option<String>,
}

/// Resolved target organization
#[derive(Debug, Clone)]
pub struct Organization {
    /// Numeric organization id
    pub id: u64,
    /// Organization login
    pub login: String,
}

/// Resolved team within the target organization
#[derive(Debug, Clone)]
pub struct Team {
    /// Numeric team id (the invitations API wants ids, not slugs)
    pub id: u64,
    /// Team slug
    pub slug: String,
}

/// A user resolved by login
#[derive(Debug, Clone)]
pub struct RemoteUser {
    /// Numeric user id
    pub id: u64,
    /// User login
    pub login: String,
}

/// Classified result of one invitation request.
///
/// Callers branch on this value instead of inspecting HTTP status codes;
/// `AlreadySatisfied` (the platform's duplicate/conflict signal) is a
/// successful no-op, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteOutcome {
    /// Invitation created
    Invited,
    /// Already a member or already invited
    AlreadySatisfied,
    /// Non-idempotent failure, with the remote platform's message
    Failed(String),
}

/// Per-run report returned by the orchestrator
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of the located pull request, if any
    pub pull_request: Option<u64>,
    /// Filtered invite list, in invitation order
    pub candidates: Vec<String>,
    /// Logins a new invitation was created for
    pub invited: Vec<String>,
    /// Logins that were already members or already invited
    pub already_satisfied: Vec<String>,
    /// Logins a dry-run notice was emitted for
    pub would_invite: Vec<String>,
    /// Whether this run was a dry run
    pub dry_run: bool,
}

impl RunSummary {
    /// True when the run had nothing to do (no PR or no remaining candidates)
    pub fn is_noop(&self) -> bool {
        self.candidates.is_empty()
    }
}
