//! Contributor resolution and filtering

use crate::trailers::extract_coauthors;
use crate::types::{CommitRecord, InviteConfig, PullRequest, BOT_LOGIN_SUFFIX};
use std::collections::{BTreeSet, HashSet};

/// Build the deduplicated contributor set for a pull request.
///
/// Seeds with the PR author, then adds every commit author login that is
/// present and, when enabled, every co-author trailer login. Resolution is
/// total: commits without a linked account or without trailers contribute
/// nothing extra and never fail. The `BTreeSet` makes the result
/// order-independent with respect to commit enumeration.
pub fn resolve_contributors(
    pr: &PullRequest,
    commits: &[CommitRecord],
    include_co_authors: bool,
) -> BTreeSet<String> {
    let mut contributors = BTreeSet::new();
    contributors.insert(pr.author_login.clone());

    for commit in commits {
        if let Some(login) = &commit.author_login {
            contributors.insert(login.clone());
        }

        if include_co_authors {
            for login in extract_coauthors(&commit.message) {
                contributors.insert(login.to_string());
            }
        }
    }

    contributors
}

/// Apply exclusion rules and produce the ordered invite list.
///
/// The set is walked in lexicographic (byte) order so identical runs produce
/// identical invitation order. Exact matches against the effective exclusion
/// list are dropped; with `skip_bots`, logins ending in `[bot]` are dropped
/// as well. An empty result is a valid terminal state.
pub fn filter_contributors(
    contributors: &BTreeSet<String>,
    config: &InviteConfig<'_>,
) -> Vec<String> {
    let excluded: HashSet<&str> = config.effective_exclusions().into_iter().collect();

    contributors
        .iter()
        .filter(|login| !excluded.contains(login.as_str()))
        .filter(|login| !(config.skip_bots && login.ends_with(BOT_LOGIN_SUFFIX)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr(author: &str) -> PullRequest {
        PullRequest {
            number: 42,
            author_login: author.to_string(),
        }
    }

    fn commit(author: Option<&str>, message: &str) -> CommitRecord {
        CommitRecord {
            sha: "0000000".to_string(),
            author_login: author.map(str::to_string),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_resolve_seeds_with_pr_author() {
        let contributors = resolve_contributors(&pr("alice"), &[], true);
        assert_eq!(contributors.len(), 1);
        assert!(contributors.contains("alice"));
    }

    #[test]
    fn test_resolve_adds_commit_authors() {
        let commits = vec![
            commit(Some("bob"), "Fix"),
            commit(None, "Merge"),
            commit(Some("alice"), "Tweak"),
        ];
        let contributors = resolve_contributors(&pr("alice"), &commits, true);
        let logins: Vec<&str> = contributors.iter().map(String::as_str).collect();
        assert_eq!(logins, vec!["alice", "bob"]);
    }

    #[test]
    fn test_resolve_adds_co_authors_when_enabled() {
        let commits = vec![commit(
            Some("bob"),
            "Pair work\n\nCo-authored-by: @carol <c@example.com>",
        )];

        let with = resolve_contributors(&pr("alice"), &commits, true);
        assert!(with.contains("carol"));

        let without = resolve_contributors(&pr("alice"), &commits, false);
        assert!(!without.contains("carol"));
    }

    #[test]
    fn test_resolve_is_order_independent() {
        let mut commits = vec![
            commit(Some("bob"), "One"),
            commit(Some("carol"), "Two\n\nCo-authored-by: @dave"),
            commit(None, "Three"),
        ];
        let forward = resolve_contributors(&pr("alice"), &commits, true);
        commits.reverse();
        let reversed = resolve_contributors(&pr("alice"), &commits, true);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let commits = vec![commit(Some("bob"), "Fix\n\nCo-authored-by: @bob")];
        let once = resolve_contributors(&pr("bob"), &commits, true);
        let twice = resolve_contributors(&pr("bob"), &commits, true);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn test_filter_sorts_and_drops_default_bots() {
        let contributors: BTreeSet<String> = ["bob", "alice", "dependabot[bot]"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let filtered = filter_contributors(&contributors, &InviteConfig::default());
        assert_eq!(filtered, vec!["alice", "bob"]);
    }

    #[test]
    fn test_filter_skip_bots_false_retains_bot_suffix() {
        let contributors: BTreeSet<String> = ["alice", "some-tool[bot]"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let config = InviteConfig {
            skip_bots: false,
            ..Default::default()
        };
        let filtered = filter_contributors(&contributors, &config);
        assert_eq!(filtered, vec!["alice", "some-tool[bot]"]);
    }

    #[test]
    fn test_filter_skip_bots_false_still_applies_exclusion_list() {
        // dependabot[bot] is on the default exclusion list, so it stays out
        // even when the suffix heuristic is off.
        let contributors: BTreeSet<String> = ["alice", "dependabot[bot]"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let config = InviteConfig {
            skip_bots: false,
            ..Default::default()
        };
        assert_eq!(filter_contributors(&contributors, &config), vec!["alice"]);
    }

    #[test]
    fn test_filter_exact_match_only() {
        let contributors: BTreeSet<String> = ["dependabot2", "Dependabot"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let filtered = filter_contributors(&contributors, &InviteConfig::default());
        assert_eq!(filtered, vec!["Dependabot", "dependabot2"]);
    }

    #[test]
    fn test_filter_custom_exclusions_replace_defaults() {
        let contributors: BTreeSet<String> = ["alice", "dependabot"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let config = InviteConfig {
            exclude_users: Some(vec!["alice".into()]),
            ..Default::default()
        };
        // The override replaces the known-bot list entirely.
        assert_eq!(
            filter_contributors(&contributors, &config),
            vec!["dependabot"]
        );
    }

    #[test]
    fn test_filter_empty_result_is_valid() {
        let contributors: BTreeSet<String> =
            ["dependabot[bot]"].iter().map(|s| s.to_string()).collect();
        assert!(filter_contributors(&contributors, &InviteConfig::default()).is_empty());
    }
}
