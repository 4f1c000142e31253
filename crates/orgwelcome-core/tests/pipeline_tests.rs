//! Integration tests for the invitation pipeline's resolution chain

use orgwelcome_core::contributors::{filter_contributors, resolve_contributors};
use orgwelcome_core::event::{load_event, SearchKey, TriggerEvent};
use orgwelcome_core::types::{CommitRecord, InviteConfig, PullRequest};
use orgwelcome_core::{ErrorKind, KNOWN_BOT_EXCLUSIONS};
use std::io::Write;

fn commit(sha: &str, author: Option<&str>, message: &str) -> CommitRecord {
    CommitRecord {
        sha: sha.to_string(),
        author_login: author.map(str::to_string),
        message: message.to_string(),
    }
}

fn event_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_event_to_invite_list_end_to_end() {
    // A realistic release-pipeline payload: the publish ran on a push
    // event, the PR itself is known only via its merge commit.
    let file = event_file(
        r#"{
            "ref": "refs/heads/main",
            "head_commit": {"id": "f00dcafe", "message": "Release 1.2.3"},
            "commits": [{"id": "f00dcafe"}]
        }"#,
    );

    let event = load_event(Some(file.path().to_str().unwrap()))
        .unwrap()
        .unwrap();
    assert_eq!(event.search_key(), Some(SearchKey::CommitSha("f00dcafe")));

    // Pretend the commit resolved to PR 42 with this snapshot of commits.
    let pr = PullRequest {
        number: 42,
        author_login: "alice".to_string(),
    };
    let commits = vec![
        commit("c1", Some("alice"), "Implement feature"),
        commit(
            "c2",
            Some("bob"),
            "Pair on edge cases\n\nCo-authored-by: @carol <carol@example.com>",
        ),
        commit("c3", None, "Apply review suggestions"),
        commit("c4", Some("dependabot[bot]"), "Bump lockfile"),
    ];

    let contributors = resolve_contributors(&pr, &commits, true);
    let invite_list = filter_contributors(&contributors, &InviteConfig::default());

    assert_eq!(invite_list, vec!["alice", "bob", "carol"]);
}

#[test]
fn test_direct_pull_request_event() {
    let file = event_file(r#"{"action": "closed", "pull_request": {"number": 7, "merged": true}}"#);

    let event = load_event(Some(file.path().to_str().unwrap()))
        .unwrap()
        .unwrap();
    assert_eq!(event.search_key(), Some(SearchKey::PullRequestNumber(7)));
}

#[test]
fn test_absent_event_path_means_no_event_data() {
    assert!(load_event(None).unwrap().is_none());
}

#[test]
fn test_malformed_event_file_fails_as_event_parse() {
    let file = event_file("{\"pull_request\": ");
    let err = load_event(Some(file.path().to_str().unwrap())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EventParse);
}

#[test]
fn test_identical_runs_produce_identical_invite_order() {
    let pr = PullRequest {
        number: 1,
        author_login: "zed".to_string(),
    };
    let commits = vec![
        commit("a", Some("mallory"), "x"),
        commit("b", Some("alice"), "y\n\nCo-authored-by: @bob"),
    ];
    let config = InviteConfig::default();

    let first = filter_contributors(&resolve_contributors(&pr, &commits, true), &config);
    let second = filter_contributors(&resolve_contributors(&pr, &commits, true), &config);

    assert_eq!(first, second);
    assert_eq!(first, vec!["alice", "bob", "mallory", "zed"]);
}

#[test]
fn test_all_contributors_excluded_is_empty_terminal_state() {
    let pr = PullRequest {
        number: 9,
        author_login: "dependabot[bot]".to_string(),
    };
    let commits = vec![commit("a", Some("dependabot"), "Bump deps")];

    let contributors = resolve_contributors(&pr, &commits, true);
    let invite_list = filter_contributors(&contributors, &InviteConfig::default());
    assert!(invite_list.is_empty());
}

#[test]
fn test_default_exclusions_cover_all_dependabot_spellings() {
    let pr = PullRequest {
        number: 2,
        author_login: "alice".to_string(),
    };
    let commits: Vec<CommitRecord> = KNOWN_BOT_EXCLUSIONS
        .iter()
        .copied()
        .enumerate()
        .map(|(i, bot)| commit(&format!("c{}", i), Some(bot), "Bump"))
        .collect();

    let contributors = resolve_contributors(&pr, &commits, true);
    let invite_list = filter_contributors(&contributors, &InviteConfig::default());
    assert_eq!(invite_list, vec!["alice"]);
}

#[test]
fn test_co_author_handles_flow_through_the_pipeline() {
    let raw = r#"{"pull_request": {"number": 5}}"#;
    let event = TriggerEvent::from_json(raw).unwrap();
    assert_eq!(event.search_key(), Some(SearchKey::PullRequestNumber(5)));

    let pr = PullRequest {
        number: 5,
        author_login: "maintainer".to_string(),
    };
    let commits = vec![commit(
        "deadbeef",
        None,
        "Docs pass\n\n\
         Co-authored-by: @writer <w@users.noreply.example.com>\n\
         Co-authored-by: External Person <ext@example.com>",
    )];

    let contributors = resolve_contributors(&pr, &commits, true);
    // "@writer" parses to the handle; the name-only trailer contributes its
    // first word (the documented literal rule).
    assert!(contributors.contains("writer"));
    assert!(contributors.contains("External"));
    assert!(contributors.contains("maintainer"));
}
