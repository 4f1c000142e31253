//! Co-author trailer parsing for commit messages

/// Literal trailer key, colon included. Case-sensitive, no leading
/// whitespace tolerance: `"  Co-authored-by:"` does not qualify.
pub const CO_AUTHOR_PREFIX: &str = "Co-authored-by:";

/// Extract co-author logins from a raw commit message.
///
/// A line qualifies only if it starts with the exact `Co-authored-by:`
/// literal. The value after the colon is trimmed, the first
/// whitespace-delimited token is taken, and one leading `@` is stripped.
/// Tokens that end up empty are discarded.
///
/// Yields logins in order of appearance without deduplication; the
/// contributor set downstream deduplicates. Borrows from the message,
/// no allocation.
///
/// Note the deliberate literal rule: a trailer like
/// `Co-authored-by: Jane Doe <jane@example.com>` yields `"Jane"`, while
/// the `@handle` convention (`Co-authored-by: @jdoe <...>`) yields `"jdoe"`.
pub fn extract_coauthors(message: &str) -> impl Iterator<Item = &str> {
    message.lines().filter_map(|line| {
        let value = line.strip_prefix(CO_AUTHOR_PREFIX)?;
        let token = value.trim().split_whitespace().next()?;
        let login = token.strip_prefix('@').unwrap_or(token);
        if login.is_empty() {
            None
        } else {
            Some(login)
        }
    })
}
