#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use orgwelcome_core::{invite_contributors, InviteConfig, InviteRole, RunSummary};
use std::borrow::Cow;
use std::io::Write;

#[derive(Parser)]
#[command(
    name = "orgwelcome",
    version,
    about = "Invite pull request contributors to a GitHub organization after a release"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Locate the released pull request and invite its contributors
    Run(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// GitHub token for API access
    #[arg(long, env = "GITHUB_TOKEN")]
    token: Option<String>,

    /// Repository the release ran in (owner/repo)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Path to the trigger event JSON document
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<String>,

    /// Target organization (default: the repository's owning organization)
    #[arg(long, env = "ORGWELCOME_ORGANIZATION")]
    organization: Option<String>,

    /// Team slug to attach invitations to
    #[arg(long, env = "ORGWELCOME_TEAM_SLUG")]
    team_slug: Option<String>,

    /// Membership role: direct_member, admin, or billing_manager
    #[arg(long, env = "ORGWELCOME_ROLE", default_value = "direct_member")]
    role: String,

    /// Drop logins ending in [bot]
    #[arg(
        long,
        env = "ORGWELCOME_SKIP_BOTS",
        default_value_t = true,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    skip_bots: bool,

    /// Collect Co-authored-by trailer logins from commit messages
    #[arg(
        long,
        env = "ORGWELCOME_INCLUDE_CO_AUTHORS",
        default_value_t = true,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    include_co_authors: bool,

    /// Logins to exclude (comma-separated; replaces the known-bot list)
    #[arg(long, env = "ORGWELCOME_EXCLUDE_USERS", value_delimiter = ',')]
    exclude_users: Option<Vec<String>>,

    /// Report intended invitations without issuing them
    #[arg(long, env = "ORGWELCOME_DRY_RUN")]
    dry_run: bool,

    /// Output format: gha, json, text (default: auto-detect)
    #[arg(long, env = "ORGWELCOME_OUTPUT_FORMAT")]
    output_format: Option<String>,
}

/// Output format for the CLI
enum OutputFormat {
    /// GitHub Actions: write to $GITHUB_OUTPUT + summary to stdout
    Gha,
    /// Full JSON to stdout
    Json,
    /// Human-readable text to stdout
    Text,
}

impl OutputFormat {
    fn detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("gha") => OutputFormat::Gha,
            Some("json") => OutputFormat::Json,
            Some("text") => OutputFormat::Text,
            _ => {
                if std::env::var("GITHUB_ACTIONS").is_ok() {
                    OutputFormat::Gha
                } else {
                    OutputFormat::Text
                }
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Run(args) => run_invite(args),
    };
    std::process::exit(code);
}

/// Filter empty strings from Vec (env vars may produce [""] for empty values)
fn clean_vec(v: &Option<Vec<String>>) -> Option<Vec<&str>> {
    v.as_ref().and_then(|v| {
        let cleaned: Vec<&str> = v
            .iter()
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
            .collect();
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    })
}

/// Filter empty string from Option (env vars may produce "" for empty values)
fn clean_opt(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

fn run_invite(args: RunArgs) -> i32 {
    let output_format = OutputFormat::detect(args.output_format.as_deref());

    let Some(role) = InviteRole::parse(&args.role) else {
        eprintln!(
            "Error: invalid role '{}' (expected direct_member, admin, or billing_manager)",
            args.role
        );
        return 1;
    };

    // Clean env var inputs (GHA sets empty strings for unset optional inputs)
    let config = InviteConfig {
        token: clean_opt(&args.token).map(Cow::Borrowed),
        repository: clean_opt(&args.repository).map(Cow::Borrowed),
        event_path: clean_opt(&args.event_path).map(Cow::Borrowed),
        api_base_url: None,
        organization: clean_opt(&args.organization).map(Cow::Borrowed),
        team_slug: clean_opt(&args.team_slug).map(Cow::Borrowed),
        role,
        skip_bots: args.skip_bots,
        include_co_authors: args.include_co_authors,
        exclude_users: clean_vec(&args.exclude_users)
            .map(|v| v.into_iter().map(Cow::Borrowed).collect()),
        dry_run: args.dry_run,
    };

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build();
    let rt = match rt {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create runtime: {e}");
            return 1;
        }
    };

    let summary = match rt.block_on(invite_contributors(&config)) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    match output_format {
        OutputFormat::Gha => write_gha_output(&summary),
        OutputFormat::Json => write_json_output(&summary),
        OutputFormat::Text => write_text_output(&summary),
    }

    0
}

/// Write outputs to $GITHUB_OUTPUT plus a summary to stdout
fn write_gha_output(summary: &RunSummary) {
    let output_file = match std::env::var("GITHUB_OUTPUT") {
        Ok(f) => f,
        Err(_) => {
            eprintln!("Warning: GITHUB_OUTPUT not set, falling back to stdout");
            write_json_output(summary);
            return;
        }
    };

    let mut f = match std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(&output_file)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: cannot open GITHUB_OUTPUT ({output_file}): {e}");
            return;
        }
    };

    let _ = writeln!(
        f,
        "pull_request={}",
        summary
            .pull_request
            .map(|n| n.to_string())
            .unwrap_or_default()
    );
    let _ = writeln!(f, "candidates={}", summary.candidates.join(" "));
    let _ = writeln!(f, "invited={}", summary.invited.join(" "));
    let _ = writeln!(f, "invited_count={}", summary.invited.len());
    let _ = writeln!(f, "already_invited={}", summary.already_satisfied.join(" "));
    let _ = writeln!(f, "would_invite={}", summary.would_invite.join(" "));
    let _ = writeln!(f, "dry_run={}", summary.dry_run);

    write_text_output(summary);
}

/// Write the full summary as JSON to stdout
fn write_json_output(summary: &RunSummary) {
    let output = serde_json::json!({
        "pull_request": summary.pull_request,
        "candidates": summary.candidates,
        "invited": summary.invited,
        "already_invited": summary.already_satisfied,
        "would_invite": summary.would_invite,
        "dry_run": summary.dry_run,
    });

    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    let _ = serde_json::to_writer(&mut lock, &output);
    let _ = writeln!(lock);
}

/// Write a human-readable summary to stdout
fn write_text_output(summary: &RunSummary) {
    let stdout = std::io::stdout();
    let mut w = stdout.lock();

    let _ = writeln!(w, "orgwelcome results");
    let _ = writeln!(w, "==================");

    match summary.pull_request {
        Some(number) => {
            let _ = writeln!(w, "Pull request: #{number}");
        }
        None => {
            let _ = writeln!(w, "No pull request located; nothing to do.");
            return;
        }
    }

    if summary.is_noop() {
        let _ = writeln!(w, "No contributors left to invite.");
        return;
    }

    if summary.dry_run {
        let _ = writeln!(w, "Dry run: {} would be invited", summary.would_invite.len());
        for login in &summary.would_invite {
            let _ = writeln!(w, "  @{login}");
        }
        return;
    }

    if !summary.invited.is_empty() {
        let _ = writeln!(w, "Invited ({}):", summary.invited.len());
        for login in &summary.invited {
            let _ = writeln!(w, "  @{login}");
        }
    }

    if !summary.already_satisfied.is_empty() {
        let _ = writeln!(
            w,
            "Already members or invited ({}):",
            summary.already_satisfied.len()
        );
        for login in &summary.already_satisfied {
            let _ = writeln!(w, "  @{login}");
        }
    }
}
