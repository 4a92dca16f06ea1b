use std::path::PathBuf;

use clap::Parser;
use miette::{miette, Context, IntoDiagnostic, Result};

use burrow_core::{BurrowConfig, SessionMode};
use burrow_review::github::{parse_pr_reference, GitHubClient};
use burrow_review::pipeline::ExtractionPipeline;
use burrow_review::render::render_report;

#[derive(Parser)]
#[command(
    name = "burrow",
    version,
    about = "Turn CodeRabbit review feedback into agent-ready text",
    long_about = "Burrow extracts CodeRabbit review feedback from a GitHub pull request and\n\
                   prints it as one clean, deduplicated, priority-ordered text report,\n\
                   ready to pipe into an automated coding agent.\n\n\
                   Per comment, exactly one representation survives: an AI instruction when\n\
                   present, else the suggested patch with its description, else the prose.\n\
                   Feedback is grouped by file and actionable items come first.\n\n\
                   Examples:\n  \
                     burrow https://github.com/owner/repo/pull/123\n  \
                     burrow owner/repo/123\n  \
                     burrow owner/repo/123 --all-reviews\n  \
                     burrow owner/repo/123 --debug | less"
)]
struct Cli {
    /// Pull request to extract (URL, owner/repo/number, or owner/repo#number)
    pr: String,

    /// Process every CodeRabbit review instead of only the most recent one
    #[arg(
        long,
        long_help = "Process every CodeRabbit review session on the PR.\n\n\
                       By default only the most recently submitted review is extracted,\n\
                       which keeps the report focused on feedback that is still current."
    )]
    all_reviews: bool,

    /// Interleave representation-selection annotations with the report
    #[arg(long)]
    debug: bool,

    /// Only consider reviews submitted after this commit (reserved)
    #[arg(long, value_name = "SHA")]
    since_commit: Option<String>,

    /// Path to configuration file (default: .burrow.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// GitHub token (default: GITHUB_TOKEN or GH_TOKEN env var)
    #[arg(long, value_name = "TOKEN")]
    github_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BurrowConfig::from_file(path)
            .into_diagnostic()
            .wrap_err(format!("loading {}", path.display()))?,
        None => {
            let default_path = std::path::Path::new(".burrow.toml");
            if default_path.exists() {
                BurrowConfig::from_file(default_path)
                    .into_diagnostic()
                    .wrap_err("loading .burrow.toml")?
            } else {
                BurrowConfig::default()
            }
        }
    };

    if let Some(sha) = &cli.since_commit {
        return Err(miette!(
            "--since-commit {sha} is not implemented yet; use --all-reviews to widen the selection"
        ));
    }

    let (owner, repo, number) = parse_pr_reference(&cli.pr).into_diagnostic()?;

    let mode = if cli.all_reviews || config.report.all_reviews {
        SessionMode::All
    } else {
        SessionMode::LatestOnly
    };

    let client = GitHubClient::new(cli.github_token.as_deref()).into_diagnostic()?;
    let sessions = client
        .fetch_sessions(&owner, &repo, number, &config)
        .await
        .into_diagnostic()
        .wrap_err(format!("fetching review data for {owner}/{repo}#{number}"))?;

    let pipeline = ExtractionPipeline::new(config.markers.clone(), mode);
    let extraction = pipeline.run(&sessions);

    if cli.debug {
        eprintln!("[debug] mode: {mode}");
        eprintln!("[debug] {}", extraction.stats);
    }

    print!("{}", render_report(&extraction.report, cli.debug));

    Ok(())
}
