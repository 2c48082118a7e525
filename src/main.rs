//! hunkcommit - CLI entry point.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use git2::Repository;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use hunkcommit::commit::{LlmMessageGenerator, MessageGenerator};
use hunkcommit::config::{Config, ConfigOverrides, parse_provider};
use hunkcommit::diff::parse_chunks;
use hunkcommit::error::HistoryError;
use hunkcommit::git::{GitCli, RepositoryAccessor};
use hunkcommit::history::{HistoryRequest, summarize_history};
use hunkcommit::llm::{LlmRouter, Provider};
use hunkcommit::split::{Outcome, SessionEvent, SplitSession};
use hunkcommit::ui::{ReviewAction, dispatch, edit_message, prompt_review, run_split};

/// Commit staged changes with generated Conventional Commit messages.
#[derive(Parser, Debug)]
#[command(name = "hunkcommit")]
#[command(about = "Split staged changes into commits with LLM-written messages")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Commit author name (requires --author-email)
    #[arg(long, global = true)]
    author_name: Option<String>,

    /// Commit author email (requires --author-name)
    #[arg(long, global = true)]
    author_email: Option<String>,

    /// Primary LLM provider: claude or codex
    #[arg(long, global = true, value_parser = parse_provider)]
    provider: Option<Provider>,

    /// Timeout for one LLM call, in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Include lock files in the diff sent to the LLM
    #[arg(long, global = true)]
    keep_lockfiles: bool,

    /// Emit one file header per file instead of per chunk
    #[arg(long, global = true)]
    grouped_headers: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Commit everything staged (the default)
    Commit {
        /// Commit without reviewing the message
        #[arg(short, long)]
        yes: bool,

        /// Print the generated message without committing
        #[arg(long)]
        dry_run: bool,
    },
    /// Pick which staged chunks go into the next commit
    Split {
        /// Commit every chunk without prompting
        #[arg(long)]
        all: bool,
    },
    /// Summarize a range of commits
    Log {
        /// Start of the range, exclusive (default: --limit commits back)
        #[arg(long)]
        from: Option<String>,

        /// End of the range (defaults to HEAD)
        #[arg(long)]
        to: Option<String>,

        /// Maximum number of commits to summarize
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let config = Config::from_env()
        .and_then(|c| c.with_overrides(overrides(&cli.global)))
        .context("Invalid configuration")?;

    match cli.command.unwrap_or(Command::Commit {
        yes: false,
        dry_run: false,
    }) {
        Command::Commit { yes, dry_run } => run_commit(&config, yes, dry_run).await,
        Command::Split { all } => run_split_command(&config, all).await,
        Command::Log { from, to, limit } => run_log(&config, HistoryRequest { from, to, limit }).await,
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("hunkcommit=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

fn overrides(args: &GlobalArgs) -> ConfigOverrides {
    ConfigOverrides {
        author_name: args.author_name.clone(),
        author_email: args.author_email.clone(),
        provider: args.provider,
        timeout_secs: args.timeout,
        keep_lockfiles: args.keep_lockfiles,
        grouped_headers: args.grouped_headers,
    }
}

fn open_repository(config: &Config) -> GitCli {
    GitCli::new(".")
        .with_author(config.author.clone())
        .with_filter(config.filter_options())
}

async fn message_generator(config: &Config, repo: &GitCli) -> Result<LlmMessageGenerator> {
    let branch = repo
        .current_branch()
        .await
        .context("Failed to read the current branch")?;
    let router = LlmRouter::new(config.provider, config.llm_timeout);
    Ok(LlmMessageGenerator::new(router, branch, config.max_diff_chars))
}

/// Read the staged diff, failing with a hint when nothing is staged.
async fn read_staged(repo: &GitCli) -> Result<String> {
    let staged = repo
        .staged_diff()
        .await
        .context("Failed to read staged changes. Run hunkcommit inside a git repository.")?;
    if staged.trim().is_empty() {
        bail!("No staged changes. Stage files with `git add` first.");
    }
    Ok(staged)
}

async fn run_commit(config: &Config, yes: bool, dry_run: bool) -> Result<()> {
    let repo = open_repository(config);
    let staged = read_staged(&repo).await?;
    let mut generator = message_generator(config, &repo).await?;

    println!("Generating commit message...");
    let mut message = generator
        .generate(&staged)
        .await
        .context("Failed to generate commit message")?;

    if dry_run {
        println!("{message}");
        return Ok(());
    }

    if !yes {
        loop {
            match prompt_review(&message).context("Message review failed")? {
                ReviewAction::Accept => break,
                ReviewAction::Edit => {
                    match edit_message(&message).context("Failed to open editor")? {
                        Some(edited) => message = edited,
                        None => println!("Edit discarded; keeping the previous message."),
                    }
                }
                ReviewAction::Regenerate => {
                    println!("Regenerating...");
                    message = generator
                        .generate(&staged)
                        .await
                        .context("Failed to generate commit message")?;
                }
                ReviewAction::Cancel => {
                    println!("Cancelled. Nothing committed.");
                    return Ok(());
                }
            }
        }
    }

    let commit_id = repo.commit(&message).await.context("Failed to commit")?;
    print_committed(&commit_id, &message);
    Ok(())
}

async fn run_split_command(config: &Config, all: bool) -> Result<()> {
    let repo = open_repository(config);
    let staged = read_staged(&repo).await?;

    let chunks = parse_chunks(&staged);
    if chunks.is_empty() {
        println!(
            "The staged changes contain no hunks to split (only renames, mode changes or binary files). \
             Use `hunkcommit commit` instead."
        );
        return Ok(());
    }

    let mut generator = message_generator(config, &repo).await?;
    let mut session = SplitSession::new(chunks).with_header_mode(config.header_mode);

    let outcome = if all {
        session.handle(SessionEvent::SelectAll);
        let effect = session.handle(SessionEvent::Commit);
        dispatch(effect, &mut session, &repo, &mut generator).await;
        match session.into_outcome() {
            Some(outcome) => outcome,
            None => bail!("Split commit failed"),
        }
    } else {
        run_split(session, &repo, &mut generator)
            .await
            .context("Terminal interaction failed")?
    };

    match outcome {
        Outcome::Committed(commit) => print_committed(&commit.commit_id, &commit.message),
        Outcome::Quit {
            selection_staged: true,
        } => println!(
            "Nothing committed. The selected chunks are staged; the other chunks were unstaged."
        ),
        Outcome::Quit {
            selection_staged: false,
        } => println!("Nothing committed."),
        Outcome::Aborted(err) => return Err(err).context("Commit aborted"),
    }
    Ok(())
}

async fn run_log(config: &Config, request: HistoryRequest) -> Result<()> {
    let repo = Repository::open(".")
        .context("Not a git repository. Run hunkcommit from within a git repository.")?;
    let mut router = LlmRouter::new(config.provider, config.llm_timeout);

    match summarize_history(&repo, &request, &mut router).await {
        Ok(history) => {
            println!(
                "{} commits, {}..{}\n",
                history.commits.len(),
                history.range.from_ref,
                history.range.to_ref
            );
            println!("{}", history.summary);
            Ok(())
        }
        Err(HistoryError::NoCommits { from, to }) => {
            println!("No commits between {from} and {to}. Nothing to summarize.");
            Ok(())
        }
        Err(e) => Err(e).context("Failed to summarize history"),
    }
}

fn print_committed(commit_id: &str, message: &str) {
    let short = commit_id.get(..7).unwrap_or(commit_id);
    let subject = message.lines().next().unwrap_or_default();
    println!("✓ [{short}] {subject}");
}
