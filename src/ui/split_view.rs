//! Terminal driver for a splitting session.
//!
//! Reads one command per line, feeds it to [`SplitSession`] and carries out
//! the returned effects. While the commit pipeline runs, only Ctrl-C is
//! watched; it records a quit that takes effect once the pipeline ends.

use std::future::Future;

use dialoguer::Input;

use crate::commit::MessageGenerator;
use crate::error::SplitError;
use crate::git::RepositoryAccessor;
use crate::split::{
    Effect, Outcome, PartialCommit, SessionEvent, SplitSession, commit_patch, commit_staged,
};

/// A parsed line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Session(SessionEventKind),
    /// Print the hunk with this 0-based index.
    Show(usize),
    Help,
}

/// Session events the user can type (the pipeline result is never typed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEventKind {
    Toggle(usize),
    SelectAll,
    Invert,
    Commit,
    Retry,
    Quit,
}

impl From<SessionEventKind> for SessionEvent {
    fn from(kind: SessionEventKind) -> Self {
        match kind {
            SessionEventKind::Toggle(i) => SessionEvent::Toggle(i),
            SessionEventKind::SelectAll => SessionEvent::SelectAll,
            SessionEventKind::Invert => SessionEvent::Invert,
            SessionEventKind::Commit => SessionEvent::Commit,
            SessionEventKind::Retry => SessionEvent::Retry,
            SessionEventKind::Quit => SessionEvent::Quit,
        }
    }
}

const HELP: &str = "<n> toggle chunk n, a select all, i invert, v<n> view chunk n, \
c commit, r retry message, q quit";

/// Parse one input line. Chunk numbers are 1-based on screen.
pub fn parse_command(input: &str) -> Option<Command> {
    let input = input.trim();
    let kind = match input {
        "a" => SessionEventKind::SelectAll,
        "i" => SessionEventKind::Invert,
        "c" => SessionEventKind::Commit,
        "r" => SessionEventKind::Retry,
        "q" => SessionEventKind::Quit,
        "?" | "h" => return Some(Command::Help),
        _ => {
            if let Some(rest) = input.strip_prefix('v') {
                return chunk_index(rest.trim()).map(Command::Show);
            }
            SessionEventKind::Toggle(chunk_index(input)?)
        }
    };
    Some(Command::Session(kind))
}

fn chunk_index(number: &str) -> Option<usize> {
    number.parse::<usize>().ok()?.checked_sub(1)
}

/// The chunk list with selection marks and a status line.
pub fn render(session: &SplitSession) -> String {
    let selection = session.selection();
    let mut out = String::new();

    for (i, chunk) in session.chunks().iter().enumerate() {
        let mark = if selection.is_selected(i) { "x" } else { " " };
        out.push_str(&format!("  [{mark}] {:>3}  {}\n", i + 1, chunk.summary()));
    }

    out.push_str(&format!(
        "{}/{} chunks selected. {}",
        selection.count(),
        selection.len(),
        HELP
    ));
    out
}

/// Run the session until it finishes and return how it ended.
pub async fn run_split<R, G>(
    mut session: SplitSession,
    repo: &R,
    generator: &mut G,
) -> dialoguer::Result<Outcome>
where
    R: RepositoryAccessor + ?Sized,
    G: MessageGenerator + ?Sized,
{
    println!("{}", render(&session));

    while !session.is_finished() {
        let line: String = Input::new()
            .with_prompt(prompt_label(&session))
            .allow_empty(true)
            .interact_text()?;

        let event = match parse_command(&line) {
            Some(Command::Session(kind)) => SessionEvent::from(kind),
            Some(Command::Show(i)) => {
                match session.chunks().get(i) {
                    Some(chunk) => println!("{}\n{}", chunk.file_path, chunk),
                    None => eprintln!("No chunk {}", i + 1),
                }
                continue;
            }
            Some(Command::Help) => {
                println!("{HELP}");
                continue;
            }
            None => {
                if !line.trim().is_empty() {
                    eprintln!("Unknown command '{}'. {}", line.trim(), HELP);
                }
                continue;
            }
        };

        let effect = session.handle(event);
        dispatch(effect, &mut session, repo, generator).await;
    }

    Ok(session
        .into_outcome()
        .unwrap_or(Outcome::Quit {
            selection_staged: false,
        }))
}

/// Carry out an effect, including any follow-up effects from the
/// pipeline's completion.
pub async fn dispatch<R, G>(
    mut effect: Effect,
    session: &mut SplitSession,
    repo: &R,
    generator: &mut G,
) where
    R: RepositoryAccessor + ?Sized,
    G: MessageGenerator + ?Sized,
{
    loop {
        effect = match effect {
            Effect::StartCommit(patch) => {
                println!("Staging selected chunks and generating a commit message...");
                let result =
                    watch_for_quit(session, commit_patch(&patch, repo, &mut *generator)).await;
                session.handle(SessionEvent::CommitFinished(result))
            }
            Effect::StartRetry => {
                println!("Regenerating the commit message for the staged chunks...");
                let result = watch_for_quit(session, commit_staged(repo, &mut *generator)).await;
                session.handle(SessionEvent::CommitFinished(result))
            }
            Effect::Redraw => {
                println!("{}", render(session));
                return;
            }
            Effect::Error(err) => {
                report_error(&err, session.awaiting_retry());
                return;
            }
            Effect::Rejected => {
                eprintln!(
                    "No such chunk. Choose 1-{}.",
                    session.chunks().len()
                );
                return;
            }
            Effect::Busy | Effect::Ignored | Effect::Finished => return,
        };
    }
}

/// Await the pipeline, turning Ctrl-C into a recorded quit.
async fn watch_for_quit<F>(session: &mut SplitSession, pipeline: F) -> Result<PartialCommit, SplitError>
where
    F: Future<Output = Result<PartialCommit, SplitError>>,
{
    tokio::pin!(pipeline);
    loop {
        tokio::select! {
            result = &mut pipeline => return result,
            signal = tokio::signal::ctrl_c() => {
                if signal.is_err() {
                    return pipeline.await;
                }
                if let Effect::Busy = session.handle(SessionEvent::Quit) {
                    eprintln!("Quit requested. Waiting for the commit step to finish.");
                }
            }
        }
    }
}

fn prompt_label(session: &SplitSession) -> String {
    if session.awaiting_retry() {
        "Selection staged. r retry, c re-apply, q quit".to_string()
    } else {
        format!("{} selected", session.selection().count())
    }
}

fn report_error(err: &SplitError, awaiting_retry: bool) {
    eprintln!("Error: {err}");
    if awaiting_retry {
        eprintln!("The selected chunks are still staged. Press r to retry.");
    }
}
