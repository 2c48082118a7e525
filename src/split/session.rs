//! Event-driven state for one interactive splitting session.
//!
//! The session never performs I/O. A driver feeds it [`SessionEvent`]s and
//! carries out the returned [`Effect`]: redrawing, starting the commit
//! pipeline, or reporting an error. The pipeline runs once; its completion
//! comes back as [`SessionEvent::CommitFinished`].

use crate::diff::{DiffChunk, HeaderMode, SelectionSet, reconstruct_with};
use crate::error::SplitError;

use super::orchestrator::PartialCommit;

/// Input to the session.
#[derive(Debug)]
pub enum SessionEvent {
    Toggle(usize),
    SelectAll,
    Invert,
    Commit,
    /// Regenerate the message and commit what is already staged.
    Retry,
    Quit,
    CommitFinished(Result<PartialCommit, SplitError>),
}

/// What the driver should do after an event.
#[derive(Debug)]
pub enum Effect {
    /// Selection changed; re-render.
    Redraw,
    /// The event referred to a chunk that does not exist.
    Rejected,
    /// Run the full pipeline with this patch.
    StartCommit(String),
    /// Run the staged-only pipeline.
    StartRetry,
    /// Report the error. The session is still live.
    Error(SplitError),
    /// A quit was recorded and takes effect when the pipeline finishes.
    Busy,
    Ignored,
    /// The session is over; see [`SplitSession::outcome`].
    Finished,
}

/// How a session ended.
#[derive(Debug)]
pub enum Outcome {
    Committed(PartialCommit),
    /// The user quit. `selection_staged` is true when an earlier failed
    /// pipeline left chunks in the index.
    Quit { selection_staged: bool },
    /// The pipeline failed after the user asked to quit.
    Aborted(SplitError),
}

#[derive(Debug)]
enum State {
    Selecting,
    /// A pipeline failed after staging; the selection is in the index.
    AwaitingRetry,
    Committing { quit_requested: bool },
    Finished(Outcome),
}

/// Chunk list, selection and lifecycle of one session.
#[derive(Debug)]
pub struct SplitSession {
    chunks: Vec<DiffChunk>,
    selection: SelectionSet,
    header_mode: HeaderMode,
    state: State,
}

impl SplitSession {
    pub fn new(chunks: Vec<DiffChunk>) -> Self {
        let selection = SelectionSet::new(chunks.len());
        Self {
            chunks,
            selection,
            header_mode: HeaderMode::default(),
            state: State::Selecting,
        }
    }

    pub fn with_header_mode(mut self, mode: HeaderMode) -> Self {
        self.header_mode = mode;
        self
    }

    pub fn chunks(&self) -> &[DiffChunk] {
        &self.chunks
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn is_committing(&self) -> bool {
        matches!(self.state, State::Committing { .. })
    }

    /// Whether a failed pipeline left the selection staged and a retry
    /// is on offer.
    pub fn awaiting_retry(&self) -> bool {
        matches!(self.state, State::AwaitingRetry)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished(_))
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.state {
            State::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn into_outcome(self) -> Option<Outcome> {
        match self.state {
            State::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: SessionEvent) -> Effect {
        if self.is_finished() {
            Effect::Ignored
        } else if self.is_committing() {
            self.handle_committing(event)
        } else {
            self.handle_selecting(event)
        }
    }

    fn handle_selecting(&mut self, event: SessionEvent) -> Effect {
        let staged = self.awaiting_retry();

        match event {
            SessionEvent::Toggle(index) => match self.selection.toggle(index) {
                Some(_) => self.edited(),
                None => Effect::Rejected,
            },
            SessionEvent::SelectAll => {
                self.selection.select_all();
                self.edited()
            }
            SessionEvent::Invert => {
                self.selection.toggle_all();
                self.edited()
            }
            SessionEvent::Commit => {
                let patch = reconstruct_with(&self.chunks, &self.selection, self.header_mode);
                if patch.is_empty() {
                    return Effect::Error(SplitError::NoChunksSelected);
                }
                self.state = State::Committing {
                    quit_requested: false,
                };
                Effect::StartCommit(patch)
            }
            SessionEvent::Retry if staged => {
                self.state = State::Committing {
                    quit_requested: false,
                };
                Effect::StartRetry
            }
            SessionEvent::Retry | SessionEvent::CommitFinished(_) => Effect::Ignored,
            SessionEvent::Quit => {
                self.state = State::Finished(Outcome::Quit {
                    selection_staged: staged,
                });
                Effect::Finished
            }
        }
    }

    fn handle_committing(&mut self, event: SessionEvent) -> Effect {
        let State::Committing { quit_requested } = self.state else {
            return Effect::Ignored;
        };

        match event {
            SessionEvent::Quit => {
                self.state = State::Committing {
                    quit_requested: true,
                };
                Effect::Busy
            }
            SessionEvent::CommitFinished(Ok(commit)) => {
                self.state = State::Finished(Outcome::Committed(commit));
                Effect::Finished
            }
            SessionEvent::CommitFinished(Err(err)) if quit_requested => {
                self.state = State::Finished(Outcome::Aborted(err));
                Effect::Finished
            }
            SessionEvent::CommitFinished(Err(err)) => {
                self.state = if err.leaves_selection_staged() {
                    State::AwaitingRetry
                } else {
                    State::Selecting
                };
                Effect::Error(err)
            }
            _ => Effect::Ignored,
        }
    }

    /// Editing the selection withdraws a pending retry offer.
    fn edited(&mut self) -> Effect {
        self.state = State::Selecting;
        Effect::Redraw
    }
}
