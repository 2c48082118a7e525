//! Terminal presentation: chunk selection and message review.

pub mod review;
pub mod split_view;

pub use review::{ReviewAction, clean_edited_message, edit_message, prompt_review};
pub use split_view::{Command, dispatch, parse_command, render, run_split};
