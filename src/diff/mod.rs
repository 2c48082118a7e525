//! Unified diff chunking: tokenize, assemble, select and reconstruct.

pub mod chunk;
pub mod filter;
pub mod patch;
pub mod selection;
pub mod tokenizer;

pub use chunk::{DiffChunk, assemble, parse_chunks};
pub use filter::{FilterOptions, FilteredDiff, filter_diff, is_lockfile};
pub use patch::{HeaderMode, count_hunks, reconstruct, reconstruct_with};
pub use selection::SelectionSet;
pub use tokenizer::{DiffLine, classify_line, parse_file_path, tokenize};
