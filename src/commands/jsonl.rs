//! Jsonl command: compile a stored snapshot into a training dataset.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::dataset::{create_jsonl, load_messages};
use crate::error::Result;

/// Compile a snapshot file into newline-delimited conversation records.
/// Returns the output path. Non-empty files end with a final newline.
pub fn run(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let store = load_messages(input)?;
    let mut contents = create_jsonl(&store)?;

    let lines = if contents.is_empty() {
        0
    } else {
        contents.lines().count()
    };
    if !contents.is_empty() {
        contents.push('\n');
    }

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("jsonl"));
    fs::write(&path, contents)?;

    info!(records = lines, output = %path.display(), "Dataset written");
    Ok(path)
}
