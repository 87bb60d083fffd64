//! Filter command: project a stored snapshot down to one author.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::dataset::{filter_messages_by_user, load_messages};
use crate::error::{Error, Result};

/// Default output path: `user-<id>-messages.json` next to the input.
fn default_output(input: &Path, user_id: &str) -> PathBuf {
    input.with_file_name(format!("user-{}-messages.json", user_id))
}

/// Write all of one author's messages from a snapshot as a JSON array.
/// Returns the output path.
pub fn run(user_id: &str, input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    if user_id.trim().is_empty() {
        return Err(Error::InvalidArgument("user id must not be empty".to_string()));
    }

    let store = load_messages(input)?;
    let messages = filter_messages_by_user(&store, user_id);

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input, user_id));
    fs::write(&path, serde_json::to_string_pretty(&messages)?)?;

    info!(
        user = user_id,
        messages = messages.len(),
        output = %path.display(),
        "Filtered snapshot written"
    );
    Ok(path)
}
