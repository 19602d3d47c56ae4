// JSON file persistence for the task list

use crate::models::Task;
use eyre::{Context, Result};
use fs2::FileExt;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Load the persisted task list.
///
/// An absent file, an unreadable file, or a malformed payload all yield an
/// empty list with a warning. Corrupt storage is never surfaced as an
/// error.
pub fn load_tasks(path: &Path) -> Vec<Task> {
    if !path.exists() {
        debug!(file = ?path, "No persisted tasks, starting empty");
        return Vec::new();
    }

    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!(file = ?path, error = ?e, "Failed to read task file, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Task>>(&contents) {
        Ok(tasks) => {
            debug!(file = ?path, count = tasks.len(), "Loaded persisted tasks");
            tasks
        }
        Err(e) => {
            warn!(file = ?path, error = ?e, "Malformed task file, starting empty");
            Vec::new()
        }
    }
}

/// Write the full task list as a JSON array, replacing any previous
/// contents.
///
/// Takes an exclusive lock on the file for the duration of the write and
/// flushes to disk before returning.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create storage directory")?;
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .context("Failed to open task file for writing")?;

    // Acquire exclusive lock before writing
    file.lock_exclusive().context("Failed to acquire file lock")?;

    let json = serde_json::to_string(tasks).context("Failed to serialize tasks")?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;

    // Lock is automatically released when file is dropped
    debug!(file = ?path, count = tasks.len(), "Persisted tasks");
    Ok(())
}
