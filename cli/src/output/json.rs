//! JSON output helpers.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::InstallationState;

/// Format the status document printed by `status --json`.
///
/// ```json
/// {
///   "state_file": "...",
///   "persisted": true,
///   "updated_at": "...",
///   "packages": { "rime": { "ibus-rime": true, "config-path": false, "plum": false } }
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_status(
    state_path: &Path,
    persisted: bool,
    state: &InstallationState,
) -> Result<String> {
    let obj = serde_json::json!({
        "state_file": state_path.display().to_string(),
        "persisted": persisted,
        "updated_at": state.updated_at().map(|at| at.to_rfc3339()),
        "packages": state.to_map(),
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
