//! Turns typed local paths into attachment candidates.

use crate::domain::FileCandidate;
use crate::domain::attachment::mime_from_extension;
use std::path::Path;

/// Splits a comma-separated path list. Surrounding quotes from drag-and-drop are stripped.
pub fn split_paths(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|p| p.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Stats one path. Missing files and directories are reported as a message.
pub async fn probe(path: &str) -> Result<FileCandidate, String> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| format!("{path}: {e}"))?;
    if !meta.is_file() {
        return Err(format!("{path}: not a file"));
    }
    let full = tokio::fs::canonicalize(path)
        .await
        .map_err(|e| format!("{path}: {e}"))?;
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    Ok(FileCandidate {
        mime: mime_from_extension(&name).to_string(),
        url: format!("file://{}", full.display()),
        name,
        size: meta.len(),
    })
}

/// Probes every path in `input`, keeping readable files and collecting messages for the rest.
pub async fn probe_all(input: &str) -> (Vec<FileCandidate>, Vec<String>) {
    let mut found = Vec::new();
    let mut problems = Vec::new();
    for path in split_paths(input) {
        match probe(&path).await {
            Ok(c) => found.push(c),
            Err(msg) => problems.push(msg),
        }
    }
    (found, problems)
}
