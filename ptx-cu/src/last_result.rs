//! Reading the result of the last load job
//!
//! Once a campaign has started the loader only displays the name of the
//! file that was loaded, taken from the job result JSON.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct JobResult {
    filename: Option<String>,
}

/// File name recorded by the last job, if any
///
/// Missing, malformed or filename-less results all yield `None`.
pub fn last_result_filename(result: Option<&str>) -> Option<String> {
    let raw = result.filter(|r| !r.trim().is_empty()).unwrap_or("{}");
    serde_json::from_str::<JobResult>(raw)
        .ok()
        .and_then(|r| r.filename)
        .filter(|name| !name.is_empty())
}
