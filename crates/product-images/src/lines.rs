use std::path::Path;

use futures::{StreamExt, stream};

use crate::error::ImportError;
use crate::stage::LazySeq;

/// Read a newline-delimited list and stream its lines in file order.
///
/// The whole file is read up front, so an unreadable path fails here, before
/// any downstream stage runs. Lines are yielded verbatim: a terminating
/// newline produces a trailing empty element.
pub async fn read_lines(path: &Path) -> Result<LazySeq<'static, String, ImportError>, ImportError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ImportError::io(path, e))?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "read input list");

    let lines: Vec<String> = contents.split('\n').map(str::to_owned).collect();
    Ok(stream::iter(lines.into_iter().map(Ok)).boxed())
}
