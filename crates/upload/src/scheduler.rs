use futures_util::future::{BoxFuture, join_all};
use partflow_protocol::ManifestEntry;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::UploadError;

/// Runs part jobs in lockstep batches of at most `limit` jobs.
///
/// Every job in a batch settles before the next batch starts; a slow job
/// therefore delays the whole next batch even when other slots are idle.
/// If any job in a batch fails, its siblings still run to completion but
/// the batch's outputs are discarded and no further batches are launched.
/// Cancellation is honored at batch-join granularity only.
pub(crate) async fn run_batches<'a>(
    mut jobs: Vec<BoxFuture<'a, Result<ManifestEntry, UploadError>>>,
    limit: usize,
    cancel: &CancellationToken,
) -> Result<Vec<ManifestEntry>, UploadError> {
    let limit = limit.max(1);
    let total = jobs.len();
    let mut results = Vec::with_capacity(total);
    let mut batch_index = 0usize;

    while !jobs.is_empty() {
        if cancel.is_cancelled() {
            return Err(UploadError::Cancelled);
        }

        let take = limit.min(jobs.len());
        let batch: Vec<_> = jobs.drain(..take).collect();
        debug!(batch = batch_index, jobs = take, remaining = jobs.len(), "launching batch");

        let mut first_failure = None;
        let mut settled = Vec::with_capacity(take);
        for outcome in join_all(batch).await {
            match outcome {
                Ok(entry) => settled.push(entry),
                Err(e) if first_failure.is_none() => first_failure = Some(e),
                Err(_) => {}
            }
        }

        if let Some(e) = first_failure {
            return Err(e);
        }
        results.extend(settled);
        batch_index += 1;
    }

    Ok(results)
}
