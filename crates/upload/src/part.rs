use std::time::Duration;

use partflow_protocol::{ManifestEntry, PresignPartRequest};
use tracing::{debug, warn};

use crate::service::{CallContext, CoordinationService};
use crate::session::{PartJob, UploadSession};
use crate::source::PartSource;
use crate::{Phase, UploadError};

/// Base delay for the exponential per-part retry backoff.
const RETRY_BASE_BACKOFF: Duration = Duration::from_millis(500);

/// Retry policy for transient per-part failures.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    /// Additional attempts after the first failure. 0 disables retry.
    pub max_retries: u32,
}

/// Uploads exactly one part: presign, transmit the byte range, extract the
/// completion token.
///
/// Only transient failures (remote status or transport errors, source I/O)
/// are retried; `Unauthorized` and protocol violations never are.
pub(crate) async fn upload_part(
    service: &dyn CoordinationService,
    source: &dyn PartSource,
    session: &UploadSession,
    job: PartJob,
    ctx: &CallContext,
    retry: RetryPolicy,
) -> Result<ManifestEntry, UploadError> {
    let mut attempt = 0u32;
    loop {
        match try_upload_part(service, source, session, job, ctx).await {
            Ok(entry) => return Ok(entry),
            Err(e) if attempt < retry.max_retries && is_retryable(&e) => {
                attempt += 1;
                let delay = RETRY_BASE_BACKOFF * (1 << (attempt - 1));
                warn!(
                    part = job.part_number,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "part upload failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn try_upload_part(
    service: &dyn CoordinationService,
    source: &dyn PartSource,
    session: &UploadSession,
    job: PartJob,
    ctx: &CallContext,
) -> Result<ManifestEntry, UploadError> {
    let data = source.read_range(job.start, job.end).await?;

    let url = service
        .presign_part(
            PresignPartRequest {
                filename: session.file_name.clone(),
                upload_id: session.upload_id.clone(),
                part_number: job.part_number,
            },
            ctx.clone(),
        )
        .await
        .map_err(|e| UploadError::from_service(e, Phase::Presign))?;

    let etag = service
        .put_part(url, data)
        .await
        .map_err(|e| UploadError::from_service(e, Phase::PartUpload))?;

    debug!(part = job.part_number, bytes = job.len(), "part uploaded");
    Ok(ManifestEntry {
        part_number: job.part_number,
        etag,
    })
}

fn is_retryable(err: &UploadError) -> bool {
    matches!(err, UploadError::Phase { .. } | UploadError::Io(_))
}
