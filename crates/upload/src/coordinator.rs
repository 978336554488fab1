//! Upload session lifecycle driver.
//!
//! The coordinator is the only component visible to callers: it initializes
//! the remote session, schedules part uploads, orders the manifest, and
//! finalizes the transfer. On failure it issues a best-effort abort so the
//! remote session is not left dangling.

use std::future::Future;

use futures_util::FutureExt;
use partflow_protocol::{
    AbortUploadRequest, CompleteUploadRequest, InitUploadRequest, SourceShape,
};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, debug, info, warn};

use crate::part::{self, RetryPolicy};
use crate::progress::{ProgressFn, ProgressReporter};
use crate::scheduler;
use crate::service::{CallContext, CoordinationService, ServiceError};
use crate::session::{self, UploadSession};
use crate::source::PartSource;
use crate::trace::{TraceContext, UploadTrace};
use crate::{DEFAULT_PART_SIZE, Phase, UploadError};

/// Configuration for one upload invocation.
pub struct UploadConfig {
    /// Part size in bytes. 0 selects the 5 MiB default.
    pub part_size: u64,
    /// Maximum parts in flight per batch. `None` = unbounded, i.e. the
    /// whole file in a single batch.
    pub concurrency: Option<usize>,
    /// Credential token forwarded on every coordination call. `None` is
    /// unauthenticated mode.
    pub token: Option<String>,
    /// Optional tabular shape metadata attached to Init.
    pub shape: Option<SourceShape>,
    /// Progress callback, invoked with percents in 0..=100.
    pub on_progress: Option<ProgressFn>,
    /// Bounded retries per part for transient failures. 0 disables retry.
    pub max_retries: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            part_size: DEFAULT_PART_SIZE,
            concurrency: None,
            token: None,
            shape: None,
            on_progress: None,
            max_retries: 0,
        }
    }
}

/// Drives the full multipart upload lifecycle against a coordination service.
pub struct Uploader<'a> {
    service: &'a dyn CoordinationService,
    cancel: CancellationToken,
}

impl<'a> Uploader<'a> {
    pub fn new(service: &'a dyn CoordinationService) -> Self {
        Self {
            service,
            cancel: CancellationToken::new(),
        }
    }

    /// Returns a cancellation token for this uploader.
    ///
    /// Cancellation takes effect at batch boundaries; an already-launched
    /// batch runs to completion.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Uploads `source` as a multipart transfer and finalizes it.
    ///
    /// Phases: Init, part batches, manifest sort, Complete. Progress reaches
    /// 100 only after Complete succeeds. An empty source short-circuits from
    /// Init straight to Complete with an empty manifest. The first failure
    /// in any phase aborts the remaining schedule, triggers a best-effort
    /// release of the remote session, and is returned annotated with the
    /// failing phase.
    pub async fn upload(
        &self,
        source: &dyn PartSource,
        config: UploadConfig,
    ) -> Result<UploadSession, UploadError> {
        let part_size = if config.part_size == 0 {
            DEFAULT_PART_SIZE
        } else {
            config.part_size
        };
        let total_bytes = source.len();
        let total_parts = session::total_parts(total_bytes, part_size);
        if total_parts > u64::from(u32::MAX) {
            return Err(UploadError::TooManyParts(total_parts));
        }
        let shape = config.shape.unwrap_or_default();

        let trace = UploadTrace::new(source.name(), total_bytes, total_parts);
        let progress = ProgressReporter::new(total_parts, config.on_progress);

        info!(
            file = %source.name(),
            bytes = total_bytes,
            parts = total_parts,
            "starting upload"
        );

        // No trace continuation exists yet; Init is what produces it.
        let init = run_phase(
            trace.phase_span("init"),
            self.service.init_upload(
                InitUploadRequest {
                    filename: source.name().to_string(),
                    file_size: total_bytes,
                    columns: shape.columns,
                    row_count: shape.row_count,
                },
                CallContext {
                    token: config.token.clone(),
                    trace: TraceContext::default(),
                },
            ),
            Phase::Init,
        )
        .await;
        let (resp, continuation) = match init {
            Ok(v) => v,
            Err(e) => {
                trace.record_failure(&e);
                return Err(e);
            }
        };

        let session = UploadSession {
            file_name: source.name().to_string(),
            total_bytes,
            part_size,
            upload_id: resp.upload_id,
            file_id: resp.file_id,
        };
        let ctx = CallContext {
            token: config.token,
            trace: continuation,
        };
        let retry = RetryPolicy {
            max_retries: config.max_retries,
        };
        let limit = config.concurrency.unwrap_or(total_parts as usize);

        match self
            .transfer_and_complete(source, &session, &ctx, limit, retry, &trace, &progress)
            .await
        {
            Ok(()) => {
                progress.finish();
                info!(
                    upload_id = %session.upload_id,
                    file_id = %session.file_id,
                    "upload completed"
                );
                Ok(session)
            }
            Err(e) => {
                trace.record_failure(&e);
                self.release_session(&session, &ctx, &trace).await;
                Err(e)
            }
        }
    }

    async fn transfer_and_complete(
        &self,
        source: &dyn PartSource,
        session: &UploadSession,
        ctx: &CallContext,
        limit: usize,
        retry: RetryPolicy,
        trace: &UploadTrace,
        progress: &ProgressReporter,
    ) -> Result<(), UploadError> {
        let jobs: Vec<_> = session
            .part_jobs()
            .into_iter()
            .map(|job| {
                let span = trace.part_span(job.part_number);
                let ctx = ctx.clone();
                async move {
                    let result =
                        part::upload_part(self.service, source, session, job, &ctx, retry).await;
                    match &result {
                        Ok(_) => progress.part_done(),
                        Err(e) => UploadTrace::mark_failed(&Span::current(), e),
                    }
                    result
                }
                .instrument(span)
                .boxed()
            })
            .collect();

        let mut manifest = scheduler::run_batches(jobs, limit, &self.cancel).await?;
        // Completion order is network-dependent; this sort is the sole
        // ordering guarantee for the manifest.
        manifest.sort_by_key(|entry| entry.part_number);
        if manifest.len() != session.total_parts() as usize {
            return Err(UploadError::Protocol(format!(
                "manifest has {} entries, expected {}",
                manifest.len(),
                session.total_parts()
            )));
        }

        run_phase(
            trace.phase_span("complete"),
            self.service.complete_upload(
                CompleteUploadRequest {
                    file_id: session.file_id.clone(),
                    filename: session.file_name.clone(),
                    upload_id: session.upload_id.clone(),
                    parts: manifest,
                },
                ctx.clone(),
            ),
            Phase::Complete,
        )
        .await
    }

    /// Best-effort idempotent release of the remote session after a failure.
    ///
    /// Abort errors are logged, never surfaced; the terminal error stays the
    /// one that failed the upload.
    async fn release_session(
        &self,
        session: &UploadSession,
        ctx: &CallContext,
        trace: &UploadTrace,
    ) {
        let span = trace.phase_span("abort");
        let result = self
            .service
            .abort_upload(
                AbortUploadRequest {
                    file_id: session.file_id.clone(),
                    filename: session.file_name.clone(),
                    upload_id: session.upload_id.clone(),
                },
                ctx.clone(),
            )
            .instrument(span.clone())
            .await;
        match result {
            Ok(()) => debug!(upload_id = %session.upload_id, "released remote session"),
            Err(e) => {
                UploadTrace::mark_failed(&span, &e);
                warn!(
                    upload_id = %session.upload_id,
                    error = %e,
                    "failed to release remote session"
                );
            }
        }
    }
}

async fn run_phase<T>(
    span: Span,
    fut: impl Future<Output = Result<T, ServiceError>>,
    phase: Phase,
) -> Result<T, UploadError> {
    match fut.instrument(span.clone()).await {
        Ok(v) => Ok(v),
        Err(e) => {
            let err = UploadError::from_service(e, phase);
            UploadTrace::mark_failed(&span, &err);
            Err(err)
        }
    }
}
