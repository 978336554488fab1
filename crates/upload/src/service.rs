use futures_util::future::BoxFuture;
use partflow_protocol::{
    AbortUploadRequest, CompleteUploadRequest, InitUploadRequest, InitUploadResponse,
    PresignPartRequest,
};

use crate::TraceContext;

/// Per-call context threaded through every coordination call.
///
/// Carries the optional credential token (header-equivalent, absent in
/// unauthenticated mode) and the trace continuation returned by Init.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    pub token: Option<String>,
    pub trace: TraceContext,
}

/// Errors surfaced by a [`CoordinationService`] implementation.
///
/// Classification into the upload error taxonomy (which phase failed) is
/// done by the coordinator, not the transport.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The service rejected the credential token (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(String),

    /// A required field was absent from an otherwise successful response.
    #[error("missing response field: {0}")]
    MissingField(&'static str),
}

/// Remote coordination service consumed by the uploader.
///
/// Implemented over HTTP by `partflow-client`; kept as a trait so the
/// orchestrator is decoupled from transport and testable with mocks.
pub trait CoordinationService: Send + Sync {
    /// Creates a remote multipart session. Returns the session identifiers
    /// and any trace continuation headers the service handed back.
    fn init_upload(
        &self,
        req: InitUploadRequest,
        ctx: CallContext,
    ) -> BoxFuture<'_, Result<(InitUploadResponse, TraceContext), ServiceError>>;

    /// Returns a short-lived presigned target reference for one part.
    fn presign_part(
        &self,
        req: PresignPartRequest,
        ctx: CallContext,
    ) -> BoxFuture<'_, Result<String, ServiceError>>;

    /// Transmits one part's byte range to its presigned target and returns
    /// the completion token from the response metadata.
    fn put_part(&self, url: String, body: Vec<u8>) -> BoxFuture<'_, Result<String, ServiceError>>;

    /// Finalizes the session with the sorted part manifest.
    fn complete_upload(
        &self,
        req: CompleteUploadRequest,
        ctx: CallContext,
    ) -> BoxFuture<'_, Result<(), ServiceError>>;

    /// Releases an incomplete remote session. Idempotent on the service side.
    fn abort_upload(
        &self,
        req: AbortUploadRequest,
        ctx: CallContext,
    ) -> BoxFuture<'_, Result<(), ServiceError>>;
}
