//! Client-side chunked multipart upload orchestrator.
//!
//! Splits a byte source into fixed-size parts, uploads them concurrently in
//! lockstep batches, and finalizes the transfer by submitting the ordered
//! part manifest to a remote coordination service.
//!
//! [`Uploader`] is the only entry point; everything below it (scheduling,
//! per-part transfer, progress, trace propagation) is internal. The remote
//! service is reached through the [`CoordinationService`] trait so the
//! orchestrator stays decoupled from transport and testable with mocks.

mod coordinator;
mod part;
mod progress;
mod scheduler;
mod service;
mod session;
mod source;
mod trace;

pub use coordinator::{UploadConfig, Uploader};
pub use progress::ProgressFn;
pub use service::{CallContext, CoordinationService, ServiceError};
pub use session::{PartJob, UploadSession};
pub use source::{FileSource, MemorySource, PartSource};
pub use trace::TraceContext;

use std::fmt;

/// Default part size: 5 MiB.
pub const DEFAULT_PART_SIZE: u64 = 5 * 1024 * 1024;

/// Lifecycle phase in which a failure originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Presign,
    PartUpload,
    Complete,
    Abort,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::Presign => "presign",
            Phase::PartUpload => "part upload",
            Phase::Complete => "complete",
            Phase::Abort => "abort",
        };
        f.write_str(name)
    }
}

/// Errors produced by the upload orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The credential token was rejected, in whichever phase.
    #[error("unauthorized")]
    Unauthorized,

    /// A remote phase failed; carries the originating phase and cause.
    #[error("{phase} phase failed: {cause}")]
    Phase { phase: Phase, cause: String },

    /// The remote response was missing a required field.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The source would need more parts than part numbers can address.
    #[error("source requires {0} parts, exceeding the part number range")]
    TooManyParts(u64),

    /// Reading from the part source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The upload was cancelled before the next batch was launched.
    #[error("upload cancelled")]
    Cancelled,
}

impl UploadError {
    /// Classifies a service-level error under the phase it occurred in.
    pub(crate) fn from_service(err: ServiceError, phase: Phase) -> Self {
        match err {
            ServiceError::Unauthorized => UploadError::Unauthorized,
            ServiceError::MissingField(field) => {
                UploadError::Protocol(format!("missing response field: {field}"))
            }
            other => UploadError::Phase {
                phase,
                cause: other.to_string(),
            },
        }
    }
}
