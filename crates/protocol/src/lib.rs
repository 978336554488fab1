//! Wire types for the partflow upload coordination service.
//!
//! Field names and casing match the coordination service's JSON API,
//! including the S3-style `PartNumber`/`ETag` members of the completion
//! manifest.

pub mod messages;
pub mod types;

pub use messages::{
    AbortUploadRequest, CompleteUploadRequest, InitUploadRequest, InitUploadResponse,
    ListFilesResponse, PresignPartRequest, PresignPartResponse,
};
pub use types::{ManifestEntry, SourceShape, UploadedFile};
