use serde::{Deserialize, Serialize};

use crate::types::{ManifestEntry, UploadedFile};

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Starts a new multipart upload session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitUploadRequest {
    pub filename: String,
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub row_count: u64,
}

/// Requests a presigned target for one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresignPartRequest {
    pub filename: String,
    pub upload_id: String,
    pub part_number: u32,
}

/// Finalizes a multipart upload with the ordered part manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteUploadRequest {
    pub file_id: String,
    pub filename: String,
    pub upload_id: String,
    pub parts: Vec<ManifestEntry>,
}

/// Releases an incomplete remote session after a failed upload.
///
/// The service treats this as idempotent; aborting an already-released
/// session succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbortUploadRequest {
    pub file_id: String,
    pub filename: String,
    pub upload_id: String,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Session identifiers returned by Init.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitUploadResponse {
    pub upload_id: String,
    pub file_id: String,
}

/// Presigned target URL for one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresignPartResponse {
    pub url: String,
}

/// Listing of previously completed uploads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListFilesResponse {
    pub result: Vec<UploadedFile>,
}

fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}
