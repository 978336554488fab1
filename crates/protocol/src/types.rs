use serde::{Deserialize, Serialize};

/// One entry of the completion manifest.
///
/// Serialized with the object store's member casing (`PartNumber`, `ETag`);
/// the manifest submitted on completion must be sorted ascending by
/// `part_number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(rename = "PartNumber")]
    pub part_number: u32,
    #[serde(rename = "ETag")]
    pub etag: String,
}

/// Descriptive shape metadata for a tabular source, attached to Init
/// when the caller knows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceShape {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub row_count: u64,
}

/// Summary of a previously completed upload, as returned by the listing
/// endpoint. Surfaced to UI collaborators as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    pub filename: String,
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub row_count: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub creation_datetime: String,
}

fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}
