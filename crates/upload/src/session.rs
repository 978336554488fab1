/// Byte range assignment for one part.
///
/// Part numbers are 1-based and contiguous; the ranges of a session's jobs
/// exactly tile `[0, total_bytes)` with no gaps or overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartJob {
    pub part_number: u32,
    /// Inclusive start offset.
    pub start: u64,
    /// Exclusive end offset.
    pub end: u64,
}

impl PartJob {
    /// Length of this part's byte range.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An initialized upload session.
///
/// Created after the remote Init call succeeds and immutable from then on.
/// Lives only for the duration of one [`Uploader::upload`](crate::Uploader::upload)
/// invocation; nothing is persisted across process lifetimes.
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub file_name: String,
    pub total_bytes: u64,
    pub part_size: u64,
    /// Remote multipart session identifier.
    pub upload_id: String,
    /// Remote resource identifier for the stored object.
    pub file_id: String,
}

impl UploadSession {
    /// Number of parts: `ceil(total_bytes / part_size)`.
    pub fn total_parts(&self) -> u64 {
        total_parts(self.total_bytes, self.part_size)
    }

    /// The ordered part job list for this session.
    pub fn part_jobs(&self) -> Vec<PartJob> {
        plan_parts(self.total_bytes, self.part_size)
    }
}

pub(crate) fn total_parts(total_bytes: u64, part_size: u64) -> u64 {
    total_bytes.div_ceil(part_size)
}

/// Caller must have checked that the part count fits a `u32` part number;
/// the coordinator rejects oversized sources before any session exists.
pub(crate) fn plan_parts(total_bytes: u64, part_size: u64) -> Vec<PartJob> {
    (1..=total_parts(total_bytes, part_size))
        .map(|part_number| PartJob {
            part_number: part_number as u32,
            start: (part_number - 1) * part_size,
            end: total_bytes.min(part_number * part_size),
        })
        .collect()
}
