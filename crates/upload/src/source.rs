use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;

/// A readable byte source with a known length.
///
/// Part ranges handed out by the planner never overlap, but they are read
/// concurrently; implementations must support parallel `read_range` calls.
pub trait PartSource: Send + Sync {
    /// Source name forwarded to the coordination service (typically a file name).
    fn name(&self) -> &str;

    /// Total length in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the byte range `[start, end)`.
    fn read_range(&self, start: u64, end: u64) -> BoxFuture<'_, std::io::Result<Vec<u8>>>;
}

/// In-memory byte source.
pub struct MemorySource {
    name: String,
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

impl PartSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_range(&self, start: u64, end: u64) -> BoxFuture<'_, std::io::Result<Vec<u8>>> {
        Box::pin(async move {
            if start > end || end > self.data.len() as u64 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("range [{start}, {end}) out of bounds"),
                ));
            }
            Ok(self.data[start as usize..end as usize].to_vec())
        })
    }
}

/// File-backed byte source.
///
/// Each range read opens its own handle inside `spawn_blocking`, so
/// concurrent part reads do not contend on a shared seek position.
pub struct FileSource {
    name: String,
    path: PathBuf,
    len: u64,
}

impl FileSource {
    /// Opens `path` and captures its current length.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let len = std::fs::metadata(path)?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            path: path.to_path_buf(),
            len,
        })
    }
}

impl PartSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> u64 {
        self.len
    }

    fn read_range(&self, start: u64, end: u64) -> BoxFuture<'_, std::io::Result<Vec<u8>>> {
        let path = self.path.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || {
                let mut file = std::fs::File::open(&path)?;
                file.seek(SeekFrom::Start(start))?;
                let mut buf = vec![0u8; (end - start) as usize];
                file.read_exact(&mut buf)?;
                Ok(buf)
            })
            .await
            .map_err(|e| std::io::Error::other(format!("task join error: {e}")))?
        })
    }
}
