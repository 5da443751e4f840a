//! Range source trait and implementations

use std::io::{Cursor, SeekFrom};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};

use crate::{RangerError, Result};

/// A byte container supporting random-access sub-range reads.
#[async_trait]
pub trait RangeSource: Send + Sync {
    /// Total size of the container in bytes.
    fn size(&self) -> i64;

    /// Open a sequential reader over `[offset, offset + length)`.
    async fn range(
        &self,
        offset: i64,
        length: i64,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>>;
}

/// Validate `[offset, offset + length)` against a container size.
fn check_bounds(offset: i64, length: i64, size: i64) -> Result<()> {
    if offset < 0 || length < 0 || offset + length > size {
        return Err(RangerError::OutOfRange {
            offset,
            length,
            size,
        });
    }
    Ok(())
}

/// A range source over bytes held in memory.
///
/// Sub-ranges are zero-copy slices of the shared backing buffer.
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Bytes,
}

impl MemorySource {
    /// Wrap an in-memory byte buffer.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

#[async_trait]
impl RangeSource for MemorySource {
    fn size(&self) -> i64 {
        self.data.len() as i64
    }

    async fn range(
        &self,
        offset: i64,
        length: i64,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>> {
        check_bounds(offset, length, self.size())?;
        let slice = self.data.slice(offset as usize..(offset + length) as usize);
        Ok(Box::new(Cursor::new(slice)))
    }
}

/// A range source over a file, reading sub-ranges via seek.
///
/// The size is captured when the source is opened; the file is expected not
/// to change underneath it.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    size: i64,
}

impl FileSource {
    /// Open `path` and capture its current size.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let meta = tokio::fs::metadata(&path).await?;
        Ok(Self {
            path,
            size: meta.len() as i64,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RangeSource for FileSource {
    fn size(&self) -> i64 {
        self.size
    }

    async fn range(
        &self,
        offset: i64,
        length: i64,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>> {
        check_bounds(offset, length, self.size)?;
        let mut file = tokio::fs::File::open(&self.path).await?;
        file.seek(SeekFrom::Start(offset as u64)).await?;
        Ok(Box::new(file.take(length as u64)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    async fn read_all(mut reader: Box<dyn AsyncRead + Send + Unpin>) -> Vec<u8> {
        let mut out = Vec::new();
        reader.read_to_end(&mut out).await.unwrap();
        out
    }

    #[tokio::test]
    async fn memory_source_slices() {
        let source = MemorySource::new(&b"abcdefgh"[..]);
        assert_eq!(source.size(), 8);

        let bytes = read_all(source.range(2, 4).await.unwrap()).await;
        assert_eq!(bytes, b"cdef");

        let bytes = read_all(source.range(0, 8).await.unwrap()).await;
        assert_eq!(bytes, b"abcdefgh");

        let bytes = read_all(source.range(8, 0).await.unwrap()).await;
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn memory_source_rejects_bad_ranges() {
        let source = MemorySource::new(&b"abcd"[..]);
        assert!(matches!(
            source.range(-1, 2).await,
            Err(RangerError::OutOfRange { .. })
        ));
        assert!(matches!(
            source.range(0, -1).await,
            Err(RangerError::OutOfRange { .. })
        ));
        assert!(matches!(
            source.range(2, 3).await,
            Err(RangerError::OutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn file_source_reads_sub_ranges() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0123456789").unwrap();
        file.flush().unwrap();

        let source = FileSource::open(file.path()).await.unwrap();
        assert_eq!(source.size(), 10);

        let bytes = read_all(source.range(3, 4).await.unwrap()).await;
        assert_eq!(bytes, b"3456");

        assert!(matches!(
            source.range(8, 3).await,
            Err(RangerError::OutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn file_source_missing_file() {
        let err = FileSource::open("/nonexistent/braid-ranger-test").await;
        assert!(matches!(err, Err(RangerError::Io(_))));
    }
}
