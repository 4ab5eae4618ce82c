/// Filesystem layer used by the tool handlers
///
/// Handlers go through the `FileSystem` trait so tests can substitute an
/// in-memory implementation. `LocalFileSystem` is the real thing.

use std::io;
use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use tokio::io::AsyncWrite;

/// Writable file stream
pub type FileSink = Pin<Box<dyn AsyncWrite + Send>>;

/// Filesystem primitives the handlers depend on
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Create the directory (and parents) if it does not exist yet
    async fn ensure_dir(&self, path: &Path) -> io::Result<()>;

    /// Check whether a path exists
    async fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Open a file for writing, truncating any existing content
    async fn create_file(&self, path: &Path) -> io::Result<FileSink>;
}

/// `FileSystem` backed by `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn exists(&self, path: &Path) -> io::Result<bool> {
        tokio::fs::try_exists(path).await
    }

    async fn create_file(&self, path: &Path) -> io::Result<FileSink> {
        let file = tokio::fs::File::create(path).await?;
        Ok(Box::pin(file))
    }
}
