use crate::{Error, FileRead, Result};
use async_trait::async_trait;

/// Tokio-based implementation of the [`FileRead`] trait.
///
/// Reads the edgerc file through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::unexpected(format!("failed to read file {path}")).with_source(e))
    }
}
