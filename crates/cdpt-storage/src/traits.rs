use async_trait::async_trait;
use cdpt_types::StoredFile;
use serde_json::Value;

use crate::error::Result;

/// How a stored file is addressed on download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRef<'a> {
    /// Deterministic name chosen at upload time.
    Name(&'a str),
    /// Storage-assigned `_id` from a directory listing.
    Id(&'a str),
}

/// Remote object storage used to persist transcript blobs
///
/// Implementations only move bytes; payload decoding belongs to the caller.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Upload `contents` as a public file named `filename`, returning the
    /// gateway receipt unmodified.
    async fn upload(&self, filename: &str, contents: Vec<u8>) -> Result<Value>;

    /// Download the raw response body for a stored file.
    async fn download(&self, file: FileRef<'_>) -> Result<Vec<u8>>;

    /// List files in the shared public directory.
    async fn list_public_files(&self) -> Result<Vec<StoredFile>>;
}
