//! Encoded directory cache on disk
//!
//! Layout under the cache directory:
//! - `instruments.pb`: the directory as an encoded `Map`
//! - `metadata.json`: when it was written and how large it is

use crate::error::Result;
use chrono::{DateTime, Utc};
use common::InstrumentDirectory;
use market_proto::{decode_directory, encode_directory};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const SNAPSHOT_FILE: &str = "instruments.pb";
const METADATA_FILE: &str = "metadata.json";

/// Snapshot metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// When the snapshot was written
    pub saved_at: DateTime<Utc>,
    /// Entries in the snapshot
    pub instrument_count: usize,
    /// Encoded size in bytes
    pub bytes: usize,
}

/// Directory snapshot cache
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
}

impl SnapshotCache {
    /// Cache rooted at `dir`; the directory is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache root
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the encoded directory
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    /// Write the directory and its metadata
    ///
    /// # Errors
    /// `Io` or `Metadata` when either file cannot be written.
    pub async fn save(&self, directory: &InstrumentDirectory) -> Result<SnapshotMetadata> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let bytes = encode_directory(directory);
        write_replace(&self.snapshot_path(), &bytes).await?;

        let metadata = SnapshotMetadata {
            saved_at: Utc::now(),
            instrument_count: directory.len(),
            bytes: bytes.len(),
        };
        let meta_json = serde_json::to_vec_pretty(&metadata)?;
        write_replace(&self.dir.join(METADATA_FILE), &meta_json).await?;

        info!(
            "Saved {} instruments to {} ({} bytes)",
            metadata.instrument_count,
            self.snapshot_path().display(),
            metadata.bytes
        );
        Ok(metadata)
    }

    /// Read the cached directory, `None` when nothing was saved yet
    ///
    /// # Errors
    /// `Codec` when the snapshot is corrupt, `Io` on other read failures.
    pub async fn load(&self) -> Result<Option<InstrumentDirectory>> {
        let path = self.snapshot_path();
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("No directory snapshot at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let directory = decode_directory(&bytes)?;
        info!("Loaded {} instruments from {}", directory.len(), path.display());
        Ok(Some(directory))
    }

    /// Read the snapshot metadata, `None` when nothing was saved yet
    ///
    /// # Errors
    /// `Metadata` when the file is not valid JSON, `Io` on read failures.
    pub async fn metadata(&self) -> Result<Option<SnapshotMetadata>> {
        match tokio::fs::read(self.dir.join(METADATA_FILE)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

async fn write_replace(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
