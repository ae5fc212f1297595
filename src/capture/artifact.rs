//! Transient capture files and their remote object paths

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::utils::SCREENSHOT_PREFIX;

/// One capture: an identifier, a staged local file and its remote path
///
/// The local file exists only between capture and the end of the upload
/// attempt(s); `discard` removes it whatever the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureArtifact {
    id: Uuid,
    local_path: PathBuf,
    remote_path: String,
}

impl CaptureArtifact {
    /// Fresh artifact with a random identifier, staged under `staging_dir`
    #[must_use]
    pub fn new(staging_dir: &Path) -> Self {
        Self::with_id(Uuid::new_v4(), staging_dir)
    }

    #[must_use]
    pub fn with_id(id: Uuid, staging_dir: &Path) -> Self {
        Self {
            id,
            local_path: staging_dir.join(format!("{id}.png")),
            remote_path: remote_path_for(id),
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    #[must_use]
    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }

    /// Read the staged capture for upload
    pub async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.local_path).await
    }

    /// Delete the staged file; returns whether a file was actually removed
    ///
    /// A missing file is not an error.
    pub async fn discard(&self) -> io::Result<bool> {
        match tokio::fs::remove_file(&self.local_path).await {
            Ok(()) => {
                debug!("Removed staged capture {}", self.local_path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Remote object path for a capture identifier: `screenshots/{id}.png`
#[must_use]
pub fn remote_path_for(id: Uuid) -> String {
    format!("{SCREENSHOT_PREFIX}/{id}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_derive_from_identifier() {
        let id = Uuid::parse_str("5f0c1f9e-8a41-4c7e-9d0b-2a6f3b1c9e11").unwrap();
        let artifact = CaptureArtifact::with_id(id, Path::new("tmp/screenshots"));
        assert_eq!(
            artifact.remote_path(),
            "screenshots/5f0c1f9e-8a41-4c7e-9d0b-2a6f3b1c9e11.png"
        );
        assert_eq!(
            artifact.local_path(),
            Path::new("tmp/screenshots/5f0c1f9e-8a41-4c7e-9d0b-2a6f3b1c9e11.png")
        );
    }
}
