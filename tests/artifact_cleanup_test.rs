//! Staged capture file lifecycle

use tempfile::TempDir;
use uuid::Uuid;
use vizcapture::capture::{CaptureArtifact, remote_path_for};

#[tokio::test]
async fn discarding_a_missing_file_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let artifact = CaptureArtifact::new(dir.path());

    assert!(!artifact.local_path().exists());
    assert!(!artifact.discard().await.unwrap());
    assert!(!artifact.discard().await.unwrap());
}

#[tokio::test]
async fn discard_removes_staged_file_once() {
    let dir = TempDir::new().unwrap();
    let artifact = CaptureArtifact::new(dir.path());
    tokio::fs::write(artifact.local_path(), b"png").await.unwrap();

    assert_eq!(artifact.read_bytes().await.unwrap(), b"png");
    assert!(artifact.discard().await.unwrap());
    assert!(!artifact.local_path().exists());
    assert!(!artifact.discard().await.unwrap());
}

#[tokio::test]
async fn discard_in_a_missing_directory_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let artifact = CaptureArtifact::new(&dir.path().join("never-created"));
    assert!(!artifact.discard().await.unwrap());
}

#[test]
fn fresh_artifacts_get_distinct_identifiers() {
    let dir = TempDir::new().unwrap();
    let a = CaptureArtifact::new(dir.path());
    let b = CaptureArtifact::new(dir.path());

    assert_ne!(a.id(), b.id());
    assert_ne!(a.local_path(), b.local_path());
    assert_eq!(a.remote_path(), remote_path_for(a.id()));
}

#[test]
fn remote_path_is_deterministic() {
    let id = Uuid::new_v4();
    assert_eq!(remote_path_for(id), remote_path_for(id));
    assert_eq!(remote_path_for(id), format!("screenshots/{id}.png"));
}
