//! Snapshot capture and the transient artifact it produces

pub mod artifact;
pub mod snapshot;

pub use artifact::{CaptureArtifact, remote_path_for};
pub use snapshot::{CaptureError, CaptureStage, CaptureTimings, SidePanelLatch, SnapshotCapturer};
