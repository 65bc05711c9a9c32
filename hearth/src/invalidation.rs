//! Post-commit "invalidate feed view" signal.
//!
//! The signal is best-effort: [`crate::Hearth`] logs a failed invalidation and carries on, so a
//! mutation that committed is never reported as failed because of it.

use std::sync::Mutex;

use log::info;
use thiserror::Error;

/// Path of the home feed; every post, like, comment and follow invalidates it.
pub const FEED_PATH: &str = "/";
pub const NOTIFICATIONS_PATH: &str = "/notifications";

pub fn profile_path(handle: &str) -> String {
    format!("/profile/{handle}")
}

#[derive(Debug, Error)]
#[error("failed to invalidate {path}: {reason}")]
pub struct InvalidationError {
    pub path: String,
    pub reason: String,
}

/// Receives a path whose rendered view is stale after a committed mutation.
pub trait FeedInvalidator: Send + Sync {
    fn invalidate(&self, path: &str) -> Result<(), InvalidationError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInvalidator;

impl FeedInvalidator for NoopInvalidator {
    fn invalidate(&self, _path: &str) -> Result<(), InvalidationError> {
        Ok(())
    }
}

/// Logs each invalidated path at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogInvalidator;

impl FeedInvalidator for LogInvalidator {
    fn invalidate(&self, path: &str) -> Result<(), InvalidationError> {
        info!("invalidate {path}");
        Ok(())
    }
}

/// Records every path it is asked to invalidate. Handy in tests and tooling.
#[derive(Debug, Default)]
pub struct RecordingInvalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingInvalidator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().map(|paths| paths.clone()).unwrap_or_default()
    }
}

impl FeedInvalidator for RecordingInvalidator {
    fn invalidate(&self, path: &str) -> Result<(), InvalidationError> {
        let mut paths = self.paths.lock().map_err(|err| InvalidationError {
            path: path.to_string(),
            reason: err.to_string(),
        })?;
        paths.push(path.to_string());
        Ok(())
    }
}
