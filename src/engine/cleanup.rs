//! Removal of stale artifacts left by a previous run.
//!
//! A benchmark process that just exited may still hold handles on its
//! executable or config for a moment, so each deletion is retried on a fixed
//! backoff before giving up.

use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::core::ArtifactsPaths;
use crate::{HarnessError, HarnessResult};

/// Blocking delay between attempts. Injectable so tests do not really sleep.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Records requested delays instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.slept.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn total(&self) -> Duration {
        self.slept
            .lock()
            .map(|s| s.iter().sum())
            .unwrap_or_default()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        if let Ok(mut slept) = self.slept.lock() {
            slept.push(duration);
        }
    }
}

/// Bounded retry: one initial attempt plus `max_retries` more, `backoff` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 5,
            backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        RetryPolicy {
            max_retries,
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

/// Every attempt failed; carries the last error.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Run `op` until it succeeds or the policy is spent.
///
/// `op` receives the 1-based attempt number.
pub fn retry_with_backoff<T, E, F>(
    policy: RetryPolicy,
    sleeper: &dyn Sleeper,
    mut op: F,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut(u32) -> Result<T, E>,
{
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= policy.max_attempts() => {
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: e,
                });
            }
            Err(_) => {
                sleeper.sleep(policy.backoff);
                attempt += 1;
            }
        }
    }
}

/// File-system operations used by the cleaner.
pub trait Remover {
    /// Whether anything occupies `path`. A dangling symlink counts.
    fn exists(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path).is_ok()
    }

    fn remove(&self, path: &Path) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl Remover for FsRemover {
    fn remove(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Deletes the artifacts of a previous generation cycle.
#[derive(Debug, Default)]
pub struct ArtifactCleaner<R = FsRemover, S = ThreadSleeper> {
    policy: RetryPolicy,
    remover: R,
    sleeper: S,
}

impl ArtifactCleaner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: Remover, S: Sleeper> ArtifactCleaner<R, S> {
    pub fn with_parts(policy: RetryPolicy, remover: R, sleeper: S) -> Self {
        ArtifactCleaner {
            policy,
            remover,
            sleeper,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn remover(&self) -> &R {
        &self.remover
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Delete all four artifact files. Stops at the first file that cannot be removed.
    pub fn clean(&self, paths: &ArtifactsPaths) -> HarnessResult<()> {
        for file in paths.files() {
            self.delete_if_exists(file)?;
        }
        info!(dir = %paths.artifacts_dir.display(), "removed stale artifacts");
        Ok(())
    }

    /// Missing files are a no-op.
    pub fn delete_if_exists(&self, path: &Path) -> HarnessResult<()> {
        if !self.remover.exists(path) {
            return Ok(());
        }

        let result = retry_with_backoff(self.policy, &self.sleeper, |attempt| {
            match self.remover.remove(path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => {
                    if attempt < self.policy.max_attempts() {
                        warn!(
                            path = %path.display(),
                            attempt,
                            error = %e,
                            "artifact still in use, retrying"
                        );
                    }
                    Err(e)
                }
            }
        });

        match result {
            Ok(()) => {
                debug!(path = %path.display(), "deleted");
                Ok(())
            }
            Err(exhausted) => Err(HarnessError::Cleanup {
                path: path.to_path_buf(),
                attempts: exhausted.attempts,
                source: exhausted.last_error,
            }),
        }
    }
}
