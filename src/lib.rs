pub mod clean_cmd;
pub mod config;
pub mod core;
pub mod engine;
pub mod generate_cmd;
pub mod paths_cmd;
pub mod references_cmd;
pub mod report;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// The artifacts directory could not be derived from the target's module.
    #[error("cannot resolve artifacts directory for `{target}`: {reason}")]
    Resolution { target: String, reason: String },

    /// A module named in the reference closure could not be loaded.
    #[error("cannot resolve reference `{reference}` (required by `{requested_by}`): {reason}")]
    ReferenceResolution {
        reference: String,
        requested_by: String,
        reason: String,
    },

    /// A stale artifact survived the whole deletion retry budget.
    #[error("failed to delete {} after {attempts} attempts: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("characteristic `{name}`: {reason}")]
    Characteristic { name: String, reason: String },

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;

pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha256::digest;
    digest(bytes)
}

pub(crate) fn now_string() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}
