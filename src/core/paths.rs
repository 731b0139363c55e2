//! Artifact locations for one harness build.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::env::HostPlatform;
use super::target::BenchmarkTarget;
use crate::{HarnessError, HarnessResult};

pub const DEFAULT_PROGRAM_NAME: &str = "BenchmarkProgram";

const SOURCE_EXTENSION: &str = ".cs";
const APP_CONFIG_EXTENSION: &str = ".exe.config";
const EXECUTABLE_EXTENSION: &str = ".exe";

/// Absolute paths of every artifact produced for one benchmark target.
///
/// All four files are siblings inside `artifacts_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactsPaths {
    pub artifacts_dir: PathBuf,
    pub program_code_path: PathBuf,
    pub app_config_path: PathBuf,
    pub build_script_path: PathBuf,
    pub executable_path: PathBuf,
}

impl ArtifactsPaths {
    /// The four artifact files in cleanup order.
    pub fn files(&self) -> [&Path; 4] {
        [
            &self.program_code_path,
            &self.app_config_path,
            &self.build_script_path,
            &self.executable_path,
        ]
    }

    /// Fails with a resolution error unless the directory exists and can be written to.
    ///
    /// Writability is established by creating and deleting a scratch file, so
    /// ownership and ACLs are taken into account, not just the mode bits.
    pub fn ensure_writable(&self) -> HarnessResult<()> {
        let unusable = |reason: String| HarnessError::Resolution {
            target: self.artifacts_dir.display().to_string(),
            reason,
        };
        let meta = std::fs::metadata(&self.artifacts_dir)
            .map_err(|e| unusable(format!("artifacts directory is not accessible: {e}")))?;
        if !meta.is_dir() {
            return Err(unusable("artifacts path is not a directory".into()));
        }
        let scratch = tempfile::Builder::new()
            .prefix(".harness-write-check")
            .tempfile_in(&self.artifacts_dir)
            .map_err(|e| unusable(format!("artifacts directory is not writable: {e}")))?;
        scratch
            .close()
            .map_err(|e| unusable(format!("cannot remove write check file: {e}")))?;
        Ok(())
    }
}

/// Derives the artifacts directory and file names for a benchmark target.
#[derive(Debug, Clone)]
pub struct ArtifactPathResolver {
    host: HostPlatform,
}

impl Default for ArtifactPathResolver {
    fn default() -> Self {
        Self::new(HostPlatform::current())
    }
}

impl ArtifactPathResolver {
    pub fn new(host: HostPlatform) -> Self {
        ArtifactPathResolver { host }
    }

    /// Directory containing the module that defines the target.
    pub fn artifacts_directory(&self, target: &BenchmarkTarget) -> HarnessResult<PathBuf> {
        let unresolvable = |reason: &str| HarnessError::Resolution {
            target: target.display_name(),
            reason: format!("module `{}` {reason}", target.module.id),
        };

        let location = target
            .module
            .location()
            .ok_or_else(|| unresolvable("has no on-disk location"))?;
        let location = std::path::absolute(location)
            .map_err(|e| unresolvable(&format!("location cannot be made absolute: {e}")))?;
        let dir = location
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| unresolvable("location has no parent directory"))?;
        Ok(dir.to_path_buf())
    }

    pub fn resolve(
        &self,
        target: &BenchmarkTarget,
        program_name: &str,
    ) -> HarnessResult<ArtifactsPaths> {
        if program_name.is_empty() || program_name.contains(['/', '\\']) {
            return Err(HarnessError::Resolution {
                target: target.display_name(),
                reason: format!("invalid program name `{program_name}`"),
            });
        }

        let dir = self.artifacts_directory(target)?;
        let file = |ext: &str| dir.join(format!("{program_name}{ext}"));
        let paths = ArtifactsPaths {
            program_code_path: file(SOURCE_EXTENSION),
            app_config_path: file(APP_CONFIG_EXTENSION),
            build_script_path: file(self.host.script_extension()),
            executable_path: file(EXECUTABLE_EXTENSION),
            artifacts_dir: dir,
        };
        debug!(dir = %paths.artifacts_dir.display(), program = program_name, "resolved artifacts paths");
        Ok(paths)
    }
}
