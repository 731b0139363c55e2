//! Build script generation.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::references::{ModuleProvider, ReferenceClosureResolver, ReferenceSet};
use super::toolchain::{CompilerToolchain, escape_path};
use crate::core::{
    ArtifactsPaths, BenchmarkTarget, HostPlatform, JobConfiguration, Module, Resolver,
};
use crate::{HarnessError, HarnessResult, sha256_hex};

/// A build script as written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    pub path: PathBuf,
    pub content: String,
    pub sha256: String,
    /// Modules passed to the compiler, in script order
    pub references: ReferenceSet,
}

/// Composes the compiler invocation and writes it to the build script path.
#[derive(Debug, Clone)]
pub struct BuildScriptGenerator {
    host: HostPlatform,
    toolchain: CompilerToolchain,
    closure: ReferenceClosureResolver,
}

impl BuildScriptGenerator {
    pub fn new(host: HostPlatform, closure: ReferenceClosureResolver) -> Self {
        BuildScriptGenerator {
            host,
            toolchain: CompilerToolchain::default(),
            closure,
        }
    }

    pub fn with_toolchain(mut self, toolchain: CompilerToolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    pub fn host(&self) -> HostPlatform {
        self.host
    }

    /// Script text for the given inputs. Pure; same inputs give the same bytes.
    pub fn compose(
        &self,
        job: &JobConfiguration,
        resolver: &dyn Resolver,
        paths: &ArtifactsPaths,
        references: &ReferenceSet,
    ) -> HarnessResult<String> {
        let tc = &self.toolchain;
        let platform = job.resolve_platform(resolver)?;

        let mut args = tc.launcher(self.host);
        args.push(tc.no_config_flag().to_string());
        args.push(tc.target_exe_flag().to_string());
        args.push(tc.optimize_flag().to_string());
        args.push(tc.unsafe_flag().to_string());
        args.push(tc.platform_flag(platform));
        let app_config = artifact_str(&paths.app_config_path)?;
        args.push(tc.app_config_flag(&escape_path(app_config, self.host)?));

        let escaped = references
            .iter()
            .filter_map(|module| module.location().map(|location| (module, location)))
            .map(|(module, location)| {
                let path = reference_str(module, location)?;
                escape_path(path, self.host).map(|c| c.into_owned())
            })
            .collect::<HarnessResult<Vec<_>>>()?;
        args.push(tc.reference_flag(&escaped));

        // The compiler runs from the artifacts directory
        let source = paths
            .program_code_path
            .file_name()
            .ok_or_else(|| HarnessError::Resolution {
                target: paths.program_code_path.display().to_string(),
                reason: "harness source path has no file name".into(),
            })?;
        let source = source.to_str().ok_or_else(|| HarnessError::Resolution {
            target: paths.program_code_path.display().to_string(),
            reason: "harness source file name is not valid UTF-8".into(),
        })?;
        args.push(escape_path(source, self.host)?.into_owned());

        debug!(platform = %platform, references = escaped.len(), "composed compiler invocation");
        Ok(format!("{}{}", tc.script_prefix(self.host), args.join(" ")))
    }

    /// Resolve the reference closure, compose the script and write it,
    /// replacing any previous content.
    pub fn generate(
        &self,
        target: &BenchmarkTarget,
        job: &JobConfiguration,
        resolver: &dyn Resolver,
        paths: &ArtifactsPaths,
        provider: &dyn ModuleProvider,
    ) -> HarnessResult<GeneratedScript> {
        let references = self.closure.resolve(target, provider)?;
        let content = self.compose(job, resolver, paths, &references)?;
        let path = paths.build_script_path.clone();
        std::fs::write(&path, &content).map_err(|source| HarnessError::Write {
            path: path.clone(),
            source,
        })?;
        info!(script = %path.display(), "wrote build script");
        Ok(GeneratedScript {
            sha256: sha256_hex(content.as_bytes()),
            path,
            content,
            references,
        })
    }
}

fn artifact_str(path: &Path) -> HarnessResult<&str> {
    path.to_str().ok_or_else(|| HarnessError::Resolution {
        target: path.display().to_string(),
        reason: "artifact path is not valid UTF-8".into(),
    })
}

/// A reference location as it can appear in the compiler's comma-separated
/// `/reference:` list.
fn reference_str<'a>(module: &Module, location: &'a Path) -> HarnessResult<&'a str> {
    let reject = |reason: &str| HarnessError::ReferenceResolution {
        reference: module.id.to_string(),
        requested_by: "compiler reference list".to_string(),
        reason: format!("{reason}: {}", location.display()),
    };
    let path = location
        .to_str()
        .ok_or_else(|| reject("location is not valid UTF-8"))?;
    if path.contains(',') {
        return Err(reject("location contains `,`, which splits the reference list"));
    }
    Ok(path)
}
