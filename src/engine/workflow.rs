//! One generation cycle for a benchmark target.
//!
//! Paths are resolved, stale artifacts from the previous run are removed,
//! then the app config and build script are written. The harness source is
//! produced by the template engine and is only located here, never written.

use tracing::info;

use super::app_config::AppConfigWriter;
use super::cleanup::{ArtifactCleaner, Remover, Sleeper};
use super::references::{ModuleProvider, ReferenceClosureResolver};
use super::script::{BuildScriptGenerator, GeneratedScript};
use crate::HarnessResult;
use crate::core::{
    ArtifactPathResolver, ArtifactsPaths, BenchmarkTarget, DEFAULT_PROGRAM_NAME, HostPlatform,
    JobConfiguration, ModuleRef, Resolver,
};

/// Inputs for a generation cycle.
#[derive(Debug, Clone)]
pub struct GenerateInputs {
    pub target: BenchmarkTarget,
    pub job: JobConfiguration,
    pub program_name: String,
    pub host: HostPlatform,
    /// Harness runtime module
    pub runtime_module: ModuleRef,
    /// Generator/toolchain module
    pub generator_module: ModuleRef,
}

impl GenerateInputs {
    pub fn new(
        target: BenchmarkTarget,
        job: JobConfiguration,
        runtime_module: impl Into<ModuleRef>,
        generator_module: impl Into<ModuleRef>,
    ) -> Self {
        GenerateInputs {
            target,
            job,
            program_name: DEFAULT_PROGRAM_NAME.to_string(),
            host: HostPlatform::current(),
            runtime_module: runtime_module.into(),
            generator_module: generator_module.into(),
        }
    }

    pub fn with_program_name(mut self, program_name: impl Into<String>) -> Self {
        self.program_name = program_name.into();
        self
    }

    pub fn with_host(mut self, host: HostPlatform) -> Self {
        self.host = host;
        self
    }

    pub fn resolve_paths(&self) -> HarnessResult<ArtifactsPaths> {
        ArtifactPathResolver::new(self.host).resolve(&self.target, &self.program_name)
    }

    pub fn closure_resolver(&self) -> ReferenceClosureResolver {
        ReferenceClosureResolver::new(self.runtime_module.clone(), self.generator_module.clone())
    }
}

#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub paths: ArtifactsPaths,
    pub script: GeneratedScript,
}

/// Run a full generation cycle. Any error aborts the cycle; nothing is rolled back.
pub fn generate<R: Remover, S: Sleeper>(
    inputs: &GenerateInputs,
    provider: &dyn ModuleProvider,
    resolver: &dyn Resolver,
    cleaner: &ArtifactCleaner<R, S>,
) -> HarnessResult<GenerationOutcome> {
    let paths = clean(inputs, cleaner)?;

    AppConfigWriter.write(&paths.app_config_path, &inputs.job, resolver)?;

    let script = BuildScriptGenerator::new(inputs.host, inputs.closure_resolver()).generate(
        &inputs.target,
        &inputs.job,
        resolver,
        &paths,
        provider,
    )?;

    info!(
        benchmark = %inputs.target.display_name(),
        references = script.references.len(),
        sha256 = %script.sha256,
        "harness build prepared"
    );
    Ok(GenerationOutcome { paths, script })
}

/// Resolve paths and remove the previous run's artifacts.
pub fn clean<R: Remover, S: Sleeper>(
    inputs: &GenerateInputs,
    cleaner: &ArtifactCleaner<R, S>,
) -> HarnessResult<ArtifactsPaths> {
    let paths = inputs.resolve_paths()?;
    paths.ensure_writable()?;
    cleaner.clean(&paths)?;
    Ok(paths)
}
