use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::{
    BenchmarkTarget, DEFAULT_PROGRAM_NAME, HostPlatform, JobConfiguration, Module, ModuleRef,
    Platform,
};
use crate::engine::{GenerateInputs, StaticModuleProvider};
use crate::{HarnessError, HarnessResult};

/// Everything the discovery subsystem hands over for one benchmark target.
#[derive(Debug, Clone)]
pub struct HarnessManifest {
    pub program_name: String,
    pub runtime_module: ModuleRef,
    pub generator_module: ModuleRef,
    pub target: BenchmarkTarget,
    pub job: JobConfiguration,
    pub provider: StaticModuleProvider,
}

impl HarnessManifest {
    pub fn inputs(&self, host: HostPlatform) -> GenerateInputs {
        GenerateInputs::new(
            self.target.clone(),
            self.job.clone(),
            self.runtime_module.clone(),
            self.generator_module.clone(),
        )
        .with_program_name(self.program_name.clone())
        .with_host(host)
    }
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    program_name: Option<String>,
    runtime_module: String,
    generator_module: String,
    target: RawTarget,
    #[serde(default)]
    job: RawJob,
    #[serde(rename = "module", default)]
    modules: Vec<RawModule>,
}

#[derive(Debug, Deserialize)]
struct RawTarget {
    type_name: String,
    method: String,
    module: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawJob {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    gc_server: Option<bool>,
    #[serde(default)]
    gc_concurrent: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawModule {
    name: String,
    #[serde(default)]
    location: Option<PathBuf>,
    #[serde(default)]
    dependencies: Vec<String>,
}

pub fn load_manifest(path: &Path) -> HarnessResult<HarnessManifest> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| HarnessError::Message(format!("failed to read {}: {e}", path.display())))?;
    let base_dir = path.parent().unwrap_or(Path::new(""));
    parse_manifest(&s, base_dir)
        .map_err(|e| HarnessError::Message(format!("{}: {e}", path.display())))
}

/// Parse manifest text. Relative module locations are taken relative to `base_dir`.
pub fn parse_manifest(s: &str, base_dir: &Path) -> HarnessResult<HarnessManifest> {
    let raw: RawManifest = toml::from_str(s).map_err(|e| HarnessError::Message(e.to_string()))?;

    let mut job = JobConfiguration::new(raw.job.id.unwrap_or_else(|| "Default".to_string()));
    if let Some(platform) = raw.job.platform {
        job = job.with_platform(platform.parse::<Platform>()?);
    }
    if let Some(enabled) = raw.job.gc_server {
        job = job.with_gc_server(enabled);
    }
    if let Some(enabled) = raw.job.gc_concurrent {
        job = job.with_gc_concurrent(enabled);
    }

    let mut provider = StaticModuleProvider::new();
    let mut target_module = None;
    for m in raw.modules {
        let location = m.location.map(|l| base_dir.join(l));
        let module = Module::new(m.name, location);
        if module.id.name() == raw.target.module {
            target_module = Some(module.clone());
        }
        provider.insert(module, m.dependencies);
    }

    let target_module = target_module.ok_or_else(|| {
        HarnessError::Message(format!(
            "target module `{}` is not declared in any [[module]] table",
            raw.target.module
        ))
    })?;

    Ok(HarnessManifest {
        program_name: raw
            .program_name
            .unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_string()),
        runtime_module: ModuleRef::new(raw.runtime_module),
        generator_module: ModuleRef::new(raw.generator_module),
        target: BenchmarkTarget::new(raw.target.type_name, raw.target.method, target_module),
        job,
        provider,
    })
}
