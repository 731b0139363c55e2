//! Machine-readable summary of a generation cycle.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{ArtifactsPaths, HostPlatform, Platform};
use crate::engine::GenerationOutcome;
use crate::{HarnessError, HarnessResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub name: String,
    pub location: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub target: String,
    pub job_id: String,
    pub host: HostPlatform,
    pub platform: Platform,
    pub paths: ArtifactsPaths,
    pub references: Vec<ReferenceEntry>,
    pub script_sha256: String,
    pub generated_at: String,
}

impl GenerationReport {
    pub fn new(
        target: String,
        job_id: String,
        host: HostPlatform,
        platform: Platform,
        outcome: &GenerationOutcome,
    ) -> Self {
        let references = outcome
            .script
            .references
            .iter()
            .filter_map(|m| {
                m.location().map(|location| ReferenceEntry {
                    name: m.id.to_string(),
                    location: location.to_path_buf(),
                })
            })
            .collect();
        GenerationReport {
            target,
            job_id,
            host,
            platform,
            paths: outcome.paths.clone(),
            references,
            script_sha256: outcome.script.sha256.clone(),
            generated_at: crate::now_string(),
        }
    }

    pub fn write_json(&self, path: &Path) -> HarnessResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| HarnessError::Message(format!("failed to serialize report: {e}")))?;
        std::fs::write(path, json).map_err(|source| HarnessError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BenchmarkTarget, DefaultResolver, JobConfiguration, Module};
    use crate::engine::{
        ArtifactCleaner, FsRemover, GenerateInputs, RecordingSleeper, RetryPolicy,
        StaticModuleProvider, generate,
    };

    #[test]
    fn test_report_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let module = |name: &str| Module::new(name, Some(dir.path().join(format!("{name}.dll"))));
        let provider = StaticModuleProvider::new()
            .with_module(module("Benches"), Vec::<&str>::new())
            .with_module(module("R"), Vec::<&str>::new())
            .with_module(module("G"), Vec::<&str>::new());
        let target = BenchmarkTarget::new("Benches.T", "Run", module("Benches"));
        let inputs = GenerateInputs::new(target, JobConfiguration::new("Default"), "R", "G")
            .with_host(HostPlatform::Unix);
        let cleaner =
            ArtifactCleaner::with_parts(RetryPolicy::default(), FsRemover, RecordingSleeper::new());
        let outcome = generate(&inputs, &provider, &DefaultResolver, &cleaner).unwrap();

        let report = GenerationReport::new(
            inputs.target.display_name(),
            inputs.job.id.clone(),
            HostPlatform::Unix,
            Platform::AnyCpu,
            &outcome,
        );
        let json_path = dir.path().join("report.json");
        report.write_json(&json_path).unwrap();

        let parsed: GenerationReport =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(parsed.target, "Benches.T.Run");
        assert_eq!(parsed.platform, Platform::AnyCpu);
        let names: Vec<&str> = parsed.references.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Benches", "R", "G"]);
        assert_eq!(parsed.script_sha256, outcome.script.sha256);
        assert!(!parsed.generated_at.is_empty());
    }
}
