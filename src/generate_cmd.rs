use std::path::PathBuf;

use tracing::info;

use crate::HarnessResult;
use crate::config::load_manifest;
use crate::core::{DefaultResolver, HostPlatform};
use crate::engine::{ArtifactCleaner, generate};
use crate::report::GenerationReport;

pub fn run(manifest: PathBuf, host: Option<HostPlatform>, json: Option<PathBuf>) -> HarnessResult<()> {
    let manifest = load_manifest(&manifest)?;
    let host = host.unwrap_or_else(HostPlatform::current);
    let inputs = manifest.inputs(host);
    info!(benchmark = %inputs.target.display_name(), %host, "generating harness build");

    let resolver = DefaultResolver;
    let outcome = generate(&inputs, &manifest.provider, &resolver, &ArtifactCleaner::new())?;

    println!("build script: {}", outcome.script.path.display());
    println!("sha256: {}", outcome.script.sha256);

    if let Some(json_path) = json {
        let platform = inputs.job.resolve_platform(&resolver)?;
        let report = GenerationReport::new(
            inputs.target.display_name(),
            inputs.job.id.clone(),
            host,
            platform,
            &outcome,
        );
        report.write_json(&json_path)?;
        info!(json = %json_path.display(), "wrote report");
    }
    Ok(())
}
