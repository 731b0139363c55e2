use std::path::PathBuf;

use crate::HarnessResult;
use crate::config::load_manifest;
use crate::core::HostPlatform;
use crate::engine::{ArtifactCleaner, clean};

pub fn run(manifest: PathBuf, host: Option<HostPlatform>) -> HarnessResult<()> {
    let manifest = load_manifest(&manifest)?;
    let inputs = manifest.inputs(host.unwrap_or_else(HostPlatform::current));
    let paths = clean(&inputs, &ArtifactCleaner::new())?;
    println!("cleaned {}", paths.artifacts_dir.display());
    Ok(())
}
