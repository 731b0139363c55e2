use std::path::PathBuf;

use crate::HarnessResult;
use crate::config::load_manifest;
use crate::core::HostPlatform;

pub fn run(manifest: PathBuf, host: Option<HostPlatform>) -> HarnessResult<()> {
    let manifest = load_manifest(&manifest)?;
    let paths = manifest
        .inputs(host.unwrap_or_else(HostPlatform::current))
        .resolve_paths()?;
    println!("artifacts_dir: {}", paths.artifacts_dir.display());
    println!("source:        {}", paths.program_code_path.display());
    println!("app_config:    {}", paths.app_config_path.display());
    println!("build_script:  {}", paths.build_script_path.display());
    println!("executable:    {}", paths.executable_path.display());
    Ok(())
}
