use std::path::PathBuf;

use crate::HarnessResult;
use crate::config::load_manifest;
use crate::core::HostPlatform;

/// Print the reference closure, one `name<TAB>location` per line.
pub fn run(manifest: PathBuf) -> HarnessResult<()> {
    let manifest = load_manifest(&manifest)?;
    let inputs = manifest.inputs(HostPlatform::current());
    let references = inputs
        .closure_resolver()
        .resolve(&inputs.target, &manifest.provider)?;
    for module in references.iter() {
        let location = module
            .location()
            .map(|l| l.display().to_string())
            .unwrap_or_default();
        println!("{}\t{}", module.id, location);
    }
    Ok(())
}
