//! Application configuration artifact passed to the compiler via `/appconfig`.

use std::path::Path;

use tracing::info;

use crate::core::{Characteristic, JobConfiguration, Resolver};
use crate::{HarnessError, HarnessResult};

/// Writes the runtime settings the harness executable starts with.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppConfigWriter;

impl AppConfigWriter {
    /// Deterministic XML for the job's resolved GC settings.
    pub fn render(&self, job: &JobConfiguration, resolver: &dyn Resolver) -> HarnessResult<String> {
        let gc_server = job.resolve_flag(Characteristic::GcServer, resolver)?;
        let gc_concurrent = job.resolve_flag(Characteristic::GcConcurrent, resolver)?;

        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        xml.push_str("<configuration>\n");
        xml.push_str("  <runtime>\n");
        xml.push_str(&format!("    <gcServer enabled=\"{gc_server}\" />\n"));
        xml.push_str(&format!("    <gcConcurrent enabled=\"{gc_concurrent}\" />\n"));
        xml.push_str("  </runtime>\n");
        xml.push_str("</configuration>\n");
        Ok(xml)
    }

    pub fn write(
        &self,
        path: &Path,
        job: &JobConfiguration,
        resolver: &dyn Resolver,
    ) -> HarnessResult<()> {
        let xml = self.render(job, resolver)?;
        std::fs::write(path, xml).map_err(|source| HarnessError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(config = %path.display(), "wrote app config");
        Ok(())
    }
}
