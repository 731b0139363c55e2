//! Benchmark targets and the compiled modules that define them.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Identity of a compiled module.
///
/// Two references are the same module when their names match, regardless of
/// which path they were reached through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleRef {
    name: String,
}

impl ModuleRef {
    pub fn new(name: impl Into<String>) -> Self {
        ModuleRef { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for ModuleRef {
    fn from(name: &str) -> Self {
        ModuleRef::new(name)
    }
}

/// A loaded compiled module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Module identity
    pub id: ModuleRef,
    /// On-disk location of the compiled module; `None` for in-memory modules
    pub location: Option<PathBuf>,
}

impl Module {
    pub fn new(id: impl Into<ModuleRef>, location: Option<PathBuf>) -> Self {
        Module {
            id: id.into(),
            location,
        }
    }

    /// A module that only exists in memory (e.g. dynamically emitted).
    pub fn in_memory(id: impl Into<ModuleRef>) -> Self {
        Module::new(id, None)
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }
}

impl From<String> for ModuleRef {
    fn from(name: String) -> Self {
        ModuleRef::new(name)
    }
}

/// The method under measurement plus a handle to its containing module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkTarget {
    /// Fully qualified name of the declaring type
    pub type_name: String,
    /// Benchmark method name
    pub method: String,
    /// Module that declares `type_name`
    pub module: Module,
}

impl BenchmarkTarget {
    pub fn new(type_name: impl Into<String>, method: impl Into<String>, module: Module) -> Self {
        BenchmarkTarget {
            type_name: type_name.into(),
            method: method.into(),
            module,
        }
    }

    /// `Type.Method`, used in diagnostics.
    pub fn display_name(&self) -> String {
        format!("{}.{}", self.type_name, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_ref_identity_is_by_name() {
        let a = ModuleRef::new("Lib.A");
        let b: ModuleRef = "Lib.A".into();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Lib.A");
    }

    #[test]
    fn test_in_memory_module_has_no_location() {
        let m = Module::in_memory("Dynamic");
        assert!(m.location().is_none());
    }

    #[test]
    fn test_target_display_name() {
        let target = BenchmarkTarget::new("Benches.Strings", "Concat", Module::in_memory("Benches"));
        assert_eq!(target.display_name(), "Benches.Strings.Concat");
    }
}
