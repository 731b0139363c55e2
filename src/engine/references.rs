//! Reference closure: the compiled modules the harness source is compiled against.
//!
//! The closure is a graph walk over a [`ModuleProvider`], starting from the
//! module that declares the benchmark target. Modules are deduplicated by
//! identity, so a module reachable through several edges appears once.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::debug;

use crate::core::{BenchmarkTarget, Module, ModuleRef};
use crate::{HarnessError, HarnessResult};

/// Capability to inspect and load compiled modules.
pub trait ModuleProvider {
    /// Declared dependencies of `module`, in declaration order.
    fn dependencies(&self, module: &Module) -> Vec<ModuleRef>;

    /// Load a module by identity; `None` when it cannot be located.
    fn load(&self, reference: &ModuleRef) -> Option<Module>;
}

/// Ordered set of modules, unique by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    modules: Vec<Module>,
    seen: HashSet<ModuleRef>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if a module with the same identity is already present.
    pub fn insert(&mut self, module: Module) -> bool {
        if !self.seen.insert(module.id.clone()) {
            return false;
        }
        self.modules.push(module);
        true
    }

    pub fn contains(&self, id: &ModuleRef) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ModuleRef> {
        self.modules.iter().map(|m| &m.id)
    }

    /// On-disk locations in insertion order.
    ///
    /// Every member has a location: the resolver rejects in-memory modules.
    pub fn locations(&self) -> impl Iterator<Item = &Path> {
        self.modules.iter().filter_map(|m| m.location())
    }
}

/// Computes the reference closure for a benchmark target.
#[derive(Debug, Clone)]
pub struct ReferenceClosureResolver {
    /// Harness runtime module, always referenced
    pub runtime_module: ModuleRef,
    /// Generator module, always referenced even though the harness never calls it
    pub generator_module: ModuleRef,
}

impl ReferenceClosureResolver {
    pub fn new(runtime_module: impl Into<ModuleRef>, generator_module: impl Into<ModuleRef>) -> Self {
        ReferenceClosureResolver {
            runtime_module: runtime_module.into(),
            generator_module: generator_module.into(),
        }
    }

    /// Transitive dependencies of the target's module, then the module itself,
    /// the harness runtime and the generator.
    pub fn resolve(
        &self,
        target: &BenchmarkTarget,
        provider: &dyn ModuleProvider,
    ) -> HarnessResult<ReferenceSet> {
        let root = &target.module;
        require_location(root, &target.display_name())?;

        let mut set = ReferenceSet::new();
        let mut visited: HashSet<ModuleRef> = HashSet::from([root.id.clone()]);

        // (reference, requested_by); reversed so declaration order is preserved
        let mut stack: Vec<(ModuleRef, ModuleRef)> = provider
            .dependencies(root)
            .into_iter()
            .rev()
            .map(|dep| (dep, root.id.clone()))
            .collect();

        while let Some((reference, requested_by)) = stack.pop() {
            if !visited.insert(reference.clone()) {
                continue;
            }
            let module = load_required(provider, &reference, requested_by.name())?;
            stack.extend(
                provider
                    .dependencies(&module)
                    .into_iter()
                    .rev()
                    .filter(|dep| !visited.contains(dep))
                    .map(|dep| (dep, reference.clone())),
            );
            debug!(module = %module.id, requested_by = %requested_by, "added transitive reference");
            set.insert(module);
        }

        set.insert(root.clone());
        for fixed in [&self.runtime_module, &self.generator_module] {
            if set.contains(fixed) {
                continue;
            }
            let module = load_required(provider, fixed, "harness toolchain")?;
            debug!(module = %module.id, "added toolchain reference");
            set.insert(module);
        }

        Ok(set)
    }
}

fn load_required(
    provider: &dyn ModuleProvider,
    reference: &ModuleRef,
    requested_by: &str,
) -> HarnessResult<Module> {
    let module = provider
        .load(reference)
        .ok_or_else(|| HarnessError::ReferenceResolution {
            reference: reference.to_string(),
            requested_by: requested_by.to_string(),
            reason: "module not found".into(),
        })?;
    require_location(&module, requested_by)?;
    Ok(module)
}

fn require_location(module: &Module, requested_by: &str) -> HarnessResult<()> {
    if module.location().is_none() {
        return Err(HarnessError::ReferenceResolution {
            reference: module.id.to_string(),
            requested_by: requested_by.to_string(),
            reason: "module has no on-disk location".into(),
        });
    }
    Ok(())
}

/// Module provider backed by a fixed table of modules and their dependencies.
#[derive(Debug, Clone, Default)]
pub struct StaticModuleProvider {
    modules: HashMap<ModuleRef, (Module, Vec<ModuleRef>)>,
}

impl StaticModuleProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module and its declared dependencies.
    pub fn with_module<I, R>(mut self, module: Module, dependencies: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<ModuleRef>,
    {
        self.insert(module, dependencies);
        self
    }

    pub fn insert<I, R>(&mut self, module: Module, dependencies: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<ModuleRef>,
    {
        let deps = dependencies.into_iter().map(Into::into).collect();
        self.modules.insert(module.id.clone(), (module, deps));
    }
}

impl ModuleProvider for StaticModuleProvider {
    fn dependencies(&self, module: &Module) -> Vec<ModuleRef> {
        self.modules
            .get(&module.id)
            .map(|(_, deps)| deps.clone())
            .unwrap_or_default()
    }

    fn load(&self, reference: &ModuleRef) -> Option<Module> {
        self.modules.get(reference).map(|(m, _)| m.clone())
    }
}
