//! Core types for harness generation.
//!
//! Plain data handed in by the discovery subsystem (targets, jobs) and the
//! artifact layout derived from it. Nothing here touches the file system
//! except [`ArtifactsPaths::ensure_writable`].

pub mod env;
pub mod job;
pub mod paths;
pub mod target;

// Re-export key types for convenience
pub use env::HostPlatform;
pub use job::{
    Characteristic, CharacteristicValue, DefaultResolver, JobConfiguration, Platform, Resolver,
};
pub use paths::{ArtifactPathResolver, ArtifactsPaths, DEFAULT_PROGRAM_NAME};
pub use target::{BenchmarkTarget, Module, ModuleRef};
