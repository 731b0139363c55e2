//! Engine module: produces everything needed to compile a benchmark harness.
//!
//! # Architecture
//!
//! - **references**: the reference closure of the target's module, walked over a
//!   `ModuleProvider` so any module-loading mechanism can back it.
//! - **cleanup**: deletion of the previous run's artifacts under a bounded retry.
//! - **toolchain**: how the external compiler is spelled (flags, platform tokens,
//!   path quoting per host).
//! - **script**: the build script itself.
//! - **app_config**: the runtime configuration artifact handed to the compiler.
//!
//! The `workflow` submodule runs them in order for one benchmark target.
//!
//! # Boundaries
//!
//! - Nothing here runs the build script or parses compiler output.
//! - Components exchange plain data; none reaches into another's internals.

pub mod app_config;
pub mod cleanup;
pub mod references;
pub mod script;
pub mod toolchain;
pub mod workflow;

// Re-export key types for convenience
pub use app_config::AppConfigWriter;
pub use cleanup::{
    ArtifactCleaner, FsRemover, RecordingSleeper, Remover, RetryExhausted, RetryPolicy, Sleeper,
    ThreadSleeper, retry_with_backoff,
};
pub use references::{ModuleProvider, ReferenceClosureResolver, ReferenceSet, StaticModuleProvider};
pub use script::{BuildScriptGenerator, GeneratedScript};
pub use toolchain::{CompilerToolchain, escape_path, platform_token};
pub use workflow::{GenerateInputs, GenerationOutcome, clean, generate};
