//! Host platform detection.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Host the build script runs on.
///
/// Windows ships the compiler natively; every other host runs it through an
/// interpreter and needs a shebang line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    Windows,
    Unix,
}

impl HostPlatform {
    /// Detect the current host.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        if os == "windows" {
            HostPlatform::Windows
        } else {
            HostPlatform::Unix
        }
    }

    pub fn has_native_compiler(self) -> bool {
        matches!(self, HostPlatform::Windows)
    }

    /// Extension of the generated build script, including the dot.
    pub fn script_extension(self) -> &'static str {
        match self {
            HostPlatform::Windows => ".bat",
            HostPlatform::Unix => ".sh",
        }
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostPlatform::Windows => f.write_str("windows"),
            HostPlatform::Unix => f.write_str("unix"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_os() {
        assert_eq!(HostPlatform::from_os("windows"), HostPlatform::Windows);
        assert_eq!(HostPlatform::from_os("linux"), HostPlatform::Unix);
        assert_eq!(HostPlatform::from_os("macos"), HostPlatform::Unix);
    }

    #[test]
    fn test_script_extension() {
        assert_eq!(HostPlatform::Windows.script_extension(), ".bat");
        assert_eq!(HostPlatform::Unix.script_extension(), ".sh");
    }

    #[test]
    fn test_current_matches_target_os() {
        let host = HostPlatform::current();
        assert_eq!(host.has_native_compiler(), cfg!(windows));
    }
}
