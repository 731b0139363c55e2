//! External compiler toolchain invoked by the generated build script.
//!
//! This module only knows how to spell an invocation. Running the script is
//! the process launcher's job.

use std::borrow::Cow;

use crate::core::{HostPlatform, Platform};
use crate::{HarnessError, HarnessResult};

/// Characters that split or redirect a token in `cmd.exe`.
const WINDOWS_SPECIAL: &[char] = &['&', '|', '<', '>', '^', '(', ')', ',', ';', '='];

pub fn platform_token(platform: Platform) -> &'static str {
    platform.token()
}

/// Names and flag spellings of the compiler toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerToolchain {
    /// Compiler executable name
    pub compiler: String,
    /// Interpreter used to run the compiler on hosts without a native one
    pub interpreter: String,
    /// First line of scripts on interpreter hosts
    pub shebang: String,
}

impl Default for CompilerToolchain {
    fn default() -> Self {
        CompilerToolchain {
            compiler: "csc".to_string(),
            interpreter: "mono".to_string(),
            shebang: "#!/bin/bash".to_string(),
        }
    }
}

impl CompilerToolchain {
    pub fn new(compiler: impl Into<String>, interpreter: impl Into<String>) -> Self {
        CompilerToolchain {
            compiler: compiler.into(),
            interpreter: interpreter.into(),
            ..Default::default()
        }
    }

    /// Text placed before the argument list.
    ///
    /// Empty on hosts with a native compiler; otherwise the shebang line.
    pub fn script_prefix(&self, host: HostPlatform) -> String {
        if host.has_native_compiler() {
            String::new()
        } else {
            format!("{}\n", self.shebang)
        }
    }

    /// Leading tokens that launch the compiler.
    pub fn launcher(&self, host: HostPlatform) -> Vec<String> {
        if host.has_native_compiler() {
            vec![self.compiler.clone()]
        } else {
            vec![self.interpreter.clone(), self.compiler.clone()]
        }
    }

    pub fn no_config_flag(&self) -> &'static str {
        "/noconfig"
    }

    pub fn target_exe_flag(&self) -> &'static str {
        "/target:exe"
    }

    pub fn optimize_flag(&self) -> &'static str {
        "/optimize"
    }

    pub fn unsafe_flag(&self) -> &'static str {
        "/unsafe"
    }

    pub fn platform_flag(&self, platform: Platform) -> String {
        format!("/platform:{}", platform_token(platform))
    }

    pub fn app_config_flag(&self, escaped_path: &str) -> String {
        format!("/appconfig:{escaped_path}")
    }

    pub fn reference_flag(&self, escaped_paths: &[String]) -> String {
        format!("/reference:{}", escaped_paths.join(","))
    }
}

/// Quote `path` for the host's script interpreter if it would not survive
/// whitespace tokenization as-is.
///
/// Batch files expand `%` even inside double quotes, so on Windows every `%`
/// is doubled before quoting.
pub fn escape_path(path: &str, host: HostPlatform) -> HarnessResult<Cow<'_, str>> {
    match host {
        HostPlatform::Windows => {
            let needs_quotes = path.is_empty()
                || path
                    .chars()
                    .any(|c| c.is_whitespace() || WINDOWS_SPECIAL.contains(&c));
            let escaped: Cow<'_, str> = if path.contains('%') {
                Cow::Owned(path.replace('%', "%%"))
            } else {
                Cow::Borrowed(path)
            };
            if needs_quotes {
                Ok(Cow::Owned(format!("\"{escaped}\"")))
            } else {
                Ok(escaped)
            }
        }
        HostPlatform::Unix => shlex::try_quote(path)
            .map_err(|e| HarnessError::Message(format!("cannot quote path {path:?}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_tokens() {
        let tc = CompilerToolchain::default();
        for platform in Platform::ALL {
            assert_eq!(tc.platform_flag(platform), format!("/platform:{platform}"));
        }
        assert_eq!(platform_token(Platform::X64), "x64");
        assert_eq!(platform_token(Platform::AnyCpu), "anycpu");
    }

    #[test]
    fn test_launcher_per_host() {
        let tc = CompilerToolchain::default();
        assert_eq!(tc.launcher(HostPlatform::Windows), vec!["csc"]);
        assert_eq!(tc.launcher(HostPlatform::Unix), vec!["mono", "csc"]);
        assert_eq!(tc.script_prefix(HostPlatform::Windows), "");
        assert_eq!(tc.script_prefix(HostPlatform::Unix), "#!/bin/bash\n");
    }

    #[test]
    fn test_escape_plain_path_is_unchanged() {
        assert_eq!(escape_path("/opt/bin/A.dll", HostPlatform::Unix).unwrap(), "/opt/bin/A.dll");
        assert_eq!(
            escape_path(r"C:\bin\A.dll", HostPlatform::Windows).unwrap(),
            r"C:\bin\A.dll"
        );
    }

    #[test]
    fn test_escape_path_with_spaces() {
        assert_eq!(
            escape_path("/opt/my bin/A.dll", HostPlatform::Unix).unwrap(),
            "'/opt/my bin/A.dll'"
        );
        assert_eq!(
            escape_path(r"C:\Program Files\A.dll", HostPlatform::Windows).unwrap(),
            r#""C:\Program Files\A.dll""#
        );
    }

    #[test]
    fn test_escape_windows_special_chars() {
        assert_eq!(
            escape_path(r"C:\R&D\A.dll", HostPlatform::Windows).unwrap(),
            r#""C:\R&D\A.dll""#
        );
    }

    #[test]
    fn test_escape_windows_doubles_percent() {
        assert_eq!(
            escape_path(r"C:\100%\A.dll", HostPlatform::Windows).unwrap(),
            r"C:\100%%\A.dll"
        );
        assert_eq!(
            escape_path(r"C:\%USERPROFILE% dir\A.dll", HostPlatform::Windows).unwrap(),
            r#""C:\%%USERPROFILE%% dir\A.dll""#
        );
        // Single quotes already keep `%` literal for the shell
        assert_eq!(
            escape_path("/opt/100%/A.dll", HostPlatform::Unix).unwrap(),
            "'/opt/100%/A.dll'"
        );
    }

    #[test]
    fn test_escape_rejects_nul() {
        assert!(escape_path("/bad\0path", HostPlatform::Unix).is_err());
    }
}
