use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::ErrorCode;

/// File name looked up in the project root.
pub const CONFIG_FILE: &str = "rime.toml";

/// Compiler options, read from `rime.toml` and the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Log the per-module summary at `info` instead of `debug`.
    #[serde(default)]
    pub verbose: bool,
    /// Dump every graph edge while resolving.
    #[serde(default)]
    pub debug: bool,
    /// Attach a [`ModuleDescriptor`](crate::descriptor::ModuleDescriptor) to
    /// each resolved module.
    #[serde(default = "default_true")]
    pub generate_descriptor: bool,
    /// Module version this compiler accepts from component modules.
    #[serde(default = "default_supported_version")]
    pub supported_version: u32,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            debug: false,
            generate_descriptor: default_true(),
            supported_version: default_supported_version(),
        }
    }
}

impl CompilerConfig {
    /// Apply `RIME_VERBOSE` and `RIME_DEBUG` on top of the file values.
    #[must_use]
    pub fn apply_env(self) -> Self {
        let verbose = env::var("RIME_VERBOSE").ok();
        let debug = env::var("RIME_DEBUG").ok();
        self.apply_overrides(verbose.as_deref(), debug.as_deref())
    }

    fn apply_overrides(mut self, verbose: Option<&str>, debug: Option<&str>) -> Self {
        if let Some(flag) = verbose.and_then(parse_flag) {
            self.verbose = flag;
        }
        if let Some(flag) = debug.and_then(parse_flag) {
            self.debug = flag;
        }
        self
    }
}

/// Load `rime.toml` from `project_root`, falling back to defaults when the
/// file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(project_root: &Path) -> Result<CompilerConfig> {
    let path = project_root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(CompilerConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<CompilerConfig>(&content).with_context(|| {
        let code = ErrorCode::ConfigParseError;
        format!("{code} {}: {}", code.message(), path.display())
    })
}

/// Load `rime.toml` from `project_root` and apply the environment overrides.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn resolve_config(project_root: &Path) -> Result<CompilerConfig> {
    Ok(load_config(project_root)?.apply_env())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

const fn default_true() -> bool {
    true
}

const fn default_supported_version() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config(dir.path()).expect("load");
        assert_eq!(config, CompilerConfig::default());
        assert!(config.generate_descriptor);
        assert_eq!(config.supported_version, 1);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE), "verbose = true\n").expect("write");

        let config = load_config(dir.path()).expect("load");
        assert!(config.verbose);
        assert!(!config.debug);
        assert!(config.generate_descriptor);
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE), "verbose = \"maybe\"\n").expect("write");

        let err = load_config(dir.path()).expect_err("should fail");
        let message = err.to_string();
        assert!(message.contains("rime.toml"));
        assert!(message.starts_with("E1001 Config file parse error"));
    }

    #[test]
    fn overrides_accept_common_spellings() {
        let config = CompilerConfig::default()
            .apply_overrides(Some("YES"), Some(" 1 "));
        assert!(config.verbose);
        assert!(config.debug);

        let config = config.apply_overrides(Some("off"), Some("garbage"));
        assert!(!config.verbose);
        assert!(config.debug, "unparseable values leave the setting alone");
    }
}
