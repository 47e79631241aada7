//! Process-wide configuration for call-stack capture and formatting.
//!
//! A [`Config`] bundles every tunable the capture and formatting pipeline
//! reads: the file-path prefix trimmed from rendered frames, the frame-count
//! bound, the per-parameter rendering length bound, and the two pluggable
//! formatting hooks. Entry points that consult configuration come in pairs,
//! a `*_with(&Config, …)` variant and a convenience variant reading the
//! process-wide instance returned by [`Config::global`].
//!
//! The process-wide instance follows a set-once-at-init convention:
//! call [`Config::install`] before any error is created or rendered.
//! Installation after the first read fails instead of racing.

use std::fmt;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};
use std::sync::OnceLock;

use crate::format::{default_format_function_call, Param};

/// Renders one captured parameter value into text.
///
/// The default is plain `Debug` formatting. Replace it to customize how
/// parameter values appear in error call stacks.
pub type PrinterFn = fn(&dyn fmt::Debug) -> String;

/// Renders a function call plus its parameters into one line of
/// call-stack text. The default produces `function(param1, param2, …)`.
pub type FormatFunctionCallFn = fn(&Config, &str, &[Param]) -> String;

static GLOBAL: OnceLock<Config> = OnceLock::new();

/// Configuration for capture and formatting.
///
/// All nodes created by this crate are immutable, so the only shared state
/// is this configuration. It is expected to be installed once during process
/// initialization before concurrent use; [`Config::install`] enforces that
/// by refusing to replace an instance that has already been read.
#[derive(Debug, Clone)]
pub struct Config {
    /// Trimmed from the beginning of every rendered call-stack file path.
    /// Defaults to the build-environment path of the enclosing workspace,
    /// or empty if it cannot be discovered.
    pub trim_file_path_prefix: String,

    /// Maximum number of frame addresses captured per call stack.
    pub max_call_stack_frames: usize,

    /// Maximum length in bytes for a single rendered parameter value.
    /// Longer renderings are cut at a character boundary and suffixed
    /// with `…(TRUNCATED)`.
    pub format_param_max_len: usize,

    /// Hook used to render non-secret parameter values.
    pub printer: PrinterFn,

    /// Hook used to render a function call with its parameters.
    pub format_function_call: FormatFunctionCallFn,
}

impl Config {
    /// A configuration with all defaults.
    pub fn new() -> Self {
        Config {
            trim_file_path_prefix: default_trim_file_path_prefix(),
            max_call_stack_frames: 32,
            format_param_max_len: 5000,
            printer: default_printer,
            format_function_call: default_format_function_call,
        }
    }

    /// The process-wide configuration, initialized with defaults on
    /// first access if none was installed.
    pub fn global() -> &'static Config {
        GLOBAL.get_or_init(Config::new)
    }

    /// Install `self` as the process-wide configuration.
    ///
    /// Fails if a configuration was already installed, or if
    /// [`Config::global`] was already read (which installs the defaults).
    pub fn install(self) -> Result<(), AlreadyInstalled> {
        GLOBAL.set(self).map_err(AlreadyInstalled)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Returned by [`Config::install`] when the process-wide configuration
/// was already fixed. Carries the rejected configuration.
#[derive(Debug, thiserror::Error)]
#[error("process-wide configuration already installed")]
pub struct AlreadyInstalled(pub Config);

fn default_printer(value: &dyn fmt::Debug) -> String {
    format!("{value:?}")
}

/// Discovers the build-environment prefix of this workspace from the
/// crate's own manifest path, using the last `crates` directory component
/// as sentinel. Degrades to an empty string when the sentinel is absent
/// (for example when building from a registry checkout).
fn default_trim_file_path_prefix() -> String {
    prefix_before_crates_dir(env!("CARGO_MANIFEST_DIR"))
}

fn prefix_before_crates_dir(manifest_dir: &str) -> String {
    let components: Vec<Component<'_>> = Path::new(manifest_dir).components().collect();
    // whole components only, so a directory like "crates-fan" cannot match
    let Some(sentinel) = components.iter().rposition(|c| c.as_os_str() == "crates") else {
        return String::new();
    };
    let prefix: PathBuf = components[..sentinel].iter().collect();
    let mut prefix = prefix.to_string_lossy().into_owned();
    if !prefix.is_empty() && !prefix.ends_with(MAIN_SEPARATOR) {
        prefix.push(MAIN_SEPARATOR);
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new();
        assert_eq!(config.max_call_stack_frames, 32);
        assert_eq!(config.format_param_max_len, 5000);
    }

    #[test]
    fn default_printer_uses_debug() {
        let config = Config::new();
        assert_eq!((config.printer)(&42), "42");
        assert_eq!((config.printer)(&"x"), "\"x\"");
    }

    #[test]
    fn trim_prefix_ends_before_crates_dir() {
        let prefix = default_trim_file_path_prefix();
        // This test runs from the workspace checkout, so the sentinel exists.
        let manifest_dir = env!("CARGO_MANIFEST_DIR");
        assert!(manifest_dir.starts_with(&prefix));
        assert!(manifest_dir[prefix.len()..].starts_with("crates"));
    }

    #[test]
    fn trim_prefix_matches_whole_components_only() {
        assert_eq!(
            prefix_before_crates_dir("/home/crates-fan/errstack/crates/errstack"),
            "/home/crates-fan/errstack/"
        );
        assert_eq!(prefix_before_crates_dir("/registry/errstack-0.1.0"), "");
    }
}
