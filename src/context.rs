//! Template context: read access to the project configuration and the process
//! environment from inside template bodies.

use crate::config::Config;
use crate::constants::{BUILD_PATH_KEY, DEFAULT_BUILD_PATH};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Per-run view of the configuration exposed to templates.
///
/// A context is built once per [`crate::processor::Processor::process`] call and
/// shared by every template rendered in that run. It has no mutating accessors.
#[derive(Debug, Clone)]
pub struct Context {
    config: Config,
    strict: bool,
}

impl Context {
    /// Builds a context from raw configuration text.
    ///
    /// The `build_path` default is registered before the document is read, so an
    /// explicit value in the document always takes precedence.
    pub fn load(content: &str, strict: bool) -> Result<Self> {
        let mut config = Config::new();
        config.set_default(BUILD_PATH_KEY, DEFAULT_BUILD_PATH);
        config.read_str(content)?;
        Ok(Self { config, strict })
    }

    /// Returns the string value at a dotted key, or an empty string.
    pub fn get(&self, key: &str) -> String {
        self.config.get_string(key).unwrap_or_default()
    }

    /// Returns the list of strings at a dotted key, or an empty list.
    pub fn get_strings(&self, key: &str) -> Vec<String> {
        self.config.get_strings(key).unwrap_or_default()
    }

    /// Returns the value of an environment variable, or an empty string.
    pub fn env(&self, name: &str) -> String {
        std::env::var(name).unwrap_or_default()
    }

    /// Whether `key` resolves to a value at all.
    pub fn contains(&self, key: &str) -> bool {
        self.config.lookup(key).is_some()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output directory for this run, resolved against `output_root`.
    pub fn build_root<P: AsRef<Path>>(&self, output_root: P) -> PathBuf {
        output_root.as_ref().join(self.get(BUILD_PATH_KEY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get() {
        let context = Context::load("test: 123\nroot:\n  nested:\n    item: 421\n", false)
            .unwrap();
        assert_eq!(context.get("test"), "123");
        assert_eq!(context.get("root.nested.item"), "421");
        assert_eq!(context.get("absent"), "");
        assert_eq!(context.get("root"), "");
    }

    #[test]
    fn test_get_strings_on_scalar() {
        let context = Context::load("scalar: value", false).unwrap();
        assert!(context.get_strings("scalar").is_empty());
        assert!(context.get_strings("absent").is_empty());
    }

    #[test]
    fn test_env_reads_at_call_time() {
        let context = Context::load("", false).unwrap();
        std::env::remove_var("BLUEPRINT_CONTEXT_TEST");
        assert_eq!(context.env("BLUEPRINT_CONTEXT_TEST"), "");
        std::env::set_var("BLUEPRINT_CONTEXT_TEST", "later");
        assert_eq!(context.env("BLUEPRINT_CONTEXT_TEST"), "later");
        std::env::remove_var("BLUEPRINT_CONTEXT_TEST");
    }

    #[test]
    fn test_build_root() {
        let context = Context::load("", false).unwrap();
        assert_eq!(context.build_root("/out"), PathBuf::from("/out/build"));

        let context = Context::load("build_path: dist", false).unwrap();
        assert_eq!(context.build_root("/out"), PathBuf::from("/out/dist"));

        let context = Context::load("build_path: build", false).unwrap();
        assert_eq!(context.build_root("/out"), PathBuf::from("/out/build"));
    }

    #[test]
    fn test_parse_error_is_returned() {
        assert!(Context::load("- not\n- a mapping\n", false).is_err());
    }
}
