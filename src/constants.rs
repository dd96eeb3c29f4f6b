//! Common constants used throughout blueprint.

/// Name of the configuration file at the project root
pub const CONFIG_FILE: &str = "bp.yaml";

/// Configuration key holding the output directory
pub const BUILD_PATH_KEY: &str = "build_path";

/// Output directory used when `build_path` is not configured
pub const DEFAULT_BUILD_PATH: &str = "build";

/// Ignore file name at the project root
pub const IGNORE_FILE: &str = ".bpignore";

/// Patterns that are always ignored
pub const DEFAULT_IGNORE_PATTERNS: [&str; 2] = ["**/.git/**", "**/.DS_Store"];
