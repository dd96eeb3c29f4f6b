//! Blueprint is a project scaffolding engine.
//! It renders every file of a project against the project's `bp.yaml`
//! configuration and writes the results under a build directory, mirroring
//! the project layout.

/// Command-line interface module for the `bp` binary
pub mod cli;

/// YAML configuration document with dotted key lookups
pub mod config;

/// Common constants: reserved file names and keys
pub mod constants;

/// Read-only configuration and environment access for templates
pub mod context;

/// Error types and handling for blueprint
pub mod error;

/// File ignore patterns
/// Processes the `.bpignore` file to exclude specific paths
pub mod ignore;

/// Logger setup for the `bp` binary
pub mod logger;

/// Core rendering loop
/// Combines provider, context and renderer to generate the build directory
pub mod processor;

/// Project sources: local directories and git repositories
pub mod provider;

/// Template compilation and rendering
pub mod renderer;
