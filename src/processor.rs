//! Core rendering loop.
//! Loads the project configuration into a [`Context`] and renders every file
//! the provider yields into the build directory, mirroring the project layout.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::provider::ProjectProvider;
use crate::renderer::MiniJinjaRenderer;
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Renders the project supplied by a provider.
///
/// A processor holds no state between runs: every call to [`Processor::process`]
/// loads a fresh context, so the same processor can be run repeatedly.
pub struct Processor<'a> {
    provider: &'a dyn ProjectProvider,
    output_root: PathBuf,
    strict: bool,
}

impl<'a> Processor<'a> {
    /// Creates a processor writing below `output_root`.
    ///
    /// The build directory is the configured `build_path` resolved against
    /// `output_root`.
    pub fn new<P: Into<PathBuf>>(provider: &'a dyn ProjectProvider, output_root: P) -> Self {
        Self { provider, output_root: output_root.into(), strict: false }
    }

    /// Fail templates that look up configuration keys that are not set.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Loads the configuration and renders every project file.
    ///
    /// # Returns
    /// * `Result<Vec<PathBuf>>` - Paths of the written files, in rendering order
    ///
    /// # Errors
    /// The first error raised stops the run. Files written before it are kept.
    pub fn process(&self) -> Result<Vec<PathBuf>> {
        debug!("Loading configuration...");
        let raw_config = self.provider.read_config()?;
        let context = Arc::new(Context::load(&raw_config, self.strict)?);

        let build_root = context.build_root(&self.output_root);
        let renderer = MiniJinjaRenderer::new(Arc::clone(&context));
        debug!("Rendering project into {}", build_root.display());

        let mut written = Vec::new();
        // The build root may live inside a local project; its files are never sources.
        self.provider.process_files_except(
            &build_root,
            &mut |dir: &Path, name: &str, content: &str| {
                let target = render_file(&renderer, &build_root, dir, name, content)?;
                written.push(target);
                Ok(())
            },
        )?;

        info!("Rendered {} files into {}", written.len(), build_root.display());
        Ok(written)
    }
}

/// Renders the project supplied by `provider` below `output_root`.
pub fn process<P: Into<PathBuf>>(
    provider: &dyn ProjectProvider,
    output_root: P,
) -> Result<Vec<PathBuf>> {
    Processor::new(provider, output_root).process()
}

fn render_file(
    renderer: &MiniJinjaRenderer,
    build_root: &Path,
    dir: &Path,
    name: &str,
    content: &str,
) -> Result<PathBuf> {
    let template = renderer.compile(name, content)?;

    let target_dir = build_root.join(dir);
    fs::create_dir_all(&target_dir).map_err(|source| Error::OutputWriteError {
        path: target_dir.display().to_string(),
        source,
    })?;

    let target = target_dir.join(name);
    debug!("Writing file: {}", target.display());

    let file = File::create(&target).map_err(|source| Error::OutputWriteError {
        path: target.display().to_string(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    template.render_to(&mut writer, &target)?;
    writer.flush().map_err(|source| Error::OutputWriteError {
        path: target.display().to_string(),
        source,
    })?;

    Ok(target)
}
