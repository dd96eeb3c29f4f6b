//! Template renderer for blueprint.
//! Wraps a MiniJinja environment carrying the context functions (`Get`,
//! `GetStrings`, `Env`) and renders project files into writers.
use crate::context::Context;
use crate::error::{Error, Result};
use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior, Value};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

type FunctionResult<T> = std::result::Result<T, minijinja::Error>;

/// Names of the functions every template can call.
const FUNCTION_NAMES: [&str; 3] = ["Get", "GetStrings", "Env"];

/// MiniJinja-based renderer bound to the context of one run.
pub struct MiniJinjaRenderer {
    /// Environment holding the context functions
    env: Environment<'static>,
    /// Configuration exposed as plain template variables
    variables: Value,
}

/// A project file compiled into a template, ready to be executed.
pub struct CompiledTemplate<'r> {
    renderer: &'r MiniJinjaRenderer,
    env: Environment<'static>,
    name: String,
}

impl MiniJinjaRenderer {
    /// Creates a renderer whose templates all read from `context`.
    pub fn new(context: Arc<Context>) -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        // Project files are emitted verbatim whatever their extension.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        if context.is_strict() {
            env.set_undefined_behavior(UndefinedBehavior::Strict);
        }

        let ctx = Arc::clone(&context);
        env.add_function("Get", move |key: String| -> FunctionResult<String> {
            require_key(&ctx, &key)?;
            Ok(ctx.get(&key))
        });

        let ctx = Arc::clone(&context);
        env.add_function("GetStrings", move |key: String| -> FunctionResult<Vec<String>> {
            require_key(&ctx, &key)?;
            Ok(ctx.get_strings(&key))
        });

        let ctx = Arc::clone(&context);
        env.add_function("Env", move |name: String| ctx.env(&name));

        let mut merged = context.config().merged();
        // Template variables shadow globals, so the function names stay reserved.
        if let Some(values) = merged.as_object_mut() {
            for name in FUNCTION_NAMES {
                values.remove(name);
            }
        }
        let variables = Value::from_serialize(merged);
        Self { env, variables }
    }

    /// Compiles `source` into a template registered under `name`.
    ///
    /// # Errors
    /// * `Error::TemplateCompileError` if the source is not a valid template
    pub fn compile(&self, name: &str, source: &str) -> Result<CompiledTemplate<'_>> {
        let mut env = self.env.clone();
        env.add_template_owned(name.to_string(), source.to_string()).map_err(|source| {
            Error::TemplateCompileError { name: name.to_string(), source }
        })?;

        Ok(CompiledTemplate { renderer: self, env, name: name.to_string() })
    }

    /// Compiles and renders `source` into a string.
    pub fn render(&self, name: &str, source: &str) -> Result<String> {
        let mut out = Vec::new();
        self.compile(name, source)?.render_to(&mut out, Path::new(name))?;
        String::from_utf8(out).map_err(|e| Error::TemplateExecutionError {
            name: name.to_string(),
            source: minijinja::Error::new(ErrorKind::BadSerialization, e.to_string()),
        })
    }
}

impl CompiledTemplate<'_> {
    /// Executes the template, streaming the output into `out`.
    ///
    /// # Errors
    /// * `Error::OutputWriteError` if writing into `out` fails; `target` names the destination
    /// * `Error::TemplateExecutionError` for any other rendering failure
    pub fn render_to<W: Write>(&self, out: W, target: &Path) -> Result<()> {
        let template = self.env.get_template(&self.name).map_err(|source| {
            Error::TemplateExecutionError { name: self.name.clone(), source }
        })?;

        match template.render_to_write(&self.renderer.variables, out) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::WriteFailure => Err(Error::OutputWriteError {
                path: target.display().to_string(),
                source: io::Error::other(e),
            }),
            Err(source) => {
                Err(Error::TemplateExecutionError { name: self.name.clone(), source })
            }
        }
    }
}

fn require_key(context: &Context, key: &str) -> FunctionResult<()> {
    if context.is_strict() && !context.contains(key) {
        return Err(minijinja::Error::new(
            ErrorKind::UndefinedError,
            format!("configuration key '{key}' is not set"),
        ));
    }
    Ok(())
}
