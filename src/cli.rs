//! Command-line interface implementation for blueprint.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for blueprint.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "bp: render a project of templates against its bp.yaml",
    long_about = None
)]
pub struct Args {
    /// Path to the project directory or git repository URL
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Directory the configured build_path is resolved against
    #[arg(value_name = "OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Branch to check out when the project is a git repository
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Fail when a template looks up a configuration key that is not set
    #[arg(long)]
    pub strict: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
