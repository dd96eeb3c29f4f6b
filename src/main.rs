//! `bp` entry point.
//! Parses the command line, picks the project provider and runs the processor.

use blueprint::{
    cli::{get_args, Args},
    error::{default_error_handler, Result},
    logger::init_logger,
    processor::Processor,
    provider::get_provider,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Resolves the project provider (cloning git sources)
/// 2. Loads the configuration and renders every project file
/// 3. Reports the written files
fn run(args: Args) -> Result<()> {
    let provider = get_provider(&args.project, args.branch.as_deref())?;

    let written = Processor::new(&*provider, args.output_dir).strict(args.strict).process()?;
    for target in &written {
        println!("Rendered: '{}'", target.display());
    }

    println!("Project generation completed successfully, {} files written.", written.len());
    Ok(())
}
