//! plugsmith's application entry point.
//! Collects the answer set from its sources, then runs the generation pipeline.

use anyhow::Context as _;
use plugsmith::{
    answers::Answers,
    blueprint::Blueprint,
    cli::{get_args, Args},
    error::{default_error_handler, Error, Result},
    processor::Processor,
    prompt::{fill_missing, DialoguerPrompter},
    renderer::MiniJinjaRenderer,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Merges answers from every source. Later sources win: file, stdin, `--set`.
fn collect_answers(args: &Args) -> anyhow::Result<Answers> {
    let mut answers = Answers::new();
    if let Some(path) = &args.answers {
        answers.merge(
            Answers::from_file(path)
                .with_context(|| format!("reading answers file '{}'", path.display()))?,
        );
    }
    if args.stdin {
        answers.merge(Answers::from_reader(std::io::stdin()).context("reading answers from stdin")?);
    }
    for pair in &args.overrides {
        answers.set_pair(pair).with_context(|| format!("parsing --set {pair}"))?;
    }
    Ok(answers)
}

/// Main application logic execution.
///
/// # Flow
/// 1. Collects answers from the answers file, stdin and `--set` overrides
/// 2. Prompts for anything still missing unless `--no-input` is given
/// 3. Normalizes, plans, renders and writes the package
/// 4. Removes stale conditional artifacts from the project directory
fn run(args: Args) -> Result<()> {
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();

    let answers = collect_answers(&args).map_err(|e| Error::AnswersError(format!("{e:#}")))?;
    let answers = if args.no_input || args.stdin {
        answers
    } else {
        fill_missing(&renderer, &DialoguerPrompter::new(), answers)?
    };

    let processor = Processor::new(&renderer, &blueprint);
    let outcome = processor.generate(&answers, &args.output_dir, args.force)?;

    for path in &outcome.written {
        println!("Written: '{}'", path.display());
    }
    for path in &outcome.removed {
        println!("Removed: '{}'", path.display());
    }
    println!("Plugin generated successfully in {}.", outcome.project_dir.display());
    Ok(())
}
