//! Command-line interface implementation for plugsmith.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for plugsmith.
#[derive(Parser, Debug)]
#[command(author, version, about = "plugsmith: generate FairDM plugin packages", long_about = None)]
pub struct Args {
    /// Directory the plugin package is generated into, as <OUTPUT_DIR>/<plugin_slug>
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// JSON or YAML file with answers
    #[arg(short, long, value_name = "FILE")]
    pub answers: Option<PathBuf>,

    /// Read a JSON or YAML answer set from stdin
    #[arg(short, long)]
    pub stdin: bool,

    /// Override a single answer, e.g. --set plugin_name="Data Viewer" or
    /// --set register_to_models.sample=yes. Can be repeated.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Never prompt. Missing optional answers take their defaults.
    #[arg(long)]
    pub no_input: bool,

    /// Force overwrite of an existing project directory
    #[arg(short, long)]
    pub force: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 and the help text if required arguments are missing
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
