mod commands;
mod helpers;

use clap::Parser;
use mrsim_core::domain::MrsimError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MRSIM_LOG";

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", error.diagnostic_line());
            error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("mrsimulator-rs".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            init_tracing(cli.verbose);
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string().trim_end().to_string())),
        },
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "mrsimulator-rs",
    version,
    about = "Validate and compile NMR simulation inputs"
)]
struct Cli {
    /// Log debug events to stderr (overridden by MRSIM_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Load isotopomers from a local path or URL and print them compiled
    Isotopomers {
        #[arg(value_name = "SOURCE")]
        source: String,
    },
    /// Compile a spectrum configuration file
    Spectrum {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Build a method preset from optional overrides
    Method(commands::MethodArgs),
    /// Print the isotope-property table
    Isotopes,
    /// Print the recognized options of a configuration entity
    Options {
        #[arg(value_enum)]
        entity: commands::OptionEntity,
    },
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Isotopomers { source } => commands::run_isotopomers_command(&source),
        CliCommand::Spectrum { path } => commands::run_spectrum_command(&path),
        CliCommand::Method(args) => commands::run_method_command(args),
        CliCommand::Isotopes => commands::run_isotopes_command(),
        CliCommand::Options { entity } => commands::run_options_command(entity),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Core(#[from] MrsimError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn diagnostic_line(&self) -> String {
        match self {
            Self::Usage(message) => format!("ERROR: [INPUT.CLI_USAGE] {message}"),
            Self::Core(error) => error.diagnostic_line(),
            Self::Internal(error) => format!("ERROR: [IO.CLI] {error:#}"),
        }
    }

    fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::Core(error) => error.exit_code(),
            Self::Internal(_) => 3,
        }
    }
}
