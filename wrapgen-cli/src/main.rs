//! # type-wrapper
//!
//! Generates an accessor wrapper for a Go struct.
//!
//! ```text
//! type-wrapper --type Tester --interface ITester --lock lock ./pkg
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wrapgen::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "type-wrapper", author, version, about = "Go accessor wrapper generator")]
struct Cli {
    /// Name of the struct to wrap.
    #[arg(long = "type", value_name = "NAME")]
    type_name: String,

    /// Wrapper type name [default: <type>Wrapper].
    #[arg(long, value_name = "NAME")]
    wrapper: Option<String>,

    /// Interface listing the generated methods.
    #[arg(long, value_name = "NAME")]
    interface: Option<String>,

    /// Field of the wrapped struct holding a sync.Locker.
    #[arg(long, value_name = "FIELD")]
    lock: Option<String>,

    /// Method receiver name [default: lower-cased first letter of the type].
    #[arg(long, value_name = "NAME")]
    receiver: Option<String>,

    /// Output file, relative to the package directory.
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Generate a Read method emitting the wrapper as JSON.
    #[arg(long)]
    reader: bool,

    /// Getters return the zero value on a nil receiver.
    #[arg(long)]
    nil_safe: bool,

    /// Read a JSON package description instead of parsing Go sources.
    #[arg(long, value_name = "JSON")]
    description: Option<PathBuf>,

    /// Target operating system for file selection [default: host].
    #[arg(long, env = "GOOS", value_name = "OS")]
    goos: Option<String>,

    /// Target architecture for file selection [default: host].
    #[arg(long, env = "GOARCH", value_name = "ARCH")]
    goarch: Option<String>,

    /// Print the generated source instead of writing it.
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Package directory.
    #[arg(default_value = ".")]
    dir: PathBuf,
}

impl Cli {
    fn options(&self) -> GenerationOptions {
        let mut options = GenerationOptions::new(self.type_name.clone())
            .with_reader(self.reader)
            .with_nil_safe(self.nil_safe);
        if let Some(wrapper) = &self.wrapper {
            options = options.with_wrapper(wrapper.clone());
        }
        if let Some(interface) = &self.interface {
            options = options.with_interface(interface.clone());
        }
        if let Some(lock) = &self.lock {
            options = options.with_lock(lock.clone());
        }
        if let Some(receiver) = &self.receiver {
            options = options.with_receiver(receiver.clone());
        }
        if let Some(output) = &self.output {
            options = options.with_output(output.clone());
        }
        options
    }

    fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    fn build_context(&self) -> BuildContext {
        let host = BuildContext::host();
        BuildContext::new(
            self.goos.clone().unwrap_or(host.goos),
            self.goarch.clone().unwrap_or(host.goarch),
        )
    }

    fn load_package(&self) -> Result<Package> {
        let Some(description) = &self.description else {
            return parse_package_with(&self.dir, &self.build_context())
                .with_context(|| format!("failed to load package {}", self.dir.display()));
        };

        let json = fs::read_to_string(description)
            .with_context(|| format!("failed to read {}", description.display()))?;
        let mut package = parse_package_json(&json)
            .with_context(|| format!("invalid package description {}", description.display()))?;
        if package.dir.is_none() {
            package.dir = Some(self.dir.clone());
        }
        Ok(package)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli.options();
    options.validate().context("invalid options")?;

    let package = cli.load_package()?;
    tracing::debug!(
        package = %package.name,
        types = package.types.len(),
        "loaded package"
    );

    if cli.dry_run {
        let output = render(&package, &options)
            .with_context(|| format!("failed to generate wrapper for {}", options.type_name))?;
        print!("{output}");
        return Ok(());
    }

    let path = generate_package(&package, &options, &FsWriter)
        .with_context(|| format!("failed to generate wrapper for {}", options.type_name))?;
    tracing::info!(path = %path.display(), "done");
    Ok(())
}

/// Exit status for an argument error: help and version requests succeed,
/// anything else is a plain failure.
fn parse_failure(err: &clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout, usage errors to stderr.
            let _ = err.print();
            return parse_failure(&err);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
