use anyhow::{Context, Result};
use clap::Parser;
use project_tree::{ParseOptions, ParserRegistry, TreeError};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "project-tree")]
#[command(version, about = "Print the file tree of a .sln, .csproj/.vbproj/.fsproj or .pbxproj project as JSON", long_about = None)]
struct Cli {
    /// Project descriptor to parse
    path: Option<PathBuf>,

    /// Extra folder probed next to managed projects (repeatable)
    #[arg(long = "well-known-dir", value_name = "NAME")]
    well_known_dirs: Vec<String>,

    /// Start from an empty well-known folder list
    #[arg(long)]
    no_default_well_known: bool,

    /// Top-level directory skipped by the managed fallback scan (repeatable)
    #[arg(long = "ignore-dir", value_name = "NAME")]
    ignore_dirs: Vec<String>,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,

    /// Verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> ParseOptions {
        let mut options = ParseOptions::new();
        if self.no_default_well_known {
            options = options.well_known_dirs(Vec::<String>::new());
        }
        for dir in &self.well_known_dirs {
            options = options.add_well_known_dir(dir.clone());
        }
        options.ignored_dirs(self.ignore_dirs.iter().cloned())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let Some(path) = &cli.path else {
        emit(&TreeError::MissingPath.payload(), cli.pretty)?;
        return Ok(ExitCode::FAILURE);
    };

    let registry = ParserRegistry::with_options(cli.options());
    match registry.parse(path) {
        Ok(tree) => {
            emit(&tree, cli.pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            log::error!("{err}");
            emit(&err.payload(), cli.pretty)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Write one JSON document to stdout
fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to encode JSON")?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").context("Failed to write to stdout")?;
    Ok(())
}
