//! Command-line interface for docstrings-complete.

use clap::{Parser, Subcommand};
use globset::GlobSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::analysis::registered_extensions;
use crate::config::{Config, ConstructorExemption, CONFIG_FILE_NAMES};
use crate::detect::{Runner, ViolationCode};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["venv", ".venv", "__pycache__", "node_modules"];

/// Check that Python docstrings are complete.
///
/// Every function, method and class docstring is cross-checked against the
/// code: arguments, return and yield values, raised exceptions and class
/// attributes must all be documented, and nothing else may be.
#[derive(Parser)]
#[command(name = "docstrings-complete")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint Python files or directories
    #[command(visible_alias = "check")]
    Lint(LintArgs),
    /// Write the default configuration file
    Init(InitArgs),
    /// List every violation code
    Codes,
}

/// Arguments for the lint command.
#[derive(Parser, Default)]
pub struct LintArgs {
    /// Files or directories to check
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, or sarif
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Worker threads (1 lints sequentially)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Show suppressed violations in output
    #[arg(long)]
    pub show_suppressed: bool,

    /// Files whose base name matches are test files
    #[arg(long)]
    pub test_filename_pattern: Option<String>,

    /// Functions in test files whose name matches are skipped
    #[arg(long)]
    pub test_function_pattern: Option<String>,

    /// Files whose base name matches are fixture files
    #[arg(long)]
    pub fixture_filename_pattern: Option<String>,

    /// Decorators marking fixtures
    #[arg(long)]
    pub fixture_decorator_pattern: Option<String>,

    /// When `__init__` is exempt from documentation
    #[arg(long, value_enum)]
    pub constructor_exemption: Option<ConstructorExemption>,

    /// Arguments starting with `_` need not be documented
    #[arg(long)]
    pub private_args_optional: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = CONFIG_FILE_NAMES[0])]
    pub output: PathBuf,
}

/// Load the configuration and apply command-line overrides.
pub fn resolve_config(args: &LintArgs) -> anyhow::Result<(Config, Option<PathBuf>)> {
    let config_path = match &args.config {
        Some(p) => Some(p.clone()),
        None => Config::discover(Path::new(".")),
    };

    let mut config = match &config_path {
        Some(p) => {
            tracing::debug!(config = %p.display(), "loading configuration");
            Config::parse_file(p)?
        }
        None => Config::default(),
    };

    if let Some(p) = &args.test_filename_pattern {
        config.test_filename_pattern = p.clone();
    }
    if let Some(p) = &args.test_function_pattern {
        config.test_function_pattern = p.clone();
    }
    if let Some(p) = &args.fixture_filename_pattern {
        config.fixture_filename_pattern = p.clone();
    }
    if let Some(p) = &args.fixture_decorator_pattern {
        config.fixture_decorator_pattern = p.clone();
    }
    if let Some(exemption) = args.constructor_exemption {
        config.constructor_exemption = exemption;
    }
    if args.private_args_optional {
        config.private_args_optional = true;
    }

    config.validate()?;
    Ok((config, config_path))
}

/// Collect Python files under a directory.
pub fn collect_files(root: &Path, excluded: &GlobSet) -> anyhow::Result<Vec<PathBuf>> {
    let extensions = registered_extensions();
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref())
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !extensions.iter().any(|e| e == ext) {
            continue;
        }
        if excluded.is_match(path) {
            tracing::debug!(file = %path.display(), "excluded by configuration");
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Run the lint command.
pub fn run_lint(args: &LintArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" && args.format != "sarif" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty', 'json', or 'sarif'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let (config, config_path) = match resolve_config(args) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    let excluded = config.excluded_matcher()?;

    let mut files = Vec::new();
    for path in &args.paths {
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("Error: cannot access path {:?}: {}", path, e);
                return Ok(EXIT_ERROR);
            }
        };
        if metadata.is_dir() {
            files.extend(collect_files(path, &excluded)?);
        } else {
            files.push(path.clone());
        }
    }

    if files.is_empty() {
        eprintln!("Warning: no files to scan");
        return Ok(EXIT_SUCCESS);
    }
    tracing::debug!(files = files.len(), "collected files");

    let runner = Runner::new(&config)?.jobs(args.jobs);
    let result = runner.run(&files);

    let path_str = args
        .paths
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let config_str = config_path.map(|p| p.to_string_lossy().to_string());

    match args.format.as_str() {
        "json" => report::write_json(&path_str, config_str.as_deref(), &result)?,
        "sarif" => {
            let base = match args.paths.as_slice() {
                [single] => single.clone(),
                _ => PathBuf::from("."),
            };
            report::write_sarif(&base, &config.docs_base_url, &result)?;
        }
        _ => report::write_pretty(&path_str, &result, args.show_suppressed),
    }

    if result.has_violations() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    let content = Config::default().to_yaml()?;
    if let Err(e) = std::fs::write(&args.output, content) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!(
        "  2. Run: docstrings-complete lint . --config {}",
        args.output.display()
    );

    Ok(EXIT_SUCCESS)
}

/// Run the codes command.
pub fn run_codes() -> anyhow::Result<i32> {
    println!("Violation codes:");
    println!();
    for code in ViolationCode::ALL {
        println!("  {}  {}", code, code.summary());
    }
    Ok(EXIT_SUCCESS)
}
