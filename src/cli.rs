//! Command-line interface module for file-sorter.
//!
//! This module handles:
//! - Argument parsing
//! - Configuration loading and command-line overrides
//! - Driving a [`Sorter`] run with a progress bar
//! - Printing the report, either for humans or as JSON

use crate::config::SorterConfig;
use crate::output::OutputFormatter;
use crate::report::SortReport;
use crate::sorter::Sorter;
use clap::{ArgAction, Parser};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

/// Sort a folder into category subfolders by file extension.
///
/// Files are moved into images/, video/, documents/, audio/, archives/ and
/// unknown/ directly under DIRECTORY. Names are transliterated from
/// Cyrillic to Latin and every other non-alphanumeric character becomes
/// an underscore.
#[derive(Parser, Debug, Clone)]
#[command(name = "file-sorter")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Folder to sort
    pub directory: PathBuf,

    /// Show what would be moved without touching any file
    #[arg(short = 'n', long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Leave archives packed after moving them
    #[arg(long = "no-unpack", action = ArgAction::SetTrue)]
    pub no_unpack: bool,

    /// Do not remove folders left empty after sorting
    #[arg(long = "keep-empty-dirs", action = ArgAction::SetTrue)]
    pub keep_empty_dirs: bool,

    /// Print the report as JSON instead of text
    #[arg(long = "json", action = ArgAction::SetTrue)]
    pub json: bool,
}

impl Args {
    /// Arguments for a plain run over `directory`.
    pub fn for_directory(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            dry_run: false,
            config: None,
            no_unpack: false,
            keep_empty_dirs: false,
            json: false,
        }
    }
}

/// Runs the CLI application with parsed arguments.
///
/// # Examples
///
/// ```no_run
/// use file_sorter::cli::{run_cli, Args};
/// use std::path::Path;
///
/// let mut args = Args::for_directory(Path::new("/path/to/Downloads"));
/// args.dry_run = true;
/// match run_cli(&args) {
///     Ok(report) => println!("{} files", report.total_files()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(args: &Args) -> Result<SortReport, String> {
    let config = SorterConfig::load(args.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    run_cli_with_config(args, &config)
}

/// Runs the CLI application with an already loaded configuration.
///
/// Command-line switches take precedence over the `[options]` table.
pub fn run_cli_with_config(args: &Args, config: &SorterConfig) -> Result<SortReport, String> {
    let mut options = config.options.clone();
    if args.no_unpack {
        options.unpack_archives = false;
    }
    if args.keep_empty_dirs {
        options.remove_empty_dirs = false;
    }

    let sorter = Sorter::new(&args.directory, config)
        .map_err(|e| e.to_string())?
        .with_options(options);

    sort_directory(&sorter, args.dry_run, args.json)
}

/// Sorts (or simulates sorting) one folder and prints the outcome.
fn sort_directory(sorter: &Sorter, dry_run: bool, json: bool) -> Result<SortReport, String> {
    let base_path = sorter.base_path();
    if !json {
        if dry_run {
            OutputFormatter::dry_run_notice(&format!(
                "Analyzing contents of: {}",
                base_path.display()
            ));
        } else {
            OutputFormatter::info(&format!("Sorting contents of: {}", base_path.display()));
        }
    }

    let plan = sorter
        .plan()
        .map_err(|e| format!("Error scanning {}: {}", base_path.display(), e))?;

    let pb = if json || dry_run {
        ProgressBar::hidden()
    } else {
        OutputFormatter::create_progress_bar(plan.moves.len() as u64)
    };
    let report = sorter.execute(plan, dry_run, |planned| {
        pb.set_message(planned.new_name());
        pb.inc(1);
    });
    pb.finish_and_clear();

    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Error serializing report: {}", e))?;
        println!("{}", text);
        return Ok(report);
    }

    OutputFormatter::report(&report);

    if dry_run {
        println!();
        OutputFormatter::dry_run_notice("No files were modified.");
        OutputFormatter::plain(&format!(
            "Run 'file-sorter {}' (without --dry-run) to sort the folder.",
            base_path.display()
        ));
    } else if report.has_failures() {
        OutputFormatter::warning("Some files could not be moved. Please review errors above.");
    } else {
        println!();
        OutputFormatter::success("Sorting complete!");
    }

    Ok(report)
}
