//! Output formatting and styling module.
//!
//! All user-facing terminal output goes through [`OutputFormatter`]:
//! status lines, the progress bar shown while files are moved, and the
//! final report.

use crate::report::SortReport;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeSet, HashMap};

const PROGRESS_TEMPLATE: &str = "{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use file_sorter::output::OutputFormatter;
    /// OutputFormatter::success("Folder sorted");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message to stderr in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for `total` file moves.
    ///
    /// ```no_run
    /// use file_sorter::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    /// Prints the listing part of a report: files per category, then the
    /// known and unknown extension sets.
    pub fn file_listing(report: &SortReport) {
        for (category, names) in &report.files {
            Self::header(&format!("{}:", category.label()));
            for name in names {
                println!(" - {}", name);
            }
        }

        println!();
        println!(
            "{} {}",
            "Known extensions:".bold(),
            Self::join_extensions(&report.known_extensions)
        );
        println!(
            "{} {}",
            "Unknown extensions:".bold(),
            Self::join_extensions(&report.unknown_extensions)
        );
    }

    fn join_extensions(extensions: &BTreeSet<String>) -> String {
        if extensions.is_empty() {
            "none".dimmed().to_string()
        } else {
            extensions.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    }

    /// Prints a full human-readable report.
    pub fn report(report: &SortReport) {
        if report.total_files() == 0 {
            Self::plain("No files found to sort.");
        } else {
            Self::file_listing(report);
        }

        if !report.unpacked.is_empty() {
            Self::header("Unpacked archives:");
            for archive in &report.unpacked {
                Self::success(&format!(
                    "{} → {}/ ({} {})",
                    archive.archive.display(),
                    archive.destination.display(),
                    archive.entries,
                    if archive.entries == 1 { "file" } else { "files" }
                ));
            }
        }

        if !report.warnings.is_empty() {
            Self::header("Warnings:");
            for issue in &report.warnings {
                Self::warning(&format!("{}: {}", issue.path.display(), issue.reason));
            }
        }

        if report.has_failures() {
            Self::header("Failed:");
            for issue in &report.failures {
                Self::error(&format!("{}: {}", issue.path.display(), issue.reason));
            }
        }

        if !report.removed_dirs.is_empty() {
            Self::plain(&format!(
                "\nRemoved {} empty {}.",
                report.removed_dirs.len(),
                if report.removed_dirs.len() == 1 {
                    "folder"
                } else {
                    "folders"
                }
            ));
        }

        if report.total_files() > 0 {
            Self::summary_table(&report.category_counts(), report.total_files());
        }
    }

    /// Prints a summary table with file statistics by category.
    ///
    /// ```no_run
    /// use file_sorter::output::OutputFormatter;
    /// use std::collections::HashMap;
    ///
    /// let mut counts = HashMap::new();
    /// counts.insert("documents".to_string(), 15);
    /// counts.insert("images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &HashMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let mut categories: Vec<_> = category_counts.iter().collect();
        categories.sort_by_key(|&(name, _)| name);

        let max_category_len = categories
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // "Category"

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in &categories {
            let file_word = if **count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word,
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            if total_files == 1 { "file" } else { "files" },
            width = max_category_len
        );
    }
}
