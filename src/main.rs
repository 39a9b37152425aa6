use clap::Parser;
use file_sorter::cli::{Args, run_cli};
use file_sorter::output::OutputFormatter;
use std::process;

fn main() {
    let args = Args::parse();

    match run_cli(&args) {
        Ok(report) if report.has_failures() => process::exit(1),
        Ok(_) => {}
        Err(e) => {
            OutputFormatter::error(&e);
            process::exit(1);
        }
    }
}
