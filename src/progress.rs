//! Progress display module
//!
//! Styled diagnostics, the merge progress bar and the run summary. Everything
//! here writes to stderr; stdout carries only the report.

use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Print a section header
pub fn print_header(text: &str) {
    eprintln!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    eprintln!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    eprintln!("  {} {}", "✔".green(), text.green());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Progress bar counting partial results folded by the merger
pub fn create_merge_progress_bar(sources: u64) -> ProgressBar {
    let pb = ProgressBar::new(sources);

    if let Ok(style) = ProgressStyle::default_bar().template(concat!(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] ",
        "{pos}/{len} sources merged {msg}"
    )) {
        pb.set_style(style.progress_chars("█▓░"));
    }

    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Counters for one pipeline run.
///
/// Owned by the merge coordinator and filled from the partial results as they
/// arrive, so no worker ever touches it.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    pub sources: u64,
    pub words: u64,
    pub bytes: u64,
    pub distinct_keys: u64,
    pub reported_groups: u64,
    /// Sources in the order their partial results were merged
    pub arrival_order: Vec<PathBuf>,
    pub start_time: Instant,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    /// Stats for a run that began at `start_time`
    pub fn started_at(start_time: Instant) -> Self {
        Self {
            sources: 0,
            words: 0,
            bytes: 0,
            distinct_keys: 0,
            reported_groups: 0,
            arrival_order: Vec::new(),
            start_time,
        }
    }

    pub fn record_source(&mut self, source: PathBuf, words: u64, bytes: u64) {
        self.sources += 1;
        self.words += words;
        self.bytes += bytes;
        self.arrival_order.push(source);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn words_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.words as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print the run summary to stderr
    pub fn print_summary(&self) {
        eprintln!();
        eprintln!("{}", "═".repeat(60).green());
        eprintln!("{}", "                    GROUPING COMPLETE".green().bold());
        eprintln!("{}", "═".repeat(60).green());
        eprintln!();

        eprintln!("  {} {}", "Sources merged: ".green(), self.sources);
        eprintln!("  {} {}", "Data read:      ".green(), ByteSize(self.bytes));
        eprintln!("  {} {}", "Words:          ".green(), format_number(self.words));
        eprintln!("  {} {}", "Distinct keys:  ".green(), format_number(self.distinct_keys));
        eprintln!(
            "  {} {}",
            "Groups reported:".green().bold(),
            format_number(self.reported_groups).green().bold()
        );

        eprintln!();
        eprintln!("  {} {}", "Duration:       ".green(), format_duration(self.elapsed()));
        eprintln!("  {} {:.2} words/sec", "Throughput:     ".green(), self.words_per_second());
        eprintln!();
        eprintln!("{}", "═".repeat(60).green());
    }
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousand separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
