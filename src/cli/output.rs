//! Output rendering for CLI results
//!
//! Results always reach stdout. Headers and progress messages are dropped
//! under `--quiet`; errors and warnings go to stderr.

use clap::ValueEnum;
use serde::Serialize;

/// Output format for CLI results
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned, human-readable tables (default)
    #[default]
    Table,
    /// JSON output for machine processing
    Json,
    /// Tab-separated text without decoration
    Plain,
}

/// Writes command output according to the global flags
#[derive(Debug, Clone)]
pub struct OutputWriter {
    format: OutputFormat,
    quiet: bool,
    verbose: bool,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, quiet: bool, verbose: bool) -> Self {
        Self {
            format,
            quiet,
            verbose,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Section title; table format only
    pub fn header(&self, title: &str) {
        if self.quiet || self.format != OutputFormat::Table {
            return;
        }
        println!("\n{}", title);
        println!("{}", "=".repeat(title.chars().count()));
    }

    /// Result line
    pub fn print(&self, line: &str) {
        println!("{}", line);
    }

    /// Labelled value, `label: value` in table format and `label\tvalue` in plain
    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        match self.format {
            OutputFormat::Plain => println!("{}\t{}", label, value),
            _ => println!("  {:<24} {}", format!("{}:", label), value),
        }
    }

    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("✓ {}", message);
        }
    }

    pub fn warn(&self, message: &str) {
        eprintln!("warning: {}", message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("error: {}", message);
    }

    /// Pretty-printed JSON on stdout
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Rows under a header; plain format emits tab-separated rows only
    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) {
        if self.format == OutputFormat::Plain {
            for row in rows {
                println!("{}", row.join("\t"));
            }
            return;
        }

        for line in render_table(headers, rows) {
            println!("{}", line);
        }
    }
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            let width = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(width),
                None => widths.push(width),
            }
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str).collect()));
    }
    lines
}
