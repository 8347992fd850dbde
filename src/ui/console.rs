// Console Reporter
// Prints pipeline progress, the sync report and the execution summary

use crossterm::style::{StyledContent, Stylize};
use std::fmt::Display;
use std::io::{self, IsTerminal, Stdout, Write};
use std::path::Path;
use tracing::warn;

use crate::core::Reporter;
use crate::operations::{Manifest, SyncError, SyncOperation, SyncSummary};
use crate::render::{print_report_inline, report_lines, report_rows};

/// Reporter that writes human-readable output
pub struct ConsoleReporter<W: Write> {
    out: W,
    color: bool,
    inline_table: bool,
}

impl ConsoleReporter<Stdout> {
    /// Reporter on stdout, with colors and an inline table when attached to a terminal
    pub fn stdout() -> Self {
        let terminal = io::stdout().is_terminal();
        Self {
            out: io::stdout(),
            color: terminal,
            inline_table: terminal,
        }
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Plain-text reporter over any writer
    pub fn new(out: W) -> Self {
        Self {
            out,
            color: false,
            inline_table: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint<D: Display>(&self, content: StyledContent<D>) -> String {
        if self.color {
            content.to_string()
        } else {
            content.content().to_string()
        }
    }

    fn emit(&mut self, line: impl Display) {
        if let Err(err) = writeln!(self.out, "{line}") {
            warn!(error = %err, "Failed to write console output");
        }
    }

    fn flush(&mut self) {
        if let Err(err) = self.out.flush() {
            warn!(error = %err, "Failed to flush console output");
        }
    }

    fn print_table(&mut self, operations: &[SyncOperation]) {
        let rows = report_rows(operations);

        if self.inline_table {
            self.flush();
            match print_report_inline(&rows) {
                Ok(()) => return,
                Err(err) => warn!(error = %err, "Falling back to plain report"),
            }
        }

        for line in report_lines(&rows) {
            self.emit(line);
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn comparing(&mut self, first: &Path, second: &Path) {
        let title = self.paint("Comparing Directories".yellow().bold());
        let first = self.paint(first.display().to_string().cyan());
        let second = self.paint(second.display().to_string().cyan());
        self.emit(title);
        self.emit(format!("  Source (DIR 1): {first}"));
        self.emit(format!("  Target (DIR 2): {second}"));
    }

    fn scanned(&mut self, manifest: &Manifest) {
        if manifest.skipped().is_empty() {
            return;
        }
        let message = format!(
            "Warning: skipped {} unreadable entries under '{}'",
            manifest.skipped().len(),
            manifest.root().display()
        );
        let line = self.paint(message.dark_yellow());
        self.emit(line);
    }

    fn plan_ready(&mut self, operations: &[SyncOperation]) {
        self.emit("");
        if operations.is_empty() {
            let line = self.paint("✅ Directories are perfectly in sync!".green().bold());
            self.emit(line);
            return;
        }
        self.print_table(operations);
    }

    fn dry_run(&mut self) {
        let banner = self.paint("-- Dry Run Mode --".yellow().bold());
        self.emit("");
        self.emit(format!("{banner} No files were changed."));
    }

    fn aborted(&mut self) {
        let line = self.paint("Sync aborted by user.".red().bold());
        self.emit("");
        self.emit(line);
    }

    fn batch_started(&mut self, total: usize) {
        let line = self.paint(format!("Found {total} operations to perform.").yellow().bold());
        self.emit("");
        self.emit(line);
    }

    fn operation_started(&mut self, index: usize, total: usize, operation: &SyncOperation) {
        let action = match operation {
            SyncOperation::Copy(copy) => format!("{} {}", operation.action(), copy.direction.label()),
        };
        let line = format!("[{index}/{total}] {action} {}", operation.relative_path());
        let line = self.paint(line.dim());
        self.emit(line);
    }

    fn operation_failed(&mut self, operation: &SyncOperation, error: &SyncError) {
        let message = format!("  ❌ ERROR copying '{}': {error}", operation.source().display());
        let line = self.paint(message.red().bold());
        self.emit(line);
    }

    fn batch_finished(&mut self, summary: &SyncSummary) {
        self.emit("");
        if summary.is_success() {
            let message = format!(
                "✅ Sync execution finished successfully! ({} copied)",
                summary.succeeded
            );
            let line = self.paint(message.green().bold());
            self.emit(line);
            self.flush();
            return;
        }

        let message = format!(
            "Sync finished with errors: {} succeeded, {} failed",
            summary.succeeded, summary.failed
        );
        let line = self.paint(message.red().bold());
        self.emit(line);
        self.emit("Failed operations:");
        for failure in &summary.failures {
            self.emit(format!(
                "  - {} -> {}: {}",
                failure.operation.source().display(),
                failure.operation.destination().display(),
                failure.error
            ));
        }
        self.flush();
    }
}
