//! UI/Progress presentation layer
//!
//! This module handles:
//! - Progress reporting for installation runs
//! - Interactive progress bars using indicatif
//! - Silent progress for dry runs and library callers
//! - Terminal display of modules, plans and reports (see [`display`])
//!
//! The installer talks to the terminal only through the [`ProgressReporter`]
//! trait; the polled [`ProgressTracker`](crate::installer::progress::ProgressTracker)
//! is updated independently of it.

pub mod display;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::{InstallationReport, InstallationResult};

/// Progress reporter for installation runs
pub trait ProgressReporter: Send {
    /// A run over `plan` is starting
    fn begin(&mut self, plan: &[String]);

    /// `module` (position `index` of `total`) is being set up
    fn start_module(&mut self, module: &str, index: usize, total: usize);

    /// The running module produced `result`
    fn finish_module(&mut self, result: &InstallationResult);

    /// The run is over
    fn finish(&mut self, report: &InstallationReport);
}

/// Interactive progress reporter with a visual progress bar
pub struct InteractiveProgressReporter {
    module_pb: Option<ProgressBar>,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        Self { module_pb: None }
    }
}

impl Default for InteractiveProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn begin(&mut self, plan: &[String]) {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let module_pb = ProgressBar::new(plan.len() as u64);
        module_pb.set_style(style);
        self.module_pb = Some(module_pb);
    }

    fn start_module(&mut self, module: &str, index: usize, total: usize) {
        if let Some(ref pb) = self.module_pb {
            pb.set_message(format!("({}/{}) {}", index + 1, total, module));
        }
    }

    fn finish_module(&mut self, result: &InstallationResult) {
        if let Some(ref pb) = self.module_pb {
            let mark = if result.success() {
                Style::new().green().apply_to("✓")
            } else {
                Style::new().red().apply_to("✗")
            };
            pb.println(format!("  {mark} {} - {}", result.module(), result.message()));
            pb.inc(1);
        }
    }

    fn finish(&mut self, report: &InstallationReport) {
        if let Some(pb) = self.module_pb.take() {
            if report.is_success() {
                pb.finish_and_clear();
            } else {
                pb.abandon();
            }
        }
    }
}

/// Silent progress reporter
///
/// No-op implementation used for dry runs, `--quiet` and library callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn begin(&mut self, _plan: &[String]) {}

    fn start_module(&mut self, _module: &str, _index: usize, _total: usize) {}

    fn finish_module(&mut self, _result: &InstallationResult) {}

    fn finish(&mut self, _report: &InstallationReport) {}
}
