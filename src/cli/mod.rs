//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - list: List command arguments
//! - show: Show command arguments
//! - check: Check command arguments
//! - plan: Plan command arguments
//! - install: Install command arguments
//! - status: Status command arguments
//! - audit: Audit command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::settings::SettingsOverrides;

pub mod audit;
pub mod check;
pub mod completions;
pub mod install;
pub mod list;
pub mod plan;
pub mod show;
pub mod status;

pub use audit::AuditArgs;
pub use check::CheckArgs;
pub use completions::CompletionsArgs;
pub use install::InstallArgs;
pub use list::ListArgs;
pub use plan::PlanArgs;
pub use show::ShowArgs;
pub use status::StatusArgs;

/// Modsmith - dependency-aware module installer
///
/// Install optional application modules in dependency order.
#[derive(Parser, Debug)]
#[command(
    name = "modsmith",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Dependency-aware installer for optional application modules",
    long_about = "Modsmith discovers installable modules, checks that a selection carries its \
                  dependencies, installs the modules in dependency order and keeps an audit log \
                  of every attempt.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  modsmith list                          \x1b[90m# Show every module and its state\x1b[0m\n   \
                  modsmith check crm                     \x1b[90m# Check a selection for missing modules\x1b[0m\n   \
                  modsmith plan visits --with-deps       \x1b[90m# Show the installation order\x1b[0m\n   \
                  modsmith install employees crm         \x1b[90m# Install modules\x1b[0m\n   \
                  modsmith audit --module crm            \x1b[90m# Show past attempts for a module\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Data directory holding storage, audit log and settings
    #[arg(long, global = true, env = "MODSMITH_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Settings file (defaults to <home>/modsmith.yaml)
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Module catalog to use instead of the built-in one
    #[arg(long, global = true, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Settings overrides carried by the global flags
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            data_dir: self.home.clone(),
            config: self.config.clone(),
            catalog: self.catalog.clone(),
            user: None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List modules and their installed state
    List(ListArgs),

    /// Show module details
    Show(ShowArgs),

    /// Check a selection for missing dependencies
    Check(CheckArgs),

    /// Show the installation order for a selection
    Plan(PlanArgs),

    /// Install modules
    Install(InstallArgs),

    /// Show progress of the current or last installation
    Status(StatusArgs),

    /// Show the installation audit log
    Audit(AuditArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
