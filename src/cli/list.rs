use clap::Parser;

use crate::domain::Category;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List every module:\n    modsmith list\n\n\
                  Only installed modules:\n    modsmith list --installed\n\n\
                  One category as JSON:\n    modsmith list --category crm --json")]
pub struct ListArgs {
    /// Only installed modules
    #[arg(long, conflicts_with = "available")]
    pub installed: bool,

    /// Only modules that are not installed
    #[arg(long)]
    pub available: bool,

    /// Only modules of this category
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<Category>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Installed flag to filter on, if any
    pub fn installed_filter(&self) -> Option<bool> {
        match (self.installed, self.available) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
