use clap::Parser;

/// Arguments for the check command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Check a selection:\n    modsmith check crm visits\n\n\
                  Check whether a module can be dropped from a selection:\n    modsmith check employees crm visits --without crm\n\n\
                  Exit status is 1 when dependencies are missing.")]
pub struct CheckArgs {
    /// Modules to check
    #[arg(required = true, num_args = 1..)]
    pub modules: Vec<String>,

    /// Check the selection with this module deselected
    #[arg(long, value_name = "MODULE")]
    pub without: Option<String>,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}
