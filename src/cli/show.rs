use clap::Parser;

/// Arguments for the show command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show a module:\n    modsmith show crm\n\n\
                  As JSON:\n    modsmith show crm --json")]
pub struct ShowArgs {
    /// Module name
    pub module: String,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}
