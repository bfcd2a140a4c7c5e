use clap::Parser;

/// Arguments for the status command
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Print the raw progress snapshot as JSON
    #[arg(long)]
    pub json: bool,
}
