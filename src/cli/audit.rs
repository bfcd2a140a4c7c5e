use clap::Parser;

/// Arguments for the audit command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show the whole log:\n    modsmith audit\n\n\
                  Last 5 attempts for one module:\n    modsmith audit --module crm --limit 5")]
pub struct AuditArgs {
    /// Only entries for this module
    #[arg(long, short = 'm')]
    pub module: Option<String>,

    /// Only the most recent N entries
    #[arg(long, short = 'n', value_name = "N")]
    pub limit: Option<usize>,

    /// Only failed attempts
    #[arg(long)]
    pub failed: bool,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}
