use clap::Parser;

/// Arguments for the plan command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Plan a complete selection:\n    modsmith plan employees crm\n\n\
                  Add missing dependencies automatically:\n    modsmith plan visits --with-deps")]
pub struct PlanArgs {
    /// Modules to plan
    #[arg(required = true, num_args = 1..)]
    pub modules: Vec<String>,

    /// Add every missing dependency to the selection
    #[arg(long)]
    pub with_deps: bool,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}
