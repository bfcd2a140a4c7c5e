//! Modsmith - dependency-aware module installer

use clap::Parser;
use miette::Diagnostic;

use modsmith::cli::{Cli, Commands};
use modsmith::{commands, logging};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let overrides = cli.overrides();
    let result = match cli.command {
        Commands::List(args) => commands::list::run(&overrides, &args),
        Commands::Show(args) => commands::show::run(&overrides, &args),
        Commands::Check(args) => commands::check::run(&overrides, &args),
        Commands::Plan(args) => commands::plan::run(&overrides, &args),
        Commands::Install(args) => commands::install::run(overrides, args),
        Commands::Status(args) => commands::status::run(&overrides, &args),
        Commands::Audit(args) => commands::audit::run(&overrides, &args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        if let Some(help) = e.help() {
            eprintln!("  help: {help}");
        }
        std::process::exit(1);
    }
}
