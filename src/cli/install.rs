use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Pick modules from a menu:\n    modsmith install\n\n\
                  Install a complete selection:\n    modsmith install employees crm\n\n\
                  Add missing dependencies automatically:\n    modsmith install visits --with-deps\n\n\
                  See what would happen:\n    modsmith install crm --with-deps --dry-run")]
pub struct InstallArgs {
    /// Modules to install (omit to choose interactively)
    pub modules: Vec<String>,

    /// Add every missing dependency to the selection
    #[arg(long)]
    pub with_deps: bool,

    /// User recorded in the audit log
    #[arg(long, short = 'u', env = "MODSMITH_USER")]
    pub user: Option<String>,

    /// Run against an in-memory copy of storage; nothing is written
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::super::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_cli_parsing_install() {
        let cli = Cli::try_parse_from([
            "modsmith",
            "install",
            "employees",
            "crm",
            "--with-deps",
            "--user",
            "jane",
        ])
        .unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.modules, vec!["employees", "crm"]);
                assert!(args.with_deps);
                assert!(!args.dry_run);
                assert_eq!(args.user.as_deref(), Some("jane"));
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_install_interactive() {
        let cli = Cli::try_parse_from(["modsmith", "install", "--dry-run"]).unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert!(args.modules.is_empty());
                assert!(args.dry_run);
            }
            _ => panic!("Expected Install command"),
        }
    }
}
