//! Shell completions command

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::CompletionsArgs;
use crate::error::{Result, config};

fn parse_shell(name: &str) -> Option<Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Some(Shell::Bash),
        "elvish" => Some(Shell::Elvish),
        "fish" => Some(Shell::Fish),
        "powershell" | "pwsh" => Some(Shell::PowerShell),
        "zsh" => Some(Shell::Zsh),
        _ => None,
    }
}

/// Generate shell completions
pub fn run(args: &CompletionsArgs) -> Result<()> {
    let shell = parse_shell(&args.shell).ok_or_else(|| {
        config::invalid(format!(
            "unknown shell '{}' (supported: bash, elvish, fish, powershell, zsh)",
            args.shell
        ))
    })?;

    let mut cmd = <crate::cli::Cli as CommandFactory>::command();
    clap_complete::generate(shell, &mut cmd, "modsmith", &mut std::io::stdout().lock());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_known_shells() {
        for shell in ["bash", "elvish", "fish", "powershell", "pwsh", "zsh", "BASH", "Zsh"] {
            let args = CompletionsArgs {
                shell: shell.to_string(),
            };
            assert!(run(&args).is_ok(), "completions for {shell}");
        }
    }

    #[test]
    fn test_completions_unknown_shell() {
        assert_eq!(parse_shell("tcsh"), None);
        let args = CompletionsArgs {
            shell: "tcsh".to_string(),
        };
        assert!(run(&args).is_err());
    }
}
