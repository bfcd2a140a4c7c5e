use clap::Parser;

/// Arguments for the completions command
#[derive(Parser, Debug)]
#[command(after_help = "Completes subcommands, global flags (--home, --config, --catalog) \
                  and per-command flags such as --with-deps and --dry-run.\n\n\
                  EXAMPLES:\n  \
                  Load completions into the current bash session:\n    source <(modsmith completions bash)\n\n\
                  Install zsh completions:\n    modsmith completions zsh > \"${fpath[1]}/_modsmith\"\n\n\
                  Install fish completions:\n    modsmith completions fish > ~/.config/fish/completions/modsmith.fish")]
pub struct CompletionsArgs {
    /// Shell to generate for: bash, elvish, fish, powershell (pwsh) or zsh
    pub shell: String,
}
