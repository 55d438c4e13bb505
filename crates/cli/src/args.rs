use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use tailor_core::{DarkMode, MergePolicy, ResolverOptions};

/// Merge theme configuration revisions into one validated config.
///
/// Examples:
///   tailor tailwind.config.js                      # Validate a single config
///   tailor base.config.js overrides.json           # Later files win per key
///   tailor --strict base.config.js overrides.json  # Report redefined keys
#[derive(Debug, Parser)]
#[command(name = "tailor", version, verbatim_doc_comment)]
pub struct Cli {
    /// Configuration sources (JSON or JS modules), lowest precedence first
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<PathBuf>,

    /// Report colors and font stacks that a later source redefines with a different value
    #[arg(long)]
    pub strict: bool,

    /// Dark mode strategy used when no source declares one
    #[arg(long, value_enum, default_value_t = DarkModeArg::Media)]
    pub default_dark_mode: DarkModeArg,

    /// Print the resolved config on a single line
    #[arg(long)]
    pub compact: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DarkModeArg {
    Media,
    Class,
    None,
}

impl From<DarkModeArg> for DarkMode {
    fn from(arg: DarkModeArg) -> Self {
        match arg {
            DarkModeArg::Media => DarkMode::Media,
            DarkModeArg::Class => DarkMode::Class,
            DarkModeArg::None => DarkMode::None,
        }
    }
}

impl Cli {
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            merge_policy: if self.strict {
                MergePolicy::Strict
            } else {
                MergePolicy::Override
            },
            default_dark_mode: self.default_dark_mode.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["tailor", "tailwind.config.js"]).unwrap();
        assert_eq!(cli.sources, [PathBuf::from("tailwind.config.js")]);
        assert_eq!(cli.resolver_options(), ResolverOptions::default());
        assert!(!cli.compact);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn flags_map_to_options() {
        let cli = Cli::try_parse_from([
            "tailor",
            "--strict",
            "--default-dark-mode",
            "class",
            "-vv",
            "a.js",
            "b.json",
        ])
        .unwrap();
        assert_eq!(cli.sources.len(), 2);
        assert_eq!(cli.verbose, 2);
        let options = cli.resolver_options();
        assert_eq!(options.merge_policy, MergePolicy::Strict);
        assert_eq!(options.default_dark_mode, DarkMode::Class);
    }

    #[test]
    fn requires_a_source() {
        assert!(Cli::try_parse_from(["tailor"]).is_err());
        assert!(Cli::try_parse_from(["tailor", "--default-dark-mode", "toggle", "a.js"]).is_err());
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
