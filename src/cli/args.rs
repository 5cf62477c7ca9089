//! Clap argument types.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use precedence::constants::PRECEDENCE_DEFAULT;

/// Resolve settings from flags, environment, config file, and defaults.
#[derive(Parser, Debug)]
#[command(name = "precedence", version = precedence::constants::VERSION)]
pub struct Cli {
    /// Config file to load (YAML, TOML, or JSON). Fatal if unreadable.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Print the resolved value of --precedence.
    Run(RunArgs),

    /// Print the resolved value of any key.
    Get(GetArgs),

    /// Print every known setting as YAML.
    Show,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Flag for testing precedence.
    // Read through the resolver under its id, not from this field.
    #[allow(dead_code)]
    #[arg(long, short = 'p', default_value = PRECEDENCE_DEFAULT)]
    pub precedence: String,
}

/// Arguments for the `get` subcommand.
#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Key to resolve; nested keys use dots (`foo.bar`).
    pub key: String,

    /// Also print which layer supplied the value.
    #[arg(long, default_value_t = false)]
    pub source: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults_precedence() {
        let cli = Cli::try_parse_from(["precedence", "run"]).unwrap();
        match cli.command {
            Command::Run(args) => assert_eq!(args.precedence, "default"),
            _ => panic!("expected Run command"),
        }
        assert!(cli.config.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn run_precedence_short_flag() {
        let cli = Cli::try_parse_from(["precedence", "run", "-p", "flag"]).unwrap();
        match cli.command {
            Command::Run(args) => assert_eq!(args.precedence, "flag"),
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn config_is_global() {
        let cli =
            Cli::try_parse_from(["precedence", "run", "--config", "/tmp/c.yaml", "-vv"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.yaml")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn get_takes_key_and_source() {
        let cli = Cli::try_parse_from(["precedence", "get", "foo.bar", "--source"]).unwrap();
        match cli.command {
            Command::Get(args) => {
                assert_eq!(args.key, "foo.bar");
                assert!(args.source);
            }
            _ => panic!("expected Get command"),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["precedence"]).is_err());
    }
}
