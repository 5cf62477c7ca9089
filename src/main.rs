//! precedence — layered configuration CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use precedence::config;
use precedence::constants;
use precedence::env;
use precedence::flags;

use std::process;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, FromArgMatches};
use tracing_subscriber::EnvFilter;

use cli::args::{Cli, Command, GetArgs};
use config::Resolver;
use env::Env;

const RUN_COMMAND: &str = "run";

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut command = Cli::command();
    let matches = command.get_matches_mut();
    let cli = Cli::from_arg_matches(&matches)?;

    init_logging(cli.verbose);

    let resolver = build_resolver(&cli, &command, &matches)?;

    match cli.command {
        Command::Run(_) => run_run(&resolver),
        Command::Get(args) => run_get(&resolver, &args),
        Command::Show => run_show(&resolver),
    }
}

/// Route tracing output to stderr. `RUST_LOG` takes priority over `-v`.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={level}", constants::APP_NAME)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Assemble the resolver: env prefix, explicit config file, bound flags.
fn build_resolver(
    cli: &Cli,
    command: &clap::Command,
    matches: &clap::ArgMatches,
) -> Result<Resolver> {
    let mut resolver = Resolver::new(Env::real());
    resolver
        .configure(constants::ENV_PREFIX)
        .context("failed to configure environment prefix")?;

    if let Some(path) = &cli.config {
        resolver
            .load_file(path)
            .with_context(|| format!("failed to load --config {}", path.display()))?;
    }

    // Only `run` declares settings; other subcommands' flags are display
    // switches. Its flags are bound whichever subcommand runs, so `get` and
    // `show` still see their defaults.
    if let Some(run) = command.find_subcommand(RUN_COMMAND) {
        match matches.subcommand_matches(RUN_COMMAND) {
            Some(run_matches) => flags::bind_matches(&mut resolver, run, run_matches),
            None => {
                flags::bind_command(&mut resolver, run);
            }
        }
    }

    Ok(resolver)
}

/// Print the resolved `--precedence` value.
fn run_run(resolver: &Resolver) -> Result<()> {
    let value = resolver
        .get_string(constants::PRECEDENCE_KEY)
        .unwrap_or_default();
    println!("--{} => {value}", constants::PRECEDENCE_KEY);
    Ok(())
}

/// Print one resolved key.
fn run_get(resolver: &Resolver, args: &GetArgs) -> Result<()> {
    let Some(resolved) = resolver.lookup(&args.key) else {
        bail!("{} is not set", args.key);
    };
    println!("{}", cli::format_resolved(&resolved, args.source));
    Ok(())
}

/// Print every known setting as YAML.
fn run_show(resolver: &Resolver) -> Result<()> {
    let yaml = serde_yaml_ng::to_string(&resolver.all_settings())
        .context("failed to render settings")?;
    print!("{yaml}");
    Ok(())
}
