//! Wiring parsed clap arguments into a [`Resolver`].
//!
//! Every flag of a command is bound under its id (positionals are not). Declared
//! defaults land in the default layer; values the user actually typed land
//! in the override layer. A default applied by clap never becomes an
//! override, so the environment and config file can still win over it.
//!
//! [`bind_command`] binds a command that was not invoked: its flags become
//! overridable keys with their defaults, but nothing is overridden.

use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, Command};
use tracing::debug;

use crate::config::{Resolver, Value};

/// Bind all arguments of `command` using the values parsed into `matches`.
///
/// `matches` must be the matches of `command` itself (for a subcommand,
/// the result of `subcommand_matches`).
pub fn bind_matches(resolver: &mut Resolver, command: &Command, matches: &ArgMatches) {
    for id in bind_command(resolver, command) {
        if matches.value_source(id) != Some(ValueSource::CommandLine) {
            continue;
        }
        let Ok(Some(raw)) = matches.try_get_raw(id) else {
            continue;
        };
        let values: Vec<String> = raw.map(|v| v.to_string_lossy().into_owned()).collect();
        debug!(flag = id, "flag passed on the command line");
        resolver.set_override(id, to_value(values));
    }
}

/// Bind the flags of `command` and register their declared defaults.
///
/// Returns the ids that were bound.
pub fn bind_command<'c>(resolver: &mut Resolver, command: &'c Command) -> Vec<&'c str> {
    let mut bound = Vec::new();
    for arg in command.get_arguments() {
        match arg.get_action() {
            ArgAction::Help | ArgAction::HelpShort | ArgAction::HelpLong | ArgAction::Version => {
                continue;
            }
            _ => {}
        }
        // Globals are propagated copies of a parent's arguments; positionals
        // are operands, not settings.
        if arg.is_global_set() || arg.is_positional() {
            continue;
        }

        let id = arg.get_id().as_str();
        resolver.bind_overridable(id);

        let defaults = arg.get_default_values();
        if !defaults.is_empty() {
            let values = defaults.iter().map(|v| v.to_string_lossy().into_owned());
            resolver.register_default(id, to_value(values.collect()));
        }
        bound.push(id);
    }
    bound
}

fn to_value(mut values: Vec<String>) -> Value {
    if values.len() == 1 {
        Value::String(values.remove(0))
    } else {
        Value::from(values)
    }
}
