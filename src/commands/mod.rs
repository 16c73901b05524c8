//! Command registry and handlers
//!
//! Every command is a `(name, description, handler)` triple in a static
//! registry. Handlers receive the bridge handle and the immutable request
//! context and return a status code; missing or malformed arguments are
//! reported through [`CommandError`] rather than by panicking, so the
//! dispatcher can turn them into a uniform failure report.

mod exec;
mod read;
mod script;
mod write;

use rbridge_core::{Bridge, RequestContext, Status};
use thiserror::Error;

/// Failure of a single command handler
#[derive(Debug, Error)]
pub enum CommandError {
    /// A required CLI option was not given
    #[error("missing required argument {0}")]
    MissingArgument(&'static str),

    /// An option was given but its value is unusable for this command
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The bridge itself failed
    #[error(transparent)]
    Bridge(#[from] rbridge_core::Error),
}

/// Handler signature shared by every command
pub type Handler = fn(&mut dyn Bridge, &RequestContext) -> Result<Status, CommandError>;

/// One entry in the command registry
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub handler: Handler,
}

/// The fixed command set, in display order
pub static REGISTRY: &[CommandSpec] = &[
    CommandSpec {
        name: "read",
        description: "Read target memory (--addr, --size) and hexdump it",
        handler: read::run,
    },
    CommandSpec {
        name: "write",
        description: "Write a little-endian value to target memory (--addr, --size, --value)",
        handler: write::run,
    },
    CommandSpec {
        name: "load",
        description: "Load the configured binaries (--binary) onto the target",
        handler: exec::load,
    },
    CommandSpec {
        name: "start",
        description: "Begin target execution",
        handler: exec::start,
    },
    CommandSpec {
        name: "wait",
        description: "Block until target execution terminates",
        handler: exec::wait,
    },
    CommandSpec {
        name: "reset",
        description: "Reset target state",
        handler: exec::reset,
    },
    CommandSpec {
        name: "ioloop",
        description: "Relay target I/O until termination or interrupt",
        handler: exec::ioloop,
    },
    CommandSpec {
        name: "reqloop",
        description: "Service target requests until termination or interrupt",
        handler: exec::reqloop,
    },
    CommandSpec {
        name: "gdb",
        description: "Serve the RSP protocol on --rsp-port until the session ends",
        handler: exec::gdb,
    },
    CommandSpec {
        name: "script",
        description: "Run extension scripts (--script entry@path) against the bridge",
        handler: script::run,
    },
];

/// Look a command up by name
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    REGISTRY.iter().find(|spec| spec.name == name)
}

/// Usage text listing every command, shown for an empty invocation
pub fn usage() -> String {
    let mut text = String::from("Usage: rbridge [OPTIONS] <COMMAND>...\n\nCommands:\n");
    for spec in REGISTRY {
        text.push_str(&format!("  {:8} - {}\n", spec.name, spec.description));
    }
    text.push_str("\nSee 'rbridge --help' for the available options.\n");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names_are_unique() {
        for (i, spec) in REGISTRY.iter().enumerate() {
            assert!(
                REGISTRY[i + 1..].iter().all(|other| other.name != spec.name),
                "duplicate command name {}",
                spec.name
            );
        }
    }

    #[test]
    fn test_find_known_and_unknown() {
        assert!(find("read").is_some());
        assert!(find("gdb").is_some());
        assert!(find("flash").is_none());
    }

    #[test]
    fn test_usage_lists_every_command() {
        let usage = usage();
        for spec in REGISTRY {
            assert!(usage.contains(spec.name));
        }
    }
}
