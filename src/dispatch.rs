//! Command dispatch loop
//!
//! Executes a caller-specified ordered sequence of command names against
//! one bridge handle: fail-fast, left-to-right, single pass. There is no
//! retry or rollback; once a command fails, later commands never run.

use crate::commands::{self, CommandError};
use rbridge_core::{Bridge, RequestContext};
use thiserror::Error;

/// Why a dispatch run stopped early
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The name is not in the command registry
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// The handler ran and reported a non-zero status
    #[error("command '{command}' failed with status {status}")]
    Failed { command: String, status: i32 },

    /// The handler itself errored
    #[error("command '{command}' failed: {source}")]
    Exception {
        command: String,
        #[source]
        source: CommandError,
    },
}

/// Run every command in order against the bridge, stopping at the first
/// failure
pub fn run(
    names: &[String],
    bridge: &mut dyn Bridge,
    ctx: &RequestContext,
) -> Result<(), DispatchError> {
    for name in names {
        let spec = commands::find(name)
            .ok_or_else(|| DispatchError::UnknownCommand(name.clone()))?;
        log::debug!("executing command '{}'", name);
        match (spec.handler)(bridge, ctx) {
            Ok(0) => {}
            Ok(status) => {
                return Err(DispatchError::Failed {
                    command: name.clone(),
                    status,
                })
            }
            Err(source) => {
                return Err(DispatchError::Exception {
                    command: name.clone(),
                    source,
                })
            }
        }
    }
    Ok(())
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use rbridge_dummy::DummyBridge;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_sequence_is_a_no_op() {
        let mut bridge = DummyBridge::new(Vec::new());
        run(&names(&[]), &mut bridge, &RequestContext::default()).unwrap();
        assert!(bridge.journal().is_empty());
    }

    #[test]
    fn test_unknown_command_touches_nothing() {
        let mut bridge = DummyBridge::new(Vec::new());
        let err = run(
            &names(&["unknown"]),
            &mut bridge,
            &RequestContext::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownCommand(_)));
        assert!(bridge.journal().is_empty());
    }

    #[test]
    fn test_unknown_command_stops_before_later_commands() {
        let mut bridge = DummyBridge::new(Vec::new());
        let err = run(
            &names(&["unknown", "reset"]),
            &mut bridge,
            &RequestContext::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownCommand(_)));
        assert!(bridge.journal().is_empty());
    }

    #[test]
    fn test_fail_fast_preserves_order() {
        // read succeeds, write errors on the missing --value, reset must
        // never run
        let mut bridge = DummyBridge::new(Vec::new());
        let ctx = RequestContext {
            addr: Some(0x1000),
            size: Some(4),
            ..Default::default()
        };
        let err = run(&names(&["read", "write", "reset"]), &mut bridge, &ctx).unwrap_err();
        match err {
            DispatchError::Exception { command, source } => {
                assert_eq!(command, "write");
                assert!(matches!(source, CommandError::MissingArgument("--value")));
            }
            other => panic!("unexpected dispatch result: {:?}", other),
        }
        assert_eq!(bridge.journal(), ["read"]);
    }

    #[test]
    fn test_full_sequence_runs_in_order() {
        let mut bridge = DummyBridge::new(Vec::new());
        let ctx = RequestContext {
            addr: Some(0x1000),
            size: Some(4),
            value: Some(0xdeadbeef),
            rsp_port: 2345,
            ..Default::default()
        };
        run(
            &names(&["write", "read", "start", "wait", "reset"]),
            &mut bridge,
            &ctx,
        )
        .unwrap();
        assert_eq!(
            bridge.journal(),
            ["write", "read", "start", "wait", "reset"]
        );
    }
}
