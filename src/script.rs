//! Extension script loading
//!
//! A script reference has the form `entry@path`, or a bare `path` which
//! implies the entry name `debug_bridge_entry`. The path names a dynamic
//! library built against rbridge-core; the entry symbol must have the
//! documented plugin signature [`ScriptEntry`], i.e.
//! `fn(&mut dyn Bridge) -> Status`. The loaded script gets full access to
//! the bridge handle and its return value is the command status.

use crate::commands::CommandError;
use libloading::{Library, Symbol};
use rbridge_core::{Bridge, ScriptEntry, Status, DEFAULT_SCRIPT_ENTRY};

/// Split a script reference into `(entry, path)`
pub fn parse_script_ref(reference: &str) -> (&str, &str) {
    match reference.split_once('@') {
        Some((entry, path)) if !entry.is_empty() => (entry, path),
        Some((_, path)) => (DEFAULT_SCRIPT_ENTRY, path),
        None => (DEFAULT_SCRIPT_ENTRY, reference),
    }
}

/// Load one script reference and invoke its entry point with the bridge
pub fn run_script(bridge: &mut dyn Bridge, reference: &str) -> Result<Status, CommandError> {
    let (entry, path) = parse_script_ref(reference);
    log::debug!("loading script entry '{}' from {}", entry, path);

    let library = unsafe { Library::new(path) }.map_err(|e| {
        CommandError::InvalidArgument(format!("cannot load script unit {}: {}", path, e))
    })?;
    let entry_fn: Symbol<ScriptEntry> = unsafe { library.get(entry.as_bytes()) }.map_err(|e| {
        CommandError::InvalidArgument(format!(
            "no entry point '{}' in script unit {}: {}",
            entry, path, e
        ))
    })?;

    Ok(entry_fn(bridge))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry_at_path() {
        assert_eq!(parse_script_ref("myentry@foo.so"), ("myentry", "foo.so"));
        assert_eq!(
            parse_script_ref("init@/opt/plugins/boot.so"),
            ("init", "/opt/plugins/boot.so")
        );
    }

    #[test]
    fn test_bare_path_uses_default_entry() {
        assert_eq!(
            parse_script_ref("foo.so"),
            (DEFAULT_SCRIPT_ENTRY, "foo.so")
        );
        // empty entry falls back to the default as well
        assert_eq!(
            parse_script_ref("@foo.so"),
            (DEFAULT_SCRIPT_ENTRY, "foo.so")
        );
    }
}
