//! Per-run request context
//!
//! Command handlers receive their arguments through an immutable
//! [`RequestContext`] built once from the parsed command line, instead of
//! reaching into shared parser state.

use std::path::PathBuf;

/// Immutable arguments shared by every command handler in a run
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Target address for read/write
    pub addr: Option<u64>,
    /// Access size in bytes for read/write
    pub size: Option<u64>,
    /// Little-endian value for write
    pub value: Option<u64>,
    /// Port for the RSP server started by the `gdb` command
    pub rsp_port: u16,
    /// Script references (`entry@path` or bare `path`) for the `script`
    /// command, in invocation order
    pub scripts: Vec<String>,
    /// Binaries the bridge was constructed with (informational; the bridge
    /// owns the actual load list)
    pub binaries: Vec<PathBuf>,
    /// Diagnostic verbosity
    pub verbose: u8,
}
