//! The bridge capability contract
//!
//! A [`Bridge`] performs the actual target access: memory reads and writes,
//! binary loading, execution control, and the long-running relay and RSP
//! server loops. Cable crates implement this trait; the CLI only ever sees
//! `&mut dyn Bridge`.
//!
//! Control operations return a status code: `Ok(0)` is success, `Ok(n)`
//! with `n != 0` is a reported failure, and `Err(_)` is a failure carrying
//! diagnostic detail. `ioloop`, `reqloop` and `gdb` block the calling
//! thread for an externally determined duration.

use crate::error::Result;

/// Status code returned by bridge control operations; zero means success
pub type Status = i32;

/// Entry point signature for extension scripts: a plugin receives the
/// bridge handle and returns a status code
pub type ScriptEntry = fn(&mut dyn Bridge) -> Status;

/// Entry name resolved in a script unit when the reference carries none
pub const DEFAULT_SCRIPT_ENTRY: &str = "debug_bridge_entry";

/// Target access and execution control over one cable
pub trait Bridge {
    /// Read `buf.len()` bytes of target memory starting at `addr`
    fn read(&mut self, addr: u64, buf: &mut [u8]) -> Result<()>;

    /// Write `buf.len()` bytes of target memory starting at `addr`
    fn write(&mut self, addr: u64, buf: &[u8]) -> Result<()>;

    /// Load all configured binaries onto the target
    fn load(&mut self) -> Result<Status>;

    /// Begin target execution
    fn start(&mut self) -> Result<Status>;

    /// Block until target execution terminates
    fn wait(&mut self) -> Result<Status>;

    /// Reset target state
    fn reset(&mut self) -> Result<Status>;

    /// Blocking I/O relay loop; returns on target-side termination or
    /// external interrupt
    fn ioloop(&mut self) -> Result<Status>;

    /// Blocking request-service loop (same lifecycle as `ioloop`, distinct
    /// channel)
    fn reqloop(&mut self) -> Result<Status>;

    /// Serve the remote-debugging protocol on `rsp_port`; blocks until the
    /// session ends
    fn gdb(&mut self, rsp_port: u16) -> Result<Status>;
}
