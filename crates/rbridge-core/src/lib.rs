//! rbridge-core - core library for the rbridge debug bridge
//!
//! This crate holds everything the CLI and the cable crates share:
//!
//! - the path-queryable configuration tree and its resolver
//!   ([`config`]);
//! - the [`bridge::Bridge`] capability contract that cable crates
//!   implement;
//! - the immutable [`context::RequestContext`] handed to command handlers;
//! - the common error taxonomy ([`error`]).
//!
//! The CLI never talks to a cable directly: it resolves a configuration,
//! asks the bridge factory for a `Box<dyn Bridge>`, and drives it through
//! the command dispatcher.

pub mod bridge;
pub mod config;
pub mod context;
pub mod error;

pub use bridge::{Bridge, ScriptEntry, Status, DEFAULT_SCRIPT_ENTRY};
pub use config::{ConfigTree, Node, Value};
pub use context::RequestContext;
pub use error::{Error, Result};
