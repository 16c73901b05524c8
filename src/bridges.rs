//! Cable registration and bridge construction
//!
//! The bridge factory consumes the resolved configuration tree and hands
//! back a boxed [`Bridge`]. The cable type comes from
//! `**/debug-bridge/cable/type`; cables are feature-gated so a build only
//! carries the transports it was compiled with.

use rbridge_core::{Bridge, ConfigTree, Error};
use std::path::PathBuf;

/// Information about a cable backend
pub struct CableInfo {
    /// Name matched against the config's cable type
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
}

/// Cables enabled at compile time
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_cables() -> Vec<CableInfo> {
    let mut cables = Vec::new();

    #[cfg(feature = "dummy")]
    cables.push(CableInfo {
        name: "dummy",
        description: "In-memory target emulator for testing",
    });

    cables
}

/// Help text listing all available cables
pub fn cable_help() -> String {
    let cables = available_cables();
    if cables.is_empty() {
        return "No cables available (recompile with cable features enabled)".to_string();
    }
    let mut help = String::from("Available cables:\n");
    for cable in &cables {
        help.push_str(&format!("  {:12} - {}\n", cable.name, cable.description));
    }
    help
}

/// Create the bridge for a resolved configuration.
///
/// Called exactly once per run; the returned handle is owned by the
/// dispatch loop until process exit.
#[allow(unused_variables)]
pub fn create_bridge(
    config: &ConfigTree,
    verbose: u8,
    binaries: &[PathBuf],
) -> Result<Box<dyn Bridge>, Error> {
    let cable = config.get_str("**/debug-bridge/cable/type").unwrap_or("dummy");
    if let Some(chip) = config.get_str("**/chip/name") {
        log::info!("target chip: {}", chip);
    }
    if let Some(boot_mode) = config.get_str("**/debug-bridge/boot-mode") {
        log::debug!("boot mode: {}", boot_mode);
    }
    log::debug!("opening cable '{}' (verbosity {})", cable, verbose);

    match cable {
        #[cfg(feature = "dummy")]
        "dummy" => Ok(Box::new(rbridge_dummy::DummyBridge::new(
            binaries.to_vec(),
        ))),

        other => Err(Error::Cable(format!(
            "unknown cable type '{}'\n\n{}",
            other,
            cable_help()
        ))),
    }
}
