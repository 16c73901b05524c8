//! rbridge - a command-line debug bridge for embedded targets
//!
//! rbridge resolves one configuration tree per run (explicit file, or
//! chip-lookup with a built-in fallback), asks the cable factory for a
//! bridge handle, and drives that handle through an ordered list of
//! commands with fail-fast semantics. Extension scripts loaded as dynamic
//! libraries can run arbitrary additional operations against the same
//! handle.
//!
//! # Architecture
//!
//! - `rbridge-core` holds the config tree/resolver, the `Bridge` contract
//!   and the error taxonomy; the CLI never talks to a cable directly.
//! - Cable crates (currently `rbridge-dummy`) implement `Bridge` and are
//!   feature-gated like transports usually are.
//! - One bridge handle is created per process run and owned by the
//!   dispatch loop until exit; there is no teardown command.

mod bridges;
mod cli;
mod commands;
mod dispatch;
mod script;

use clap::Parser;
use cli::Cli;
use dispatch::DispatchError;
use rbridge_core::config::{self, ChipLookup, EnvChipLookup, ResolveOptions};
use rbridge_core::RequestContext;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    // Empty command list: usage display, successful no-op
    if cli.commands.is_empty() {
        print!("{}", commands::usage());
        return Ok(());
    }

    // The chip lookup capability is resolved once, up front
    let lookup = EnvChipLookup::from_env();
    let options = ResolveOptions {
        config: cli.config.clone(),
        chip: cli.chip.clone(),
        boot_mode: cli.boot_mode.clone(),
        cable: cli.cable.clone(),
        port: cli.port,
    };
    let tree = match config::resolve(&options, lookup.as_ref().map(|l| l as &dyn ChipLookup)) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("rbridge: {}", e);
            std::process::exit(1);
        }
    };

    // Side artifact: snapshot of a chip-derived configuration
    if options.config.is_none() {
        if let Some(path) = &cli.config_out {
            if let Err(e) = config::write_snapshot(&tree, path) {
                log::warn!("could not write configuration snapshot: {}", e);
            }
        }
    }

    let mut bridge = match bridges::create_bridge(&tree, cli.verbose, &cli.binaries) {
        Ok(bridge) => bridge,
        Err(e) => {
            eprintln!("rbridge: {}", e);
            std::process::exit(1);
        }
    };

    let ctx = RequestContext {
        addr: cli.addr,
        size: cli.size,
        value: cli.value,
        rsp_port: cli.rsp_port,
        scripts: cli.scripts.clone(),
        binaries: cli.binaries.clone(),
        verbose: cli.verbose,
    };

    match dispatch::run(&cli.commands, bridge.as_mut(), &ctx) {
        Ok(()) => Ok(()),
        // --debug surfaces the full diagnostic chain instead of the
        // one-line report
        Err(err @ DispatchError::Exception { .. }) if cli.debug => Err(Box::new(err)),
        Err(e) => {
            eprintln!("rbridge: {}", e);
            std::process::exit(1);
        }
    }
}
