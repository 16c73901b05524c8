//! Execution-control commands: load, start, wait, reset and the blocking
//! loop commands (ioloop, reqloop, gdb)

use super::CommandError;
use rbridge_core::{Bridge, RequestContext, Status};

pub fn load(bridge: &mut dyn Bridge, ctx: &RequestContext) -> Result<Status, CommandError> {
    if ctx.binaries.is_empty() {
        log::warn!("load: no --binary given, nothing to do");
    }
    Ok(bridge.load()?)
}

pub fn start(bridge: &mut dyn Bridge, _ctx: &RequestContext) -> Result<Status, CommandError> {
    Ok(bridge.start()?)
}

pub fn wait(bridge: &mut dyn Bridge, _ctx: &RequestContext) -> Result<Status, CommandError> {
    Ok(bridge.wait()?)
}

pub fn reset(bridge: &mut dyn Bridge, _ctx: &RequestContext) -> Result<Status, CommandError> {
    Ok(bridge.reset()?)
}

pub fn ioloop(bridge: &mut dyn Bridge, _ctx: &RequestContext) -> Result<Status, CommandError> {
    Ok(bridge.ioloop()?)
}

pub fn reqloop(bridge: &mut dyn Bridge, _ctx: &RequestContext) -> Result<Status, CommandError> {
    Ok(bridge.reqloop()?)
}

pub fn gdb(bridge: &mut dyn Bridge, ctx: &RequestContext) -> Result<Status, CommandError> {
    log::info!("starting RSP server on port {}", ctx.rsp_port);
    Ok(bridge.gdb(ctx.rsp_port)?)
}
