//! Script command: run extension plugins against the bridge

use super::CommandError;
use rbridge_core::{Bridge, RequestContext, Status};

/// Run every `--script` reference in order, fail-fast
pub fn run(bridge: &mut dyn Bridge, ctx: &RequestContext) -> Result<Status, CommandError> {
    if ctx.scripts.is_empty() {
        return Err(CommandError::MissingArgument("--script"));
    }
    for reference in &ctx.scripts {
        let status = crate::script::run_script(bridge, reference)?;
        if status != 0 {
            log::error!("script '{}' returned status {}", reference, status);
            return Ok(status);
        }
    }
    Ok(0)
}
