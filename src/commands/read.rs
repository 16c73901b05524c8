//! Read command implementation

use super::CommandError;
use rbridge_core::{Bridge, RequestContext, Status};

/// Chunk size for pulling target memory (4 KiB)
const READ_CHUNK_SIZE: u64 = 4096;

/// Run the read command: hexdump `--size` bytes starting at `--addr`
pub fn run(bridge: &mut dyn Bridge, ctx: &RequestContext) -> Result<Status, CommandError> {
    let addr = ctx.addr.ok_or(CommandError::MissingArgument("--addr"))?;
    let size = ctx.size.ok_or(CommandError::MissingArgument("--size"))?;
    if addr.checked_add(size).is_none() {
        return Err(CommandError::InvalidArgument(format!(
            "reading {} byte(s) at 0x{:x} runs past the end of the address space",
            size, addr
        )));
    }

    let mut offset = 0u64;
    while offset < size {
        let chunk_size = u64::min(READ_CHUNK_SIZE, size - offset);
        let mut chunk = vec![0u8; chunk_size as usize];
        bridge.read(addr + offset, &mut chunk)?;
        dump(addr + offset, &chunk);
        offset += chunk_size;
    }

    Ok(0)
}

/// Print one chunk as 16-bytes-per-row hexdump lines
fn dump(addr: u64, data: &[u8]) {
    for (row, bytes) in data.chunks(16).enumerate() {
        let line: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        println!("{:08x}: {}", addr + row as u64 * 16, line.join(" "));
    }
}
