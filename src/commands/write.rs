//! Write command implementation

use super::CommandError;
use rbridge_core::{Bridge, RequestContext, Status};

/// Run the write command: encode `--value` little-endian into exactly
/// `--size` bytes and write them at `--addr`
pub fn run(bridge: &mut dyn Bridge, ctx: &RequestContext) -> Result<Status, CommandError> {
    let addr = ctx.addr.ok_or(CommandError::MissingArgument("--addr"))?;
    let size = ctx.size.ok_or(CommandError::MissingArgument("--size"))?;
    let value = ctx.value.ok_or(CommandError::MissingArgument("--value"))?;
    if addr.checked_add(size).is_none() {
        return Err(CommandError::InvalidArgument(format!(
            "writing {} byte(s) at 0x{:x} runs past the end of the address space",
            size, addr
        )));
    }

    let buffer = encode_le(value, size)?;
    bridge.write(addr, &buffer)?;
    log::info!("wrote 0x{:x} ({} bytes) at 0x{:x}", value, size, addr);

    Ok(0)
}

/// Little-endian encoding of `value` into exactly `size` bytes; bytes past
/// the eighth are zero, and a value too wide for `size` is rejected
fn encode_le(value: u64, size: u64) -> Result<Vec<u8>, CommandError> {
    if size == 0 {
        return Err(CommandError::InvalidArgument(
            "--size must be at least 1 for write".to_string(),
        ));
    }
    if size < 8 && value >> (size * 8) != 0 {
        return Err(CommandError::InvalidArgument(format!(
            "value 0x{:x} does not fit in {} byte(s)",
            value, size
        )));
    }
    let le = value.to_le_bytes();
    let mut buffer = vec![0u8; size as usize];
    let used = usize::min(8, size as usize);
    buffer[..used].copy_from_slice(&le[..used]);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_le() {
        assert_eq!(
            encode_le(0xdeadbeef, 4).unwrap(),
            vec![0xef, 0xbe, 0xad, 0xde]
        );
        assert_eq!(encode_le(0x42, 1).unwrap(), vec![0x42]);
        // wider than the value: zero padded
        assert_eq!(
            encode_le(0x0102, 12).unwrap(),
            vec![0x02, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_encode_le_rejects_oversized_values() {
        assert!(encode_le(0x1ff, 1).is_err());
        assert!(encode_le(1, 0).is_err());
    }
}
