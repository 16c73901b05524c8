//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Parse a string as a hex or decimal u64
fn parse_hex_u64(s: &str) -> Result<u64, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u64>().map_err(|e| format!("Invalid number: {}", e))
    }
}

#[derive(Parser)]
#[command(name = "rbridge")]
#[command(author, version, about = "Debug bridge for embedded targets", long_about = None)]
#[command(after_help = "Run without commands to list the available commands.")]
pub struct Cli {
    /// Commands to execute against the target, in order
    pub commands: Vec<String>,

    /// Explicit configuration file (highest precedence; --chip, --cable,
    /// --boot-mode and --port are ignored when given)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Chip name for lookup-based configuration
    #[arg(long)]
    pub chip: Option<String>,

    /// Cable type override (e.g. dummy)
    #[arg(long)]
    pub cable: Option<String>,

    /// Boot mode override
    #[arg(long)]
    pub boot_mode: Option<String>,

    /// Binary to load onto the target (repeatable)
    #[arg(long = "binary")]
    pub binaries: Vec<PathBuf>,

    /// Target address for read/write (hex or decimal)
    #[arg(long, value_parser = parse_hex_u64)]
    pub addr: Option<u64>,

    /// Access size in bytes for read/write (hex or decimal)
    #[arg(long, value_parser = parse_hex_u64)]
    pub size: Option<u64>,

    /// Value to write, little-endian encoded into --size bytes
    #[arg(long, value_parser = parse_hex_u64)]
    pub value: Option<u64>,

    /// Proxy-mode cable port
    #[arg(long)]
    pub port: Option<u16>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Surface full diagnostics for command errors instead of a one-line
    /// report
    #[arg(long)]
    pub debug: bool,

    /// Script reference for the script command: entry@path or bare path
    /// (repeatable)
    #[arg(long = "script")]
    pub scripts: Vec<String>,

    /// Port for the RSP server started by the gdb command
    #[arg(long, default_value_t = 2345)]
    pub rsp_port: u16,

    /// Write a snapshot of the resolved configuration to this path
    /// (chip-derived configurations only)
    #[arg(long)]
    pub config_out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_u64() {
        assert_eq!(parse_hex_u64("4096").unwrap(), 4096);
        assert_eq!(parse_hex_u64("0x1000").unwrap(), 4096);
        assert_eq!(parse_hex_u64("0XdeadBEEF").unwrap(), 0xdead_beef);
        assert!(parse_hex_u64("0xzz").is_err());
        assert!(parse_hex_u64("nope").is_err());
    }

    #[test]
    fn test_positional_commands_keep_order() {
        let cli = Cli::parse_from(["rbridge", "load", "start", "wait", "--chip", "gap"]);
        assert_eq!(cli.commands, ["load", "start", "wait"]);
        assert_eq!(cli.chip.as_deref(), Some("gap"));
    }

    #[test]
    fn test_repeatable_flags() {
        let cli = Cli::parse_from([
            "rbridge",
            "script",
            "--script",
            "a.so",
            "--script",
            "init@b.so",
            "--binary",
            "app.elf",
        ]);
        assert_eq!(cli.scripts, ["a.so", "init@b.so"]);
        assert_eq!(cli.binaries, [PathBuf::from("app.elf")]);
        assert_eq!(cli.rsp_port, 2345);
    }
}
