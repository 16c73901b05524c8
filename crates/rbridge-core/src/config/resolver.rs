//! Configuration resolution
//!
//! Builds the single [`ConfigTree`] a run works against, merging three
//! possible sources with fixed precedence:
//!
//! 1. an explicit configuration file (`--config`) — loaded verbatim, chip
//!    name and overlays are ignored entirely;
//! 2. a chip name (`--chip`) — resolved through the chip-lookup capability,
//!    falling back to a minimal default tree when the capability is absent;
//! 3. neither — resolution fails before any bridge is constructed.
//!
//! Boot-mode, cable and proxy-port overlays apply only to chip-derived
//! trees, after the base tree is built.

use crate::config::tree::{ConfigTree, Node, Value};
use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the chip configuration search path
/// (colon-separated directories)
pub const CONFIG_PATH_ENV: &str = "RBRIDGE_CONFIG_PATH";

/// Lookup capability for chip-derived configuration trees.
///
/// Queries use the `system=<chip>` form. Implementations return every
/// matching tree; the resolver adopts the first one.
pub trait ChipLookup {
    fn find(&self, query: &str) -> Result<Vec<ConfigTree>>;
}

/// Chip lookup backed by the `RBRIDGE_CONFIG_PATH` environment variable.
///
/// A `system=<chip>` query resolves to the first `<dir>/<chip>.json` found
/// along the search path.
pub struct EnvChipLookup {
    dirs: Vec<PathBuf>,
}

impl EnvChipLookup {
    /// Resolve the capability from the environment. `None` when the search
    /// path variable is unset: the capability is absent and the resolver
    /// uses the fallback tree instead.
    pub fn from_env() -> Option<Self> {
        let raw = env::var(CONFIG_PATH_ENV).ok()?;
        Some(Self {
            dirs: raw.split(':').filter(|s| !s.is_empty()).map(PathBuf::from).collect(),
        })
    }

    /// Build a lookup over explicit directories (tests, embedding)
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }
}

impl ChipLookup for EnvChipLookup {
    fn find(&self, query: &str) -> Result<Vec<ConfigTree>> {
        let chip = query.strip_prefix("system=").ok_or_else(|| Error::ConfigLoad {
            path: query.to_string(),
            reason: "unsupported lookup query".to_string(),
        })?;
        let mut found = Vec::new();
        for dir in &self.dirs {
            let candidate = dir.join(format!("{}.json", chip));
            if candidate.is_file() {
                found.push(ConfigTree::from_json_file(&candidate)?);
            }
        }
        if found.is_empty() {
            return Err(Error::ConfigLoad {
                path: query.to_string(),
                reason: format!("no configuration for chip '{}' on {}", chip, CONFIG_PATH_ENV),
            });
        }
        Ok(found)
    }
}

/// Caller-specified configuration sources and overlays
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Explicit configuration file; highest precedence
    pub config: Option<PathBuf>,
    /// Chip name for lookup-based resolution
    pub chip: Option<String>,
    /// Overlay for `**/debug-bridge/boot-mode`
    pub boot_mode: Option<String>,
    /// Overlay for `**/debug-bridge/cable/type`
    pub cable: Option<String>,
    /// Overlay for `**/debug-bridge/cable/port` (proxy-mode cables)
    pub port: Option<u16>,
}

/// Minimal default tree for a chip without an installed configuration.
///
/// Pure and infallible: an empty debug-bridge node plus a chip node
/// carrying only the chip's name.
pub fn fallback_tree(chip: &str) -> ConfigTree {
    let mut tree = ConfigTree::new();
    tree.insert("debug-bridge", Node::Tree(ConfigTree::new()));
    let mut chip_node = ConfigTree::new();
    chip_node.insert("name", Node::Scalar(Value::from(chip)));
    tree.insert("chip", Node::Tree(chip_node));
    tree
}

/// Build the run's configuration tree from the given sources.
///
/// `lookup` is the chip-lookup capability, resolved once at startup;
/// `None` means the capability is absent and chip resolution takes the
/// fallback path. A present-but-failing lookup is an error, not a silent
/// fallback.
pub fn resolve(
    options: &ResolveOptions,
    lookup: Option<&dyn ChipLookup>,
) -> Result<ConfigTree> {
    if let Some(path) = &options.config {
        // Explicit file wins; chip name and overlays are ignored
        let tree = ConfigTree::from_json_file(path)?;
        log::debug!("configuration loaded from {}", path.display());
        return Ok(tree);
    }

    let chip = options.chip.as_deref().ok_or(Error::MissingConfig)?;

    let mut tree = match lookup {
        Some(lookup) => {
            let query = format!("system={}", chip);
            let mut trees = lookup.find(&query)?;
            if trees.is_empty() {
                return Err(Error::ConfigLoad {
                    path: query,
                    reason: "lookup returned no configuration".to_string(),
                });
            }
            log::debug!("chip '{}' resolved through lookup service", chip);
            trees.remove(0)
        }
        None => {
            log::debug!(
                "no chip lookup service ({} unset), using fallback tree for '{}'",
                CONFIG_PATH_ENV,
                chip
            );
            fallback_tree(chip)
        }
    };

    if let Some(boot_mode) = &options.boot_mode {
        tree.set("**/debug-bridge/boot-mode", Value::from(boot_mode.as_str()))?;
    }
    if let Some(cable) = &options.cable {
        tree.set("**/debug-bridge/cable/type", Value::from(cable.as_str()))?;
    }
    if let Some(port) = options.port {
        tree.set("**/debug-bridge/cable/port", Value::Int(port as i64))?;
    }

    Ok(tree)
}

/// Write a snapshot of a resolved tree next to the run (side artifact for
/// chip-derived configurations)
pub fn write_snapshot(tree: &ConfigTree, path: &Path) -> Result<()> {
    std::fs::write(path, tree.to_json_string())?;
    log::info!("resolved configuration written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct FixedLookup(ConfigTree);

    impl ChipLookup for FixedLookup {
        fn find(&self, _query: &str) -> Result<Vec<ConfigTree>> {
            Ok(vec![self.0.clone()])
        }
    }

    struct BrokenLookup;

    impl ChipLookup for BrokenLookup {
        fn find(&self, query: &str) -> Result<Vec<ConfigTree>> {
            Err(Error::ConfigLoad {
                path: query.to_string(),
                reason: "malformed".to_string(),
            })
        }
    }

    fn chip_options(chip: &str) -> ResolveOptions {
        ResolveOptions {
            chip: Some(chip.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_fallback_never_fails_and_names_chip() {
        for chip in ["gap", "wolfe", "fulmine", "some-unknown-chip"] {
            let tree = resolve(&chip_options(chip), None).unwrap();
            assert_eq!(tree.get_str("**/chip/name"), Some(chip));
            assert!(tree.get_first("**/debug-bridge").is_some());
        }
    }

    #[test]
    fn test_overlays_apply_to_chip_tree() {
        let base = ConfigTree::from_json_str(
            r#"{
                "debug-bridge": {
                    "boot-mode": "rom",
                    "cable": { "type": "ftdi" }
                }
            }"#,
        )
        .unwrap();
        let options = ResolveOptions {
            chip: Some("gap".to_string()),
            boot_mode: Some("jtag".to_string()),
            cable: Some("dummy".to_string()),
            port: Some(4567),
            ..Default::default()
        };
        let tree = resolve(&options, Some(&FixedLookup(base))).unwrap();
        assert_eq!(tree.get_str("debug-bridge/boot-mode"), Some("jtag"));
        assert_eq!(tree.get_str("debug-bridge/cable/type"), Some("dummy"));
        assert_eq!(tree.get_int("debug-bridge/cable/port"), Some(4567));
    }

    #[test]
    fn test_overlays_on_fallback_tree() {
        let options = ResolveOptions {
            chip: Some("gap".to_string()),
            boot_mode: Some("jtag".to_string()),
            cable: Some("dummy".to_string()),
            ..Default::default()
        };
        let tree = resolve(&options, None).unwrap();
        assert_eq!(tree.get_str("**/debug-bridge/boot-mode"), Some("jtag"));
        assert_eq!(tree.get_str("**/debug-bridge/cable/type"), Some("dummy"));
    }

    #[test]
    fn test_explicit_config_ignores_chip_and_overlays() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "debug-bridge": {{ "boot-mode": "rom", "cable": {{ "type": "ftdi" }} }} }}"#
        )
        .unwrap();
        let options = ResolveOptions {
            config: Some(file.path().to_path_buf()),
            chip: Some("gap".to_string()),
            boot_mode: Some("jtag".to_string()),
            cable: Some("dummy".to_string()),
            port: Some(9999),
        };
        let tree = resolve(&options, None).unwrap();
        // loaded verbatim, no mutation
        assert_eq!(tree.get_str("debug-bridge/boot-mode"), Some("rom"));
        assert_eq!(tree.get_str("debug-bridge/cable/type"), Some("ftdi"));
        assert!(tree.get("debug-bridge/cable/port").is_empty());
        assert!(tree.get("**/chip/name").is_empty());
    }

    #[test]
    fn test_explicit_config_parse_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();
        let options = ResolveOptions {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let err = resolve(&options, None).unwrap_err();
        assert!(matches!(err, Error::ConfigLoad { .. }));
    }

    #[test]
    fn test_no_source_is_missing_config() {
        let err = resolve(&ResolveOptions::default(), None).unwrap_err();
        assert!(matches!(err, Error::MissingConfig));
    }

    #[test]
    fn test_present_but_failing_lookup_is_an_error() {
        // A lookup service that exists but cannot answer must not be
        // treated like an absent one
        let err = resolve(&chip_options("gap"), Some(&BrokenLookup)).unwrap_err();
        assert!(matches!(err, Error::ConfigLoad { .. }));
    }

    #[test]
    fn test_env_lookup_finds_first_match() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("gap.json"),
            r#"{ "debug-bridge": {}, "chip": { "name": "gap" } }"#,
        )
        .unwrap();
        let lookup = EnvChipLookup::with_dirs(vec![dir.path().to_path_buf()]);
        let trees = lookup.find("system=gap").unwrap();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].get_str("chip/name"), Some("gap"));

        let err = lookup.find("system=nosuchchip").unwrap_err();
        assert!(matches!(err, Error::ConfigLoad { .. }));
    }
}
