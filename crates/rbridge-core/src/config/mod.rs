//! Configuration tree and resolution

mod resolver;
mod tree;

pub use resolver::{
    fallback_tree, resolve, write_snapshot, ChipLookup, EnvChipLookup, ResolveOptions,
    CONFIG_PATH_ENV,
};
pub use tree::{ConfigTree, Node, Value};
