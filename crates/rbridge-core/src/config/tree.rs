//! Hierarchical configuration tree with glob-style path queries
//!
//! A [`ConfigTree`] is an ordered hierarchy of named nodes. Each node holds
//! either a scalar [`Value`] or a subtree. Queries accept `/`-separated
//! paths where `*` matches exactly one segment and `**` matches zero or
//! more segments; matches are returned in preorder, so a query against a
//! fixed tree shape always yields the same match order.
//!
//! Trees are loaded from and dumped to JSON. JSON objects become subtrees
//! (member order preserved), arrays become subtrees keyed by decimal index,
//! and `null` becomes an empty subtree.

use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;

/// Scalar value held by a leaf node
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    /// String payload, if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean payload, if this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A node in the tree: a scalar leaf or a named subtree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Value),
    Tree(ConfigTree),
}

impl Node {
    /// Scalar payload, if this is a leaf
    pub fn value(&self) -> Option<&Value> {
        match self {
            Node::Scalar(v) => Some(v),
            Node::Tree(_) => None,
        }
    }

    /// Subtree, if this is an interior node
    pub fn tree(&self) -> Option<&ConfigTree> {
        match self {
            Node::Scalar(_) => None,
            Node::Tree(t) => Some(t),
        }
    }
}

/// Ordered hierarchy of named nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    children: Vec<(String, Node)>,
}

impl ConfigTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct child by name
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    /// Insert or replace a direct child
    pub fn insert(&mut self, name: &str, node: Node) {
        if let Some(slot) = self.child_mut(name) {
            *slot = node;
        } else {
            self.children.push((name.to_string(), node));
        }
    }

    /// Iterate direct children in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(n, node)| (n.as_str(), node))
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True if the tree has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn split_path(path: &str) -> Vec<&str> {
        path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// All nodes matching a glob path, in preorder
    pub fn get(&self, path: &str) -> Vec<&Node> {
        let segs = Self::split_path(path);
        let mut out = Vec::new();
        if !segs.is_empty() {
            self.collect(&segs, &mut out);
        }
        out
    }

    /// First node matching a glob path
    pub fn get_first(&self, path: &str) -> Option<&Node> {
        self.get(path).into_iter().next()
    }

    /// String scalar at a glob path, if the first match is one
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get_first(path)?.value()?.as_str()
    }

    /// Integer scalar at a glob path, if the first match is one
    pub fn get_int(&self, path: &str) -> Option<i64> {
        self.get_first(path)?.value()?.as_int()
    }

    fn collect<'a>(&'a self, segs: &[&str], out: &mut Vec<&'a Node>) {
        let (first, rest) = match segs.split_first() {
            Some(split) => split,
            None => return,
        };
        match *first {
            "**" => {
                if rest.is_empty() {
                    // `**` as the final segment matches every descendant
                    for (_, node) in &self.children {
                        Self::push_unique(out, node);
                        if let Node::Tree(sub) = node {
                            sub.collect(segs, out);
                        }
                    }
                } else {
                    // zero segments consumed here...
                    self.collect(rest, out);
                    // ...or descend one level and try again
                    for (_, node) in &self.children {
                        if let Node::Tree(sub) = node {
                            sub.collect(segs, out);
                        }
                    }
                }
            }
            "*" => {
                for (_, node) in &self.children {
                    if rest.is_empty() {
                        Self::push_unique(out, node);
                    } else if let Node::Tree(sub) = node {
                        sub.collect(rest, out);
                    }
                }
            }
            name => {
                if let Some(node) = self.child(name) {
                    if rest.is_empty() {
                        Self::push_unique(out, node);
                    } else if let Node::Tree(sub) = node {
                        sub.collect(rest, out);
                    }
                }
            }
        }
    }

    // Overlapping wildcard patterns (e.g. `**/**/x`) can reach the same
    // node through several expansions; keep the first occurrence only.
    fn push_unique<'a>(out: &mut Vec<&'a Node>, node: &'a Node) {
        if !out.iter().any(|n| std::ptr::eq(*n, node)) {
            out.push(node);
        }
    }

    /// Set the scalar at a path, creating missing literal segments.
    ///
    /// Wildcard segments must resolve against existing nodes: the pattern
    /// up to and including the first literal after the last wildcard is
    /// matched against the tree (first preorder match wins), and only the
    /// remaining literal tail is created. A pattern whose wildcard part
    /// matches nothing fails with [`Error::PathNotFound`].
    pub fn set(&mut self, path: &str, value: Value) -> Result<()> {
        let segs = Self::split_path(path);
        if segs.is_empty() {
            return Err(Error::PathNotFound(path.to_string()));
        }
        let last_wild = segs.iter().rposition(|s| *s == "*" || *s == "**");
        match last_wild {
            None => {
                self.create_chain(&segs, value);
                Ok(())
            }
            Some(k) => {
                // Anchor on the literal right after the last wildcard
                if k + 1 >= segs.len() {
                    return Err(Error::PathNotFound(path.to_string()));
                }
                let anchor = &segs[..k + 2];
                let tail = &segs[k + 2..];
                let node = self
                    .find_first_mut(anchor)
                    .ok_or_else(|| Error::PathNotFound(path.to_string()))?;
                if tail.is_empty() {
                    *node = Node::Scalar(value);
                    Ok(())
                } else {
                    match node {
                        Node::Tree(sub) => {
                            sub.create_chain(tail, value);
                            Ok(())
                        }
                        Node::Scalar(_) => Err(Error::NodeShape {
                            path: path.to_string(),
                            expected: "subtree",
                        }),
                    }
                }
            }
        }
    }

    fn create_chain(&mut self, segs: &[&str], value: Value) {
        let (first, rest) = segs.split_first().expect("non-empty path");
        if rest.is_empty() {
            self.insert(first, Node::Scalar(value));
            return;
        }
        if !matches!(self.child(first), Some(Node::Tree(_))) {
            self.insert(first, Node::Tree(ConfigTree::new()));
        }
        match self.child_mut(first) {
            Some(Node::Tree(sub)) => sub.create_chain(rest, value),
            _ => unreachable!("just inserted a subtree"),
        }
    }

    fn find_first_mut(&mut self, segs: &[&str]) -> Option<&mut Node> {
        let (first, rest) = segs.split_first()?;
        match *first {
            "**" => {
                if !rest.is_empty() {
                    // zero-segment expansion first, preorder
                    let zero_hit = {
                        // borrow checker: probe immutably, then re-resolve
                        let mut probe = Vec::new();
                        self.collect(rest, &mut probe);
                        !probe.is_empty()
                    };
                    if zero_hit {
                        return self.find_first_mut(rest);
                    }
                }
                for (_, node) in self.children.iter_mut() {
                    if let Node::Tree(sub) = node {
                        if sub.find_first_probe(segs) {
                            return sub.find_first_mut(segs);
                        }
                    }
                }
                None
            }
            "*" => {
                for (_, node) in self.children.iter_mut() {
                    if rest.is_empty() {
                        return Some(node);
                    }
                    if let Node::Tree(sub) = node {
                        if sub.find_first_probe(rest) {
                            return sub.find_first_mut(rest);
                        }
                    }
                }
                None
            }
            name => {
                let node = self.child_mut(name)?;
                if rest.is_empty() {
                    Some(node)
                } else {
                    match node {
                        Node::Tree(sub) => sub.find_first_mut(rest),
                        Node::Scalar(_) => None,
                    }
                }
            }
        }
    }

    fn find_first_probe(&self, segs: &[&str]) -> bool {
        let mut probe = Vec::new();
        self.collect(segs, &mut probe);
        !probe.is_empty()
    }

    /// Load a tree from a JSON string
    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(s).map_err(|e| Error::ConfigLoad {
                path: "<string>".to_string(),
                reason: e.to_string(),
            })?;
        match node_from_json(&value) {
            Node::Tree(tree) => Ok(tree),
            Node::Scalar(_) => Err(Error::ConfigLoad {
                path: "<string>".to_string(),
                reason: "top-level value is a scalar, expected an object or array".to_string(),
            }),
        }
    }

    /// Load a tree from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&text).map_err(|e| match e {
            Error::ConfigLoad { reason, .. } => Error::ConfigLoad {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Dump the tree as pretty-printed JSON
    pub fn to_json_string(&self) -> String {
        let value = tree_to_json(self);
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

fn node_from_json(value: &serde_json::Value) -> Node {
    use serde_json::Value as J;
    match value {
        J::Object(map) => {
            let mut tree = ConfigTree::new();
            for (key, sub) in map {
                tree.insert(key, node_from_json(sub));
            }
            Node::Tree(tree)
        }
        J::Array(items) => {
            let mut tree = ConfigTree::new();
            for (idx, sub) in items.iter().enumerate() {
                tree.insert(&idx.to_string(), node_from_json(sub));
            }
            Node::Tree(tree)
        }
        J::Null => Node::Tree(ConfigTree::new()),
        J::String(s) => Node::Scalar(Value::Str(s.clone())),
        J::Bool(b) => Node::Scalar(Value::Bool(*b)),
        J::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::Scalar(Value::Int(i))
            } else {
                Node::Scalar(Value::Float(n.as_f64().unwrap_or(0.0)))
            }
        }
    }
}

fn tree_to_json(tree: &ConfigTree) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (name, node) in tree.iter() {
        let value = match node {
            Node::Tree(sub) => tree_to_json(sub),
            Node::Scalar(Value::Str(s)) => serde_json::Value::String(s.clone()),
            Node::Scalar(Value::Int(n)) => serde_json::Value::from(*n),
            Node::Scalar(Value::Float(x)) => serde_json::Value::from(*x),
            Node::Scalar(Value::Bool(b)) => serde_json::Value::Bool(*b),
        };
        map.insert(name.to_string(), value);
    }
    serde_json::Value::Object(map)
}
