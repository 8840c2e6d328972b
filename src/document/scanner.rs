//! Depth-first walker over arbitrary JSON trees.
//!
//! The scanner visits every mapping reachable from the roots it is given,
//! in document order. Sequences are walked element by element; scalars are
//! ignored.
//!
//! # Identity tracking
//!
//! Nodes are tracked by address, so a node handed to the same scanner twice
//! (directly, or because one root is contained in another) is visited once.
//! The visited set belongs to one `Scanner` value and is dropped with it.
//!
//! Recursion depth is bounded by `serde_json`'s parser nesting limit.

use std::collections::HashSet;

use serde_json::{Map, Value};

/// What the visitor wants done with the children of the node it just saw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Walk into the node's values
    Descend,
    /// Leave the node's values alone; siblings are still walked
    Skip,
}

/// One traversal's worth of visited state
#[derive(Debug, Default)]
pub struct Scanner {
    visited: HashSet<*const Value>,
}

impl Scanner {
    /// Create a scanner with an empty visited set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct container nodes seen so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Walk `root`, calling `visit` on every mapping not yet seen
    pub fn scan<'a, F>(&mut self, root: &'a Value, visit: &mut F)
    where
        F: FnMut(&'a Map<String, Value>) -> Visit,
    {
        match root {
            Value::Object(map) => {
                if !self.visited.insert(root as *const Value) {
                    return;
                }
                if visit(map) == Visit::Skip {
                    return;
                }
                for child in map.values() {
                    self.scan(child, visit);
                }
            }
            Value::Array(items) => {
                if !self.visited.insert(root as *const Value) {
                    return;
                }
                for child in items {
                    self.scan(child, visit);
                }
            }
            _ => {}
        }
    }
}
