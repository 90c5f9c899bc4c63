//! Category filter prefix tree
//!
//! A [`CategoryFilterTree`] is built once from a list of [`CategoryFilter`]s
//! and maps any dot-separated category name to an effective threshold. Given
//! the filters
//!
//! ```text
//! a      (error)
//! a.b.c  (trace)
//! a.b.x  (trace)
//! aa     (error)
//! aa.b   (warn)
//! ```
//!
//! the tree looks like this:
//!
//! ```text
//! |- a (error) -- b - c (trace)
//! |               |
//! |               `-- x (trace)
//! |
//! `- aa (error) - b (warn)
//! ```
//!
//! Resolution walks the query category segment by segment; the deepest node
//! carrying an explicit level wins, and the tree's default level applies when
//! no node along the path has one.

use crate::LogLevel;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::TryReserveError;

/// A (category, level) pair supplied by configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    /// Dot-separated category name, e.g. `"app.net.tcp"`
    #[serde(rename = "cat", default)]
    pub category: String,

    /// Threshold for the category and its subcategories
    #[serde(rename = "lvl", default)]
    pub level: LogLevel,
}

impl CategoryFilter {
    pub fn new(category: impl Into<String>, level: LogLevel) -> Self {
        Self {
            category: category.into(),
            level,
        }
    }
}

/// One subcategory name produced by [`Subcategories`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subcategory<'a> {
    /// Byte offset of the name within the full category string
    pub offset: usize,
    /// Subcategory name, never empty
    pub name: &'a str,
    /// Whether the category string is exhausted after this name
    pub last: bool,
}

/// Iterates over subcategory names separated by `.`
///
/// Iteration stops at the first empty name, so `"a..b"` yields only `a`
/// (not marked as last) while `"a."` yields `a` as the last name.
#[derive(Debug, Clone)]
pub struct Subcategories<'a> {
    category: &'a str,
    pos: usize,
}

impl<'a> Subcategories<'a> {
    pub fn new(category: &'a str) -> Self {
        Self { category, pos: 0 }
    }
}

impl<'a> Iterator for Subcategories<'a> {
    type Item = Subcategory<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.category.get(self.pos..)?;
        let len = rest.find('.').unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        let offset = self.pos;
        // Skip the separator, if any
        self.pos = (offset + len + 1).min(self.category.len());
        Some(Subcategory {
            offset,
            name: &rest[..len],
            last: self.pos == self.category.len(),
        })
    }
}

/// Tree node for a single subcategory name
///
/// The name is not copied: it is a byte range into one of the category
/// strings owned by the tree.
#[derive(Debug, Clone)]
struct Node {
    source: usize,
    offset: usize,
    len: usize,
    level: Option<LogLevel>,
    nodes: Vec<Node>,
}

impl Node {
    fn new(source: usize, offset: usize, len: usize) -> Self {
        Self {
            source,
            offset,
            len,
            level: None,
            nodes: Vec::new(),
        }
    }

    fn name<'a>(&self, categories: &'a [String]) -> &'a str {
        &categories[self.source][self.offset..self.offset + self.len]
    }
}

/// Immutable prefix tree mapping category names to thresholds
#[derive(Debug, Clone)]
pub struct CategoryFilterTree {
    level: LogLevel,
    categories: Vec<String>,
    nodes: Vec<Node>,
}

impl CategoryFilterTree {
    /// Create a tree with a default level and no category filters
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            categories: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Build a tree from a list of category filters
    ///
    /// If an allocation fails midway, the result is the filterless tree with
    /// `level` as its only threshold; a partially built tree is never returned.
    pub fn build(level: LogLevel, filters: Vec<CategoryFilter>) -> Self {
        match Self::build_nodes(filters) {
            Ok((categories, nodes)) => Self {
                level,
                categories,
                nodes,
            },
            Err(_) => Self::new(level),
        }
    }

    fn build_nodes(
        filters: Vec<CategoryFilter>,
    ) -> Result<(Vec<String>, Vec<Node>), TryReserveError> {
        let mut categories = Vec::new();
        let mut levels = Vec::new();
        categories.try_reserve_exact(filters.len())?;
        levels.try_reserve_exact(filters.len())?;
        for filter in filters {
            categories.push(filter.category);
            levels.push(filter.level);
        }

        let mut nodes: Vec<Node> = Vec::new();
        for (source, level) in levels.iter().enumerate() {
            let mut siblings = &mut nodes;
            for sub in Subcategories::new(&categories[source]) {
                let index = match find_node(siblings, &categories, sub.name) {
                    Ok(index) => index,
                    Err(index) => {
                        siblings.try_reserve(1)?;
                        siblings.insert(index, Node::new(source, sub.offset, sub.name.len()));
                        index
                    }
                };
                let node = &mut siblings[index];
                if sub.last {
                    node.level = Some(*level);
                }
                siblings = &mut node.nodes;
            }
        }
        Ok((categories, nodes))
    }

    /// Resolve the effective threshold for a category
    ///
    /// `None` and the empty string resolve to the default level.
    pub fn level(&self, category: Option<&str>) -> LogLevel {
        let mut level = self.level;
        let Some(category) = category else {
            return level;
        };
        let mut nodes = self.nodes.as_slice();
        for sub in Subcategories::new(category) {
            let Ok(index) = find_node(nodes, &self.categories, sub.name) else {
                break;
            };
            let node = &nodes[index];
            if let Some(explicit) = node.level {
                level = explicit;
            }
            nodes = &node.nodes;
        }
        level
    }

    /// Level used when no filter matches
    pub fn default_level(&self) -> LogLevel {
        self.level
    }

    /// Whether the tree carries no category filters
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for CategoryFilterTree {
    fn default() -> Self {
        Self::new(LogLevel::Off)
    }
}

/// Binary search for a subcategory name among sorted siblings
///
/// Names compare bytewise; on a common prefix the shorter name sorts first.
/// Returns the matching index, or the insertion position if absent.
fn find_node(nodes: &[Node], categories: &[String], name: &str) -> Result<usize, usize> {
    nodes.binary_search_by(|node| compare_names(node.name(categories), name))
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}
