//! Dependent boolean flags.
//!
//! A `FlagTree` is a DAG of named flags. Each flag has a stored value set by
//! the caller and a cached output value:
//!
//! ```text
//! output(flag) = stored(flag) AND output(p1) AND ... AND output(pn)
//! ```
//!
//! so a flag only "holds true" while every ancestor does. UI code gates
//! behaviour on `holds_true` instead of nesting conditionals.
//!
//! # Consistency
//!
//! Every mutating call recomputes the outputs of all transitive descendants
//! of whatever it touched, in topological order, before returning. Outputs
//! are cached, so queries are a single lookup.
//!
//! Edges that would close a cycle are rejected with [`FlagError::Cycle`]
//! before anything is changed.
//!
//! # Usage
//!
//! ```
//! use sidetoggle_core::FlagTree;
//!
//! let mut flags = FlagTree::new();
//! flags.add("a", &[], &[], false)?;
//! flags.add("b", &["a"], &[], false)?;
//!
//! flags.make_true("a");
//! assert_eq!(flags.holds_true("b"), Some(false));
//! flags.make_true("b");
//! assert_eq!(flags.holds_true("b"), Some(true));
//! flags.make_false("a");
//! assert_eq!(flags.holds_true("b"), Some(false));
//! # Ok::<(), sidetoggle_core::FlagError>(())
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors produced by [`FlagTree`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlagError {
    #[error("flag not found: {0}")]
    NotFound(String),

    /// Adding `parent -> child` would make the graph cyclic.
    #[error("edge '{parent}' -> '{child}' would create a cycle")]
    Cycle { parent: String, child: String },

    #[error("invalid flag configuration for '{name}': {reason}")]
    InvalidConfiguration { name: String, reason: String },
}

/// Declarative description of one flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagDecl {
    pub value: bool,
    pub parents: Vec<String>,
    pub children: Vec<String>,
}

impl FlagDecl {
    pub fn new(value: bool) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }
}

/// Adjacency map used to build a whole tree at once.
///
/// Deserialises from a table of tables:
///
/// ```toml
/// [hideSidebar]
/// value = true
///
/// [buttonIsDisplayedNow]
/// parents = ["buttonAlwaysDisplayed"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagStructure {
    pub flags: BTreeMap<String, FlagDecl>,
}

impl FlagStructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, decl: FlagDecl) -> Self {
        self.flags.insert(name.into(), decl);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Flag {
    value: bool,
    output: bool,
    parents: Vec<String>,
    children: Vec<String>,
}

/// A DAG of AND-combined boolean flags.
#[derive(Debug, Clone, Default)]
pub struct FlagTree {
    flags: HashMap<String, Flag>,
    /// Insertion order, for stable iteration and `Display`.
    order: Vec<String>,
}

impl FlagTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a declarative structure.
    ///
    /// Endpoints referenced but not declared are created with value `false`.
    pub fn from_structure(structure: &FlagStructure) -> Result<Self, FlagError> {
        let mut tree = Self::new();

        for (name, decl) in &structure.flags {
            validate_name(name)?;
            tree.ensure(name);
            if let Some(flag) = tree.flags.get_mut(name) {
                flag.value = decl.value;
            }
            for endpoint in decl.parents.iter().chain(&decl.children) {
                validate_name(endpoint)?;
                tree.ensure(endpoint);
            }
        }

        for (name, decl) in &structure.flags {
            for parent in &decl.parents {
                tree.checked_link(parent, name)?;
            }
            for child in &decl.children {
                tree.checked_link(name, child)?;
            }
        }

        let all = tree.order.clone();
        tree.refresh(&all);
        Ok(tree)
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Insert or overwrite a flag.
    ///
    /// Overwriting drops the flag's previous edges. Missing parents and
    /// children are created with value `false`; duplicates are ignored.
    pub fn add(
        &mut self,
        name: &str,
        parents: &[&str],
        children: &[&str],
        initial: bool,
    ) -> Result<&mut Self, FlagError> {
        validate_name(name)?;
        let parents = dedup(parents);
        let children = dedup(children);
        for endpoint in parents.iter().chain(&children) {
            validate_name(endpoint)?;
        }

        // Cycle check against the graph as it will look once the old edges
        // of `name` are gone.
        for parent in &parents {
            if parent == name || children.contains(parent) {
                return Err(cycle(parent, name));
            }
        }
        for child in &children {
            if child == name {
                return Err(cycle(name, child));
            }
            for parent in &parents {
                if self.reaches(child, parent, Some(name)) {
                    return Err(cycle(parent, name));
                }
            }
        }

        let former_children = self.detach(name);
        self.ensure(name);
        for endpoint in parents.iter().chain(&children) {
            self.ensure(endpoint);
        }
        if let Some(flag) = self.flags.get_mut(name) {
            flag.value = initial;
        }
        for parent in &parents {
            self.link(parent, name);
        }
        for child in &children {
            self.link(name, child);
        }

        debug!(flag = %name, ?parents, ?children, initial, "added flag");
        let mut roots = former_children;
        roots.push(name.to_string());
        self.refresh(&roots);
        Ok(self)
    }

    /// Delete a flag. Its children lose one parent but stay in the tree.
    pub fn remove(&mut self, name: &str) -> &mut Self {
        if !self.contains(name) {
            debug!(flag = %name, "remove: unknown flag");
            return self;
        }
        let former_children = self.detach(name);
        self.flags.remove(name);
        self.order.retain(|n| n != name);
        self.refresh(&former_children);
        self
    }

    /// Add the edge `parent -> name` if both flags exist.
    pub fn add_parent_to(&mut self, name: &str, parent: &str) -> Result<&mut Self, FlagError> {
        let Some(flag) = self.flags.get(name) else {
            debug!(flag = %name, "add_parent_to: unknown flag");
            return Ok(self);
        };
        if !self.contains(parent) {
            debug!(flag = %name, parent = %parent, "add_parent_to: unknown parent");
            return Ok(self);
        }
        if flag.parents.iter().any(|p| p == parent) {
            return Ok(self);
        }

        self.checked_link(parent, name)?;
        self.refresh(&[name.to_string()]);
        Ok(self)
    }

    /// Remove the edge `parent -> name` if both flags exist.
    pub fn remove_parent_from(&mut self, name: &str, parent: &str) -> &mut Self {
        if !self.contains(name) || !self.contains(parent) {
            debug!(flag = %name, parent = %parent, "remove_parent_from: unknown flag");
            return self;
        }
        if let Some(flag) = self.flags.get_mut(name) {
            flag.parents.retain(|p| p != parent);
        }
        if let Some(flag) = self.flags.get_mut(parent) {
            flag.children.retain(|c| c != name);
        }
        self.refresh(&[name.to_string()]);
        self
    }

    // ========================================================================
    // Values
    // ========================================================================

    pub fn toggle(&mut self, name: &str) -> &mut Self {
        self.set_value(name, |v| !v)
    }

    pub fn make_true(&mut self, name: &str) -> &mut Self {
        self.set_value(name, |_| true)
    }

    pub fn make_false(&mut self, name: &str) -> &mut Self {
        self.set_value(name, |_| false)
    }

    /// Set the stored value directly.
    pub fn set(&mut self, name: &str, value: bool) -> &mut Self {
        self.set_value(name, |_| value)
    }

    /// Output value: the flag's own value AND every ancestor's.
    pub fn holds_true(&self, name: &str) -> Option<bool> {
        self.flags.get(name).map(|f| f.output)
    }

    /// Stored value, ignoring ancestors.
    pub fn is_true(&self, name: &str) -> Option<bool> {
        self.flags.get(name).map(|f| f.value)
    }

    /// Output value, or `NotFound`.
    pub fn output_of(&self, name: &str) -> Result<bool, FlagError> {
        self.holds_true(name)
            .ok_or_else(|| FlagError::NotFound(name.to_string()))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn contains(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Flag names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn parents_of(&self, name: &str) -> Option<&[String]> {
        self.flags.get(name).map(|f| f.parents.as_slice())
    }

    pub fn children_of(&self, name: &str) -> Option<&[String]> {
        self.flags.get(name).map(|f| f.children.as_slice())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn set_value(&mut self, name: &str, f: impl FnOnce(bool) -> bool) -> &mut Self {
        match self.flags.get_mut(name) {
            Some(flag) => {
                flag.value = f(flag.value);
                self.refresh(&[name.to_string()]);
            }
            None => debug!(flag = %name, "unknown flag"),
        }
        self
    }

    /// Create `name` with value `false` unless it exists.
    fn ensure(&mut self, name: &str) {
        if !self.flags.contains_key(name) {
            self.flags.insert(name.to_string(), Flag::default());
            self.order.push(name.to_string());
        }
    }

    /// Drop every edge touching `name`. Returns its former children.
    fn detach(&mut self, name: &str) -> Vec<String> {
        let Some(flag) = self.flags.get_mut(name) else {
            return Vec::new();
        };
        let parents = std::mem::take(&mut flag.parents);
        let children = std::mem::take(&mut flag.children);

        for parent in &parents {
            if let Some(p) = self.flags.get_mut(parent) {
                p.children.retain(|c| c != name);
            }
        }
        for child in &children {
            if let Some(c) = self.flags.get_mut(child) {
                c.parents.retain(|p| p != name);
            }
        }
        children
    }

    fn link(&mut self, parent: &str, child: &str) {
        if let Some(p) = self.flags.get_mut(parent) {
            if !p.children.iter().any(|c| c == child) {
                p.children.push(child.to_string());
            }
        }
        if let Some(c) = self.flags.get_mut(child) {
            if !c.parents.iter().any(|p| p == parent) {
                c.parents.push(parent.to_string());
            }
        }
    }

    fn checked_link(&mut self, parent: &str, child: &str) -> Result<(), FlagError> {
        if parent == child || self.reaches(child, parent, None) {
            return Err(cycle(parent, child));
        }
        self.link(parent, child);
        Ok(())
    }

    /// Whether `to` is reachable from `from` along child edges, never
    /// passing through `skip`.
    fn reaches(&self, from: &str, to: &str, skip: Option<&str>) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(name) = stack.pop() {
            if name == to {
                return true;
            }
            if Some(name) == skip || !seen.insert(name) {
                continue;
            }
            if let Some(flag) = self.flags.get(name) {
                stack.extend(flag.children.iter().map(String::as_str));
            }
        }
        false
    }

    /// Recompute outputs of `roots` and all their descendants.
    fn refresh(&mut self, roots: &[String]) {
        for name in self.topological_descendants(roots) {
            let Some(flag) = self.flags.get(&name) else {
                continue;
            };
            let output = flag.value
                && flag
                    .parents
                    .iter()
                    .all(|p| self.flags.get(p).is_some_and(|f| f.output));
            if let Some(flag) = self.flags.get_mut(&name) {
                flag.output = output;
            }
        }
    }

    /// Reverse DFS post-order over everything reachable from `roots`.
    fn topological_descendants(&self, roots: &[String]) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::new();
        // (flag, index of the next child to visit)
        let mut stack: Vec<(&str, usize)> = Vec::new();

        for root in roots {
            if !self.flags.contains_key(root.as_str()) || !seen.insert(root.as_str()) {
                continue;
            }
            stack.push((root.as_str(), 0));

            while let Some((name, next)) = stack.last_mut() {
                let children = self
                    .flags
                    .get(*name)
                    .map(|flag| flag.children.as_slice())
                    .unwrap_or_default();
                match children.get(*next) {
                    Some(child) => {
                        *next += 1;
                        if self.flags.contains_key(child.as_str()) && seen.insert(child.as_str()) {
                            stack.push((child.as_str(), 0));
                        }
                    }
                    None => {
                        out.push((*name).to_string());
                        stack.pop();
                    }
                }
            }
        }
        out.reverse();
        out
    }
}

impl fmt::Display for FlagTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        let mut first = true;
        for name in &self.order {
            let Some(flag) = self.flags.get(name) else {
                continue;
            };
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(
                f,
                "    \"{}\" -> v: {}; o: {}; p: {}; c: {}",
                name,
                flag.value,
                flag.output,
                flag.parents.join(","),
                flag.children.join(",")
            )?;
        }
        write!(f, "\n}}")
    }
}

fn validate_name(name: &str) -> Result<(), FlagError> {
    if name.trim().is_empty() {
        return Err(FlagError::InvalidConfiguration {
            name: name.to_string(),
            reason: "flag name must not be empty".into(),
        });
    }
    Ok(())
}

fn dedup(names: &[&str]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !out.iter().any(|n| n == name) {
            out.push((*name).to_string());
        }
    }
    out
}

fn cycle(parent: &str, child: &str) -> FlagError {
    FlagError::Cycle {
        parent: parent.to_string(),
        child: child.to_string(),
    }
}

static_assertions::assert_impl_all!(FlagTree: Send, Sync, Clone);

#[cfg(test)]
mod tests {
    use super::*;

    /// Output rule, checked for every flag.
    fn assert_consistent(tree: &FlagTree) {
        for name in tree.names() {
            let expected = tree.is_true(name).unwrap()
                && tree
                    .parents_of(name)
                    .unwrap()
                    .iter()
                    .all(|p| tree.holds_true(p).unwrap());
            assert_eq!(tree.holds_true(name), Some(expected), "flag {name}\n{tree}");
        }
    }

    fn chain(n: usize) -> FlagTree {
        let mut tree = FlagTree::new();
        tree.add("f0", &[], &[], true).unwrap();
        for i in 1..n {
            let parent = format!("f{}", i - 1);
            tree.add(&format!("f{i}"), &[parent.as_str()], &[], true).unwrap();
        }
        tree
    }

    #[test]
    fn test_round_trip_scenario() {
        let mut tree = FlagTree::new();
        tree.add("a", &[], &[], false).unwrap();
        tree.add("b", &["a"], &[], false).unwrap();

        tree.make_true("a");
        assert_eq!(tree.holds_true("b"), Some(false));

        tree.make_true("b");
        assert_eq!(tree.holds_true("b"), Some(true));

        tree.make_false("a");
        assert_eq!(tree.holds_true("b"), Some(false));
        assert_eq!(tree.is_true("b"), Some(true));
        assert_consistent(&tree);
    }

    #[test]
    fn test_missing_flags_are_absent() {
        let mut tree = FlagTree::new();
        assert_eq!(tree.holds_true("nope"), None);
        assert_eq!(tree.is_true("nope"), None);
        assert_eq!(tree.output_of("nope"), Err(FlagError::NotFound("nope".into())));

        tree.toggle("nope").make_true("nope").make_false("nope").remove("nope");
        tree.remove_parent_from("nope", "also_nope");
        tree.add_parent_to("nope", "also_nope").unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_add_auto_creates_endpoints() {
        let mut tree = FlagTree::new();
        tree.add("mid", &["top"], &["leaf"], true).unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.is_true("top"), Some(false));
        assert_eq!(tree.is_true("leaf"), Some(false));
        assert_eq!(tree.holds_true("mid"), Some(false));
        assert_eq!(tree.children_of("top").unwrap(), ["mid".to_string()]);
        assert_eq!(tree.parents_of("leaf").unwrap(), ["mid".to_string()]);
    }

    #[test]
    fn test_add_dedupes_lists() {
        let mut tree = FlagTree::new();
        tree.add("x", &["p", "p", "q"], &["c", "c"], true).unwrap();
        assert_eq!(tree.parents_of("x").unwrap().len(), 2);
        assert_eq!(tree.children_of("x").unwrap().len(), 1);
        assert_eq!(tree.children_of("p").unwrap().len(), 1);
    }

    #[test]
    fn test_add_overwrite_replaces_edges() {
        let mut tree = FlagTree::new();
        tree.add("p", &[], &[], false).unwrap();
        tree.add("x", &["p"], &["c"], true).unwrap();
        tree.make_true("c");
        assert_eq!(tree.holds_true("c"), Some(false));

        tree.add("x", &[], &[], true).unwrap();
        assert!(tree.children_of("p").unwrap().is_empty());
        assert!(tree.parents_of("c").unwrap().is_empty());
        assert_eq!(tree.holds_true("x"), Some(true));
        // Former child is recomputed without its old parent.
        assert_eq!(tree.holds_true("c"), Some(true));
        assert_consistent(&tree);
    }

    #[test]
    fn test_add_propagates_to_existing_children() {
        let mut tree = FlagTree::new();
        tree.add("child", &[], &[], true).unwrap();
        tree.add("grandchild", &["child"], &[], true).unwrap();
        assert_eq!(tree.holds_true("grandchild"), Some(true));

        tree.add("root", &[], &["child"], false).unwrap();
        assert_eq!(tree.holds_true("child"), Some(false));
        assert_eq!(tree.holds_true("grandchild"), Some(false));
    }

    #[test]
    fn test_cascade_reaches_every_descendant() {
        let mut tree = chain(6);
        assert_eq!(tree.holds_true("f5"), Some(true));

        tree.toggle("f0");
        for i in 0..6 {
            assert_eq!(tree.holds_true(&format!("f{i}")), Some(false));
        }

        tree.toggle("f0");
        assert_eq!(tree.holds_true("f5"), Some(true));
        assert_consistent(&tree);
    }

    #[test]
    fn test_deep_chain_cascade() {
        let mut tree = chain(20_000);
        assert_eq!(tree.holds_true("f19999"), Some(true));

        tree.toggle("f0");
        assert_eq!(tree.holds_true("f19999"), Some(false));
        assert_eq!(tree.holds_true("f10000"), Some(false));

        tree.make_true("f0");
        assert_eq!(tree.holds_true("f19999"), Some(true));
    }

    #[test]
    fn test_false_dominance() {
        let mut tree = FlagTree::new();
        tree.add("a", &[], &[], true).unwrap();
        tree.add("b", &[], &[], false).unwrap();
        tree.add("c", &["a", "b"], &[], true).unwrap();
        tree.add("d", &["c"], &[], false).unwrap();

        // b is false: c and d hold false.
        assert_eq!(tree.holds_true("c"), Some(false));
        assert_eq!(tree.holds_true("d"), Some(false));

        // Making b true frees c, but d's own value is still false.
        tree.make_true("b");
        assert_eq!(tree.holds_true("c"), Some(true));
        assert_eq!(tree.holds_true("d"), Some(false));

        tree.make_true("d");
        assert_eq!(tree.holds_true("d"), Some(true));

        tree.make_false("a");
        assert_eq!(tree.holds_true("d"), Some(false));
        assert_consistent(&tree);
    }

    #[test]
    fn test_diamond_recomputes_after_both_parents() {
        let mut tree = FlagTree::new();
        tree.add("top", &[], &[], true).unwrap();
        tree.add("left", &["top"], &[], true).unwrap();
        tree.add("right", &["top"], &[], true).unwrap();
        tree.add("bottom", &["left", "right"], &[], true).unwrap();
        assert_eq!(tree.holds_true("bottom"), Some(true));

        tree.make_false("top");
        assert_eq!(tree.holds_true("bottom"), Some(false));
        tree.make_true("top");
        assert_eq!(tree.holds_true("bottom"), Some(true));
        assert_consistent(&tree);
    }

    #[test]
    fn test_edge_mutations_cascade() {
        let mut tree = chain(3);
        tree.add("gate", &[], &[], false).unwrap();

        tree.add_parent_to("f1", "gate").unwrap();
        assert_eq!(tree.holds_true("f1"), Some(false));
        assert_eq!(tree.holds_true("f2"), Some(false));

        tree.remove_parent_from("f1", "gate");
        assert_eq!(tree.holds_true("f2"), Some(true));
        assert_consistent(&tree);
    }

    #[test]
    fn test_remove_keeps_children() {
        let mut tree = FlagTree::new();
        tree.add("gate", &[], &[], false).unwrap();
        tree.add("x", &["gate"], &["y"], true).unwrap();
        tree.make_true("y");
        assert_eq!(tree.holds_true("y"), Some(false));

        tree.remove("gate");
        assert!(!tree.contains("gate"));
        assert_eq!(tree.holds_true("x"), Some(true));
        assert_eq!(tree.holds_true("y"), Some(true));

        tree.remove("x");
        assert_eq!(tree.parents_of("y").unwrap().len(), 0);
        assert_eq!(tree.names().collect::<Vec<_>>(), vec!["y"]);
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut tree = chain(3);

        let err = tree.add_parent_to("f0", "f2").unwrap_err();
        assert!(matches!(err, FlagError::Cycle { .. }));
        assert!(tree.parents_of("f0").unwrap().is_empty());

        assert!(tree.add_parent_to("f1", "f1").is_err());
        assert!(tree.add("solo", &["solo"], &[], true).is_err());
        assert!(tree.add("x", &["f2"], &["f0"], true).is_err());
        assert!(tree.add("y", &["z"], &["z"], true).is_err());

        // Rejected adds leave the tree untouched.
        assert!(!tree.contains("x"));
        assert!(!tree.contains("z"));
        assert_eq!(tree.children_of("f0").unwrap(), ["f1".to_string()]);
        assert_consistent(&tree);
    }

    #[test]
    fn test_overwrite_may_reverse_an_edge() {
        // a -> b exists; redefining b as a parent of a is fine because b's
        // old edges are dropped first.
        let mut tree = FlagTree::new();
        tree.add("b", &["a"], &[], true).unwrap();
        tree.add("b", &[], &["a"], true).unwrap();
        assert_eq!(tree.parents_of("a").unwrap(), ["b".to_string()]);
        assert!(tree.parents_of("b").unwrap().is_empty());
    }

    #[test]
    fn test_empty_names_are_invalid() {
        let mut tree = FlagTree::new();
        assert!(matches!(
            tree.add("", &[], &[], true),
            Err(FlagError::InvalidConfiguration { .. })
        ));
        assert!(tree.add("ok", &[" "], &[], true).is_err());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_from_structure() {
        let structure = FlagStructure::new()
            .with("hideSidebar", FlagDecl::new(true))
            .with(
                "buttonIsDisplayedNow",
                FlagDecl::new(true).with_parents(["buttonAlwaysDisplayed"]),
            )
            .with("root", FlagDecl::new(true).with_children(["buttonAlwaysDisplayed"]));

        let mut tree = FlagTree::from_structure(&structure).unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.holds_true("hideSidebar"), Some(true));
        assert_eq!(tree.holds_true("buttonIsDisplayedNow"), Some(false));

        tree.make_true("buttonAlwaysDisplayed");
        assert_eq!(tree.holds_true("buttonIsDisplayedNow"), Some(true));
        tree.make_false("root");
        assert_eq!(tree.holds_true("buttonIsDisplayedNow"), Some(false));
        assert_consistent(&tree);
    }

    #[test]
    fn test_from_structure_rejects_cycles() {
        let structure = FlagStructure::new()
            .with("a", FlagDecl::new(true).with_parents(["b"]))
            .with("b", FlagDecl::new(true).with_parents(["a"]));
        assert!(matches!(
            FlagTree::from_structure(&structure),
            Err(FlagError::Cycle { .. })
        ));
    }

    #[test]
    fn test_structure_from_toml() {
        let structure: FlagStructure = toml::from_str(
            r#"
            [gate]
            value = true

            [leaf]
            value = true
            parents = ["gate"]
            "#,
        )
        .unwrap();
        let tree = FlagTree::from_structure(&structure).unwrap();
        assert_eq!(tree.holds_true("leaf"), Some(true));
    }

    #[test]
    fn test_display() {
        let mut tree = FlagTree::new();
        tree.add("a", &[], &["b"], true).unwrap();
        assert_eq!(
            tree.to_string(),
            "{\n    \"a\" -> v: true; o: true; p: ; c: b\n    \"b\" -> v: false; o: false; p: a; c: \n}"
        );
    }
}
