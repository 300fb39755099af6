//! The lexical scope tree.
//!
//! Scopes are allocated by the parser — one for the program root, one per
//! function body, and one for each `if`, `switch`, `while`, `for`, `for-in`,
//! `with`, `catch` clause, and statement block — and live in a single arena
//! owned by the [`ScopeTree`].  Every syntax-tree node records the
//! [`ScopeId`] of its innermost enclosing scope.
//!
//! Unlike a pure compile-time symbol table, the bindings here hold live
//! runtime [`Value`]s: the same tree the parser builds is the one the
//! evaluator reads and mutates.  Name resolution walks the parent chain and
//! the first hit wins.

use std::collections::HashMap;

use crate::runtime::value::Value;

/// Opaque identifier for a [`Scope`] in the [`ScopeTree`].
pub type ScopeId = usize;

/// A single scope: a name→value binding table plus a parent link.
#[derive(Debug)]
pub struct Scope {
    /// Unique identifier within the [`ScopeTree`].
    pub id: ScopeId,
    /// The parent scope, or `None` for the program root.
    pub parent: Option<ScopeId>,
    /// Names bound directly in this scope.
    bindings: HashMap<String, Value>,
}

/// The arena of all scopes for one parsed program.
///
/// Index 0 is the program (global) scope; the parser allocates it first.
#[derive(Debug, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// Creates an empty tree.  The first [`alloc`][ScopeTree::alloc] call
    /// creates the root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new scope under `parent` and returns its id.
    pub fn alloc(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = self.scopes.len();
        self.scopes.push(Scope {
            id,
            parent,
            bindings: HashMap::new(),
        });
        id
    }

    /// The root (global) scope.
    pub fn root(&self) -> ScopeId {
        0
    }

    /// Number of scopes in the tree.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns `true` if no scopes have been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// The parent of `id`, or `None` at the root.
    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes[id].parent
    }

    /// The bindings held directly by `id`.
    pub fn bindings(&self, id: ScopeId) -> &HashMap<String, Value> {
        &self.scopes[id].bindings
    }

    /// Resolves `name` starting at `from` and walking up the parent chain.
    /// The nearest binding wins; `None` if no scope binds the name.
    pub fn lookup(&self, from: ScopeId, name: &str) -> Option<Value> {
        let mut cur = Some(from);
        while let Some(id) = cur {
            if let Some(v) = self.scopes[id].bindings.get(name) {
                return Some(v.clone());
            }
            cur = self.scopes[id].parent;
        }
        None
    }

    /// Assigns `name` starting at `from`: the nearest existing binding up
    /// the chain is overwritten.  If no scope binds the name, the binding is
    /// created in the root scope — never in an intermediate one.
    pub fn assign(&mut self, from: ScopeId, name: &str, value: Value) {
        let mut cur = Some(from);
        while let Some(id) = cur {
            if let Some(slot) = self.scopes[id].bindings.get_mut(name) {
                *slot = value;
                return;
            }
            cur = self.scopes[id].parent;
        }
        let root = self.root();
        self.scopes[root].bindings.insert(name.to_string(), value);
    }

    /// Writes `name` directly into `scope`, shadowing any outer binding.
    /// Used by `var` declarations, parameter binding, and the `this` /
    /// `arguments` installation at call time.
    pub fn declare(&mut self, scope: ScopeId, name: &str, value: Value) {
        self.scopes[scope].bindings.insert(name.to_string(), value);
    }

    /// Removes the nearest binding of `name` up the chain from `from`, if
    /// any (the `delete` operator).
    pub fn remove(&mut self, from: ScopeId, name: &str) {
        let mut cur = Some(from);
        while let Some(id) = cur {
            if self.scopes[id].bindings.remove(name).is_some() {
                return;
            }
            cur = self.scopes[id].parent;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_chain() -> (ScopeTree, ScopeId, ScopeId, ScopeId) {
        let mut tree = ScopeTree::new();
        let root = tree.alloc(None);
        let mid = tree.alloc(Some(root));
        let leaf = tree.alloc(Some(mid));
        (tree, root, mid, leaf)
    }

    #[test]
    fn test_lookup_walks_parent_chain() {
        let (mut tree, root, _mid, leaf) = tree_with_chain();
        tree.declare(root, "x", Value::number(1.0));
        let found = tree.lookup(leaf, "x").unwrap();
        assert_eq!(found.as_number(), Some(1.0));
        assert!(tree.lookup(leaf, "y").is_none());
    }

    #[test]
    fn test_nearest_binding_shadows() {
        let (mut tree, root, mid, leaf) = tree_with_chain();
        tree.declare(root, "x", Value::number(1.0));
        tree.declare(mid, "x", Value::number(2.0));
        assert_eq!(tree.lookup(leaf, "x").unwrap().as_number(), Some(2.0));
        assert_eq!(tree.lookup(root, "x").unwrap().as_number(), Some(1.0));
    }

    #[test]
    fn test_assign_overwrites_nearest() {
        let (mut tree, root, mid, leaf) = tree_with_chain();
        tree.declare(root, "x", Value::number(1.0));
        tree.declare(mid, "x", Value::number(2.0));
        tree.assign(leaf, "x", Value::number(9.0));
        assert_eq!(tree.lookup(mid, "x").unwrap().as_number(), Some(9.0));
        // The outer binding is untouched.
        assert_eq!(tree.lookup(root, "x").unwrap().as_number(), Some(1.0));
    }

    #[test]
    fn test_assign_miss_creates_in_root_not_intermediate() {
        let (mut tree, root, mid, leaf) = tree_with_chain();
        tree.assign(leaf, "fresh", Value::number(7.0));
        assert!(tree.bindings(leaf).is_empty());
        assert!(tree.bindings(mid).is_empty());
        assert_eq!(tree.lookup(root, "fresh").unwrap().as_number(), Some(7.0));
    }

    #[test]
    fn test_remove_unbinds_nearest_only() {
        let (mut tree, root, mid, leaf) = tree_with_chain();
        tree.declare(root, "x", Value::number(1.0));
        tree.declare(mid, "x", Value::number(2.0));
        tree.remove(leaf, "x");
        assert_eq!(tree.lookup(leaf, "x").unwrap().as_number(), Some(1.0));
        tree.remove(leaf, "x");
        assert!(tree.lookup(leaf, "x").is_none());
        tree.remove(leaf, "x"); // removing an unbound name is a no-op
    }

    #[test]
    fn test_parent_chains_terminate_at_root() {
        let (tree, root, _mid, leaf) = tree_with_chain();
        let mut cur = leaf;
        while let Some(p) = tree.parent(cur) {
            cur = p;
        }
        assert_eq!(cur, root);
    }
}
