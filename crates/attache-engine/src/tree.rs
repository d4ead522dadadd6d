//! Shared declaration tree
//!
//! Nodes are keyed by fully-qualified class path. Node creation goes through
//! the map's entry API, so two writers asking for the same path always end up
//! holding the same node. Each node carries its own lock and decorators only
//! ever touch the node they fetched.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::signature::{DeclType, MethodSignature, Parameter};

/// Contents of one class node: method name to signature, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    methods: BTreeMap<String, MethodSignature>,
}

impl Scope {
    /// Look up a method by name.
    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.get(name)
    }

    /// All methods in name order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodSignature> {
        self.methods.values()
    }

    /// Number of methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether the scope has no methods.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

/// Handle to the node for one class path.
#[derive(Debug, Clone)]
pub struct ScopedNode {
    path: Arc<str>,
    scope: Arc<Mutex<Scope>>,
}

impl ScopedNode {
    fn new(path: &str) -> Self {
        Self {
            path: Arc::from(path),
            scope: Arc::new(Mutex::new(Scope::default())),
        }
    }

    /// Class path this node belongs to.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Add a method, replacing any existing method of the same name.
    pub fn create_method(&self, name: &str, parameters: Vec<Parameter>, return_type: DeclType) {
        let signature = MethodSignature::new(name, parameters, return_type);
        self.scope.lock().methods.insert(signature.name.clone(), signature);
    }

    /// Look up a method by name.
    pub fn method(&self, name: &str) -> Option<MethodSignature> {
        self.scope.lock().methods.get(name).cloned()
    }

    /// Number of methods in the node.
    pub fn len(&self) -> usize {
        self.scope.lock().len()
    }

    /// Whether the node has no methods.
    pub fn is_empty(&self) -> bool {
        self.scope.lock().is_empty()
    }

    /// Copy of the node's current contents.
    pub fn snapshot(&self) -> Scope {
        self.scope.lock().clone()
    }
}

/// Path-addressed tree of synthesized declarations.
///
/// Shared by every decorator in a generation run.
#[derive(Debug, Default)]
pub struct DeclarationTree {
    nodes: DashMap<String, ScopedNode>,
}

impl DeclarationTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the node for `path`, creating it if it does not exist yet.
    pub fn create_path_if_absent(&self, path: &str) -> ScopedNode {
        if let Some(node) = self.nodes.get(path) {
            return node.value().clone();
        }
        self.nodes
            .entry(path.to_string())
            .or_insert_with(|| ScopedNode::new(path))
            .value()
            .clone()
    }

    /// Fetch an existing node.
    pub fn get(&self, path: &str) -> Option<ScopedNode> {
        self.nodes.get(path).map(|entry| entry.value().clone())
    }

    /// Whether a node exists for `path`.
    pub fn contains_path(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// Number of class nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.nodes.iter().map(|entry| entry.key().clone()).collect();
        paths.sort();
        paths
    }

    /// Deterministic copy of the whole tree.
    pub fn snapshot(&self) -> BTreeMap<String, Scope> {
        self.nodes
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().snapshot()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree() {
        let tree = DeclarationTree::new();
        assert!(tree.is_empty());
        assert!(tree.get("Post").is_none());
        assert!(tree.paths().is_empty());
    }

    #[test]
    fn test_create_path_is_idempotent() {
        let tree = DeclarationTree::new();
        let first = tree.create_path_if_absent("Post");
        first.create_method("photo", vec![], DeclType::AttachedOne);

        let second = tree.create_path_if_absent("Post");
        assert_eq!(tree.len(), 1);
        assert_eq!(second.len(), 1);
        assert!(second.method("photo").is_some());
    }

    #[test]
    fn test_create_method_overwrites_in_place() {
        let tree = DeclarationTree::new();
        let node = tree.create_path_if_absent("Post");
        node.create_method("photo", vec![], DeclType::Unknown);
        node.create_method("photo", vec![], DeclType::AttachedOne);

        assert_eq!(node.len(), 1);
        assert_eq!(node.method("photo").unwrap().return_type, DeclType::AttachedOne);
    }

    #[test]
    fn test_nodes_are_isolated_by_path() {
        let tree = DeclarationTree::new();
        tree.create_path_if_absent("Post")
            .create_method("photo", vec![], DeclType::AttachedOne);
        tree.create_path_if_absent("Admin::Post")
            .create_method("avatar", vec![], DeclType::AttachedOne);

        assert_eq!(tree.paths(), vec!["Admin::Post", "Post"]);
        assert!(tree.get("Post").unwrap().method("avatar").is_none());
        assert!(tree.get("Admin::Post").unwrap().method("photo").is_none());
    }

    #[test]
    fn test_concurrent_get_or_create_keeps_all_writes() {
        let tree = DeclarationTree::new();
        std::thread::scope(|s| {
            for i in 0..8 {
                let tree = &tree;
                s.spawn(move || {
                    let node = tree.create_path_if_absent("Post");
                    node.create_method(&format!("m{}", i), vec![], DeclType::Unknown);
                });
            }
        });

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get("Post").unwrap().len(), 8);
    }

    #[test]
    fn test_snapshot_orders_methods_by_name() {
        let tree = DeclarationTree::new();
        let node = tree.create_path_if_absent("Post");
        node.create_method("photo", vec![], DeclType::AttachedOne);
        node.create_method("blogs", vec![], DeclType::AttachedMany);

        let snapshot = tree.snapshot();
        let names: Vec<_> = snapshot["Post"].methods().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["blogs", "photo"]);
    }
}
