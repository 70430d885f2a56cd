use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::ir::{NodeRecord, TreeNode};

use super::{Extents, NodeIndex, NodeState, PositionedNode};

/// Arena of positioned nodes plus an id index. Parent links are arena
/// indices, so nothing in the tree owns its parent.
#[derive(Debug, Clone)]
pub struct PositionedTree {
    nodes: Vec<PositionedNode>,
    index: HashMap<String, NodeIndex>,
    root: NodeIndex,
}

impl PositionedTree {
    pub fn from_tree(data: &TreeNode) -> Result<Self> {
        let mut tree = Self {
            nodes: Vec::with_capacity(data.node_count()),
            index: HashMap::new(),
            root: 0,
        };
        // Pre-order with an explicit stack: arena indices follow the same
        // order `descendants` reports, and depth never grows the call stack.
        let mut stack: Vec<(&TreeNode, Option<NodeIndex>, usize)> = vec![(data, None, 0)];
        while let Some((node, parent, depth)) = stack.pop() {
            let idx = tree.insert(node, parent, depth)?;
            if let Some(parent) = parent {
                tree.nodes[parent].children.push(idx);
            }
            stack.extend(node.children.iter().rev().map(|child| (child, Some(idx), depth + 1)));
        }
        Ok(tree)
    }

    fn insert(&mut self, data: &TreeNode, parent: Option<NodeIndex>, depth: usize) -> Result<NodeIndex> {
        let idx = self.nodes.len();
        if self.index.insert(data.id.clone(), idx).is_some() {
            return Err(Error::DuplicateNodeId {
                id: data.id.clone(),
            });
        }
        self.nodes.push(PositionedNode {
            record: NodeRecord::from(data),
            x: 0.0,
            y: 0.0,
            flex_size: [0.0, 0.0],
            depth,
            parent,
            children: Vec::with_capacity(data.children.len()),
            hidden_children: Vec::new(),
            extents: Extents::default(),
            edge: None,
        });
        Ok(idx)
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn root_node(&self) -> &PositionedNode {
        &self.nodes[self.root]
    }

    pub fn node(&self, idx: NodeIndex) -> &PositionedNode {
        &self.nodes[idx]
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> &mut PositionedNode {
        &mut self.nodes[idx]
    }

    pub fn find(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&PositionedNode> {
        self.find(id).map(|idx| &self.nodes[idx])
    }

    /// Like [`PositionedTree::find`], but misses nodes that sit under a
    /// collapsed ancestor.
    pub fn find_visible(&self, id: &str) -> Option<NodeIndex> {
        self.find(id).filter(|&idx| self.is_visible(idx))
    }

    /// True when every ancestor of `idx` shows its children.
    pub fn is_visible(&self, idx: NodeIndex) -> bool {
        let mut current = idx;
        while let Some(parent) = self.nodes[current].parent {
            if !self.nodes[parent].children.contains(&current) {
                return false;
            }
            current = parent;
        }
        true
    }

    /// Total number of nodes, hidden ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PositionedNode> {
        self.nodes.iter()
    }

    /// Visible nodes in depth-first pre-order, root first.
    pub fn descendants(&self) -> Vec<NodeIndex> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            out.push(idx);
            stack.extend(self.nodes[idx].children.iter().rev().copied());
        }
        out
    }

    /// `idx` followed by its ancestors up to the root.
    pub fn path_to_root(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut path = vec![idx];
        let mut current = idx;
        while let Some(parent) = self.nodes[current].parent {
            path.push(parent);
            current = parent;
        }
        path
    }

    pub fn state(&self, idx: NodeIndex) -> NodeState {
        self.nodes[idx].state()
    }

    /// Hides the children of `idx` and of every node below it.
    /// Returns false when `idx` had nothing visible to hide.
    pub fn collapse(&mut self, idx: NodeIndex) -> bool {
        if self.nodes[idx].children.is_empty() {
            return false;
        }
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            // Already collapsed nodes keep what they hid.
            if self.nodes[current].children.is_empty() {
                continue;
            }
            let children = std::mem::take(&mut self.nodes[current].children);
            stack.extend_from_slice(&children);
            self.nodes[current].hidden_children = children;
        }
        true
    }

    /// Restores the hidden children of `idx` and of every node below it.
    /// Returns false when `idx` had nothing hidden.
    pub fn expand(&mut self, idx: NodeIndex) -> bool {
        if self.nodes[idx].hidden_children.is_empty() {
            return false;
        }
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if self.nodes[current].hidden_children.is_empty() {
                continue;
            }
            let children = std::mem::take(&mut self.nodes[current].hidden_children);
            stack.extend_from_slice(&children);
            self.nodes[current].children = children;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        TreeNode::new("A", "a").with_children(vec![
            TreeNode::new("B", "b").with_children(vec![
                TreeNode::new("D", "d"),
                TreeNode::new("E", "e").with_children(vec![TreeNode::new("F", "f")]),
            ]),
            TreeNode::new("C", "c"),
        ])
    }

    fn ids(tree: &PositionedTree, order: &[NodeIndex]) -> Vec<String> {
        order.iter().map(|&i| tree.node(i).id().to_string()).collect()
    }

    fn assert_exclusive(tree: &PositionedTree) {
        for node in tree.iter() {
            assert!(
                node.children.is_empty() || node.hidden_children.is_empty(),
                "{} has both visible and hidden children",
                node.id()
            );
        }
    }

    #[test]
    fn descendants_are_pre_order() {
        let tree = PositionedTree::from_tree(&sample()).unwrap();
        assert_eq!(ids(&tree, &tree.descendants()), ["A", "B", "D", "E", "F", "C"]);
        assert_eq!(tree.get("F").unwrap().depth, 3);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let data = TreeNode::new("A", "").with_children(vec![TreeNode::new("A", "")]);
        let err = PositionedTree::from_tree(&data).unwrap_err();
        assert!(matches!(err, Error::DuplicateNodeId { id } if id == "A"));
    }

    #[test]
    fn collapse_hides_the_whole_subtree() {
        let mut tree = PositionedTree::from_tree(&sample()).unwrap();
        let b = tree.find("B").unwrap();
        assert!(tree.collapse(b));
        assert_eq!(ids(&tree, &tree.descendants()), ["A", "B", "C"]);
        assert_eq!(tree.state(b), NodeState::Collapsed);
        assert_eq!(tree.state(tree.find("E").unwrap()), NodeState::Collapsed);
        assert_eq!(tree.state(tree.find("D").unwrap()), NodeState::Leaf);
        assert!(!tree.collapse(b));
        assert_exclusive(&tree);
    }

    #[test]
    fn expand_restores_recursively() {
        let mut tree = PositionedTree::from_tree(&sample()).unwrap();
        let before = tree.descendants();
        let a = tree.root();
        tree.collapse(a);
        assert_eq!(tree.descendants(), vec![a]);
        assert!(tree.expand(a));
        assert_eq!(tree.descendants(), before);
        assert!(!tree.expand(a));
        assert_exclusive(&tree);
    }

    #[test]
    fn path_to_root_follows_parent_links() {
        let tree = PositionedTree::from_tree(&sample()).unwrap();
        let f = tree.find("F").unwrap();
        assert_eq!(ids(&tree, &tree.path_to_root(f)), ["F", "E", "B", "A"]);
    }

    #[test]
    fn arbitrary_sequences_keep_children_exclusive() {
        let mut tree = PositionedTree::from_tree(&sample()).unwrap();
        let order = ["E", "B", "A", "B", "E", "A", "C", "B", "A", "A"];
        for (step, id) in order.iter().enumerate() {
            let idx = tree.find(id).unwrap();
            if step % 2 == 0 {
                tree.collapse(idx);
            } else {
                tree.expand(idx);
            }
            assert_exclusive(&tree);
        }
    }

    #[test]
    fn nodes_under_a_collapsed_ancestor_are_not_visible() {
        let mut tree = PositionedTree::from_tree(&sample()).unwrap();
        let b = tree.find("B").unwrap();
        tree.collapse(b);
        assert!(tree.is_visible(b));
        assert_eq!(tree.find_visible("B"), Some(b));
        assert!(tree.find("F").is_some());
        assert_eq!(tree.find_visible("F"), None);
        assert_eq!(tree.find_visible("E"), None);
        assert_eq!(tree.find_visible("missing"), None);
        tree.expand(b);
        assert!(tree.find_visible("F").is_some());
    }

    #[test]
    fn deep_chains_do_not_exhaust_the_stack() {
        const DEPTH: usize = 20_000;
        let mut data = TreeNode::new(format!("n{DEPTH}"), "");
        for level in (0..DEPTH).rev() {
            data = TreeNode::new(format!("n{level}"), "").with_children(vec![data]);
        }
        assert_eq!(data.node_count(), DEPTH + 1);

        let mut tree = PositionedTree::from_tree(&data).unwrap();
        let leaf = tree.find(&format!("n{DEPTH}")).unwrap();
        assert_eq!(tree.node(leaf).depth, DEPTH);
        assert_eq!(tree.path_to_root(leaf).len(), DEPTH + 1);

        let root = tree.root();
        assert!(tree.collapse(root));
        assert_eq!(tree.descendants(), vec![root]);
        assert!(!tree.is_visible(leaf));
        assert!(tree.expand(root));
        assert_eq!(tree.descendants().len(), DEPTH + 1);
        assert!(tree.is_visible(leaf));
    }
}
