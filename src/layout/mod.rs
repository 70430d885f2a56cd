mod curve;
mod direction;
pub mod flextree;
mod tree;
pub(crate) mod types;
pub use curve::{
    EdgeCurve, EdgeOffset, MAX_CORNER_RADIUS, corner_radius, curved_edge_horizontal,
    curved_edge_vertical,
};
pub use tree::PositionedTree;
pub use types::*;

use crate::config::Options;
use crate::ir::Direction;
use flextree::FlexTree;

/// Lays out the visible part of `tree` from scratch. Hidden subtrees keep
/// whatever coordinates they had when they were last visible.
pub fn compute_layout(tree: &mut PositionedTree, direction: Direction, options: &Options) {
    let flex_size = direction.node_flex_size(
        options.node.node_width,
        options.node.node_height,
        options.sibling_spacing,
        options.children_spacing,
    );
    let visible = tree.descendants();

    let mut slots = vec![usize::MAX; tree.len()];
    let mut flex = FlexTree::with_capacity(visible.len());
    let mut flex_parent: Vec<Option<usize>> = Vec::with_capacity(visible.len());
    for &idx in &visible {
        let slot = flex.add_node(flex_size[0], flex_size[1]);
        slots[idx] = slot;
        let parent_slot = tree.node(idx).parent.map(|parent| slots[parent]);
        if let Some(parent_slot) = parent_slot {
            flex.add_child(parent_slot, slot);
        }
        flex_parent.push(parent_slot);
    }

    // Adjacent subtrees under different parents get one more sibling gap.
    let cousin_gap = options.sibling_spacing;
    flex.layout(slots[tree.root()], |a, b| {
        if flex_parent[a] == flex_parent[b] {
            0.0
        } else {
            cousin_gap
        }
    });

    for &idx in &visible {
        let placed = flex.node(slots[idx]);
        let node = tree.node_mut(idx);
        node.x = placed.x;
        node.y = placed.y;
        node.flex_size = flex_size;
        tracing::trace!(id = %node.record.id, x = node.x, y = node.y, "placed node");
    }
    update_extents(tree, &visible);

    tracing::debug!(
        nodes = visible.len(),
        direction = %direction,
        width = tree.root_node().extents.width(),
        height = tree.root_node().extents.height(),
        "computed tree layout"
    );
}

/// Subtree bounding boxes, children before parents.
fn update_extents(tree: &mut PositionedTree, pre_order: &[NodeIndex]) {
    for &idx in pre_order.iter().rev() {
        let node = tree.node(idx);
        let [w, h] = node.flex_size;
        let mut left = node.x - w / 2.0;
        let mut right = node.x + w / 2.0;
        let mut top = node.y;
        let mut bottom = node.y + h;
        for &child in &node.children {
            let c = tree.node(child);
            left = left.min(c.x + c.extents.left);
            right = right.max(c.x + c.extents.right);
            top = top.min(c.y + c.extents.top);
            bottom = bottom.max(c.y + c.extents.bottom);
        }
        let (x, y) = (node.x, node.y);
        tree.node_mut(idx).extents = Extents {
            left: left - x,
            top: top - y,
            right: right - x,
            bottom: bottom - y,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TreeNode;

    fn sample() -> TreeNode {
        TreeNode::new("A", "a").with_children(vec![
            TreeNode::new("B", "b").with_children(vec![
                TreeNode::new("D", "d"),
                TreeNode::new("E", "e"),
            ]),
            TreeNode::new("C", "c"),
        ])
    }

    #[test]
    fn flex_size_includes_spacing() {
        let mut tree = PositionedTree::from_tree(&sample()).unwrap();
        let options = Options::default();
        compute_layout(&mut tree, Direction::Top, &options);
        let root = tree.root_node();
        assert_eq!(root.flex_size, [100.0, 80.0]);
        assert_eq!(root.x, 0.0);
        assert_eq!(tree.get("B").unwrap().y, 80.0);
        assert_eq!(tree.get("D").unwrap().y, 160.0);
    }

    #[test]
    fn extents_cover_the_visible_subtree() {
        let mut tree = PositionedTree::from_tree(&sample()).unwrap();
        compute_layout(&mut tree, Direction::Top, &Options::default());
        let root = tree.root_node();
        assert_eq!(root.extents.top, 0.0);
        assert_eq!(root.extents.bottom, 240.0);
        for node in tree.iter() {
            let [w, _] = node.flex_size;
            assert!(node.x - w / 2.0 >= root.x + root.extents.left - 1e-3);
            assert!(node.x + w / 2.0 <= root.x + root.extents.right + 1e-3);
        }
    }

    #[test]
    fn collapsed_subtrees_are_skipped() {
        let mut tree = PositionedTree::from_tree(&sample()).unwrap();
        let options = Options::default();
        let b = tree.find("B").unwrap();
        tree.collapse(b);
        compute_layout(&mut tree, Direction::Top, &options);
        let root = tree.root_node();
        assert_eq!(root.extents.bottom, 160.0);
        assert_eq!(root.extents.width(), 200.0);
    }

    #[test]
    fn cousins_get_an_extra_gap() {
        let data = TreeNode::new("A", "a").with_children(vec![
            TreeNode::new("B", "b").with_children(vec![TreeNode::new("D", "d")]),
            TreeNode::new("C", "c").with_children(vec![TreeNode::new("F", "f")]),
        ]);
        let mut tree = PositionedTree::from_tree(&data).unwrap();
        compute_layout(&mut tree, Direction::Top, &Options::default());
        let x = |id: &str| tree.get(id).unwrap().x;
        assert_eq!(x("C") - x("B"), 150.0);
        assert_eq!(x("F") - x("D"), 150.0);
        assert_eq!(x("A"), 0.0);
    }
}
