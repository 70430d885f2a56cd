//! Per-direction coordinate policy. The layout engine always works in a
//! top-down space (x along siblings, y along depth); everything here maps
//! that space onto the screen for one of the four directions.

use crate::ir::Direction;

use super::curve::{EdgeCurve, curved_edge_horizontal, curved_edge_vertical};
use super::{Point, PositionedNode, ViewBox};

impl Direction {
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Layout space to screen space.
    pub fn swap(self, p: Point) -> Point {
        match self {
            Self::Top => p,
            Self::Bottom => Point::new(p.x, -p.y),
            Self::Left => Point::new(p.y, p.x),
            Self::Right => Point::new(-p.y, p.x),
        }
    }

    /// Screen space back to layout space.
    pub fn unswap(self, p: Point) -> Point {
        match self {
            Self::Top => p,
            Self::Bottom => Point::new(p.x, -p.y),
            Self::Left => Point::new(p.y, p.x),
            Self::Right => Point::new(p.y, -p.x),
        }
    }

    /// Top-left corner of a `width` x `height` node box whose layout
    /// position is `p`.
    pub fn node_origin(self, p: Point, width: f32, height: f32) -> Point {
        let s = self.swap(p);
        match self {
            Self::Top => Point::new(s.x - width / 2.0, s.y),
            Self::Bottom => Point::new(s.x - width / 2.0, s.y - height),
            Self::Left => Point::new(s.x, s.y - height / 2.0),
            Self::Right => Point::new(s.x - width, s.y - height / 2.0),
        }
    }

    /// Where the edge to the parent leaves a node: the middle of the side
    /// facing the parent.
    pub fn edge_start(self, origin: Point, width: f32, height: f32) -> Point {
        match self {
            Self::Top => Point::new(origin.x + width / 2.0, origin.y),
            Self::Bottom => Point::new(origin.x + width / 2.0, origin.y + height),
            Self::Left => Point::new(origin.x, origin.y + height / 2.0),
            Self::Right => Point::new(origin.x + width, origin.y + height / 2.0),
        }
    }

    pub fn edge_mid(self, origin: Point, width: f32, height: f32) -> Point {
        self.edge_start(origin, width, height)
    }

    /// Where edges to the children enter a parent: the middle of the side
    /// facing its children.
    pub fn edge_parent_end(self, origin: Point, width: f32, height: f32) -> Point {
        match self {
            Self::Top => Point::new(origin.x + width / 2.0, origin.y + height),
            Self::Bottom => Point::new(origin.x + width / 2.0, origin.y),
            Self::Left => Point::new(origin.x + width, origin.y + height / 2.0),
            Self::Right => Point::new(origin.x, origin.y + height / 2.0),
        }
    }

    /// `[sibling axis, depth axis]` size of one node for the layout engine.
    pub fn node_flex_size(
        self,
        node_width: f32,
        node_height: f32,
        sibling_spacing: f32,
        children_spacing: f32,
    ) -> [f32; 2] {
        if self.is_vertical() {
            [node_width + sibling_spacing, node_height + children_spacing]
        } else {
            [node_height + sibling_spacing, node_width + children_spacing]
        }
    }

    pub fn calculate_edge(self) -> EdgeCurve {
        if self.is_vertical() {
            curved_edge_vertical
        } else {
            curved_edge_horizontal
        }
    }

    /// Screen-space box around the visible subtree of `root`. The trailing
    /// children spacing below the deepest row is split evenly before the
    /// first and after the last row.
    pub fn view_box_dimensions(self, root: &PositionedNode, children_spacing: f32) -> ViewBox {
        let ext = root.extents;
        let half = children_spacing / 2.0;
        let top_left = Point::new(root.x + ext.left, root.y + ext.top - half);
        let bottom_right = Point::new(root.x + ext.right, root.y + ext.bottom - half);
        let a = self.swap(top_left);
        let b = self.swap(bottom_right);
        ViewBox::new(
            a.x.min(b.x),
            a.y.min(b.y),
            (a.x - b.x).abs(),
            (a.y - b.y).abs(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeRecord;
    use crate::layout::Extents;
    use serde_json::Map;

    fn node_at(x: f32, y: f32, extents: Extents) -> PositionedNode {
        PositionedNode {
            record: NodeRecord {
                id: "root".to_string(),
                name: String::new(),
                options: None,
                data: Map::new(),
            },
            x,
            y,
            flex_size: [100.0, 80.0],
            depth: 0,
            parent: None,
            children: Vec::new(),
            hidden_children: Vec::new(),
            extents,
            edge: None,
        }
    }

    #[test]
    fn unswap_inverts_swap() {
        let p = Point::new(3.5, -7.25);
        for direction in Direction::ALL {
            assert_eq!(direction.unswap(direction.swap(p)), p, "{direction}");
        }
    }

    #[test]
    fn left_swap_is_involutive() {
        let p = Point::new(10.0, 40.0);
        let left = Direction::Left;
        assert_eq!(left.swap(left.swap(p)), p);
        assert_eq!(Direction::Top.swap(p), p);
        assert_eq!(Direction::Bottom.swap(p), Point::new(10.0, -40.0));
    }

    #[test]
    fn flex_size_flips_axes_for_horizontal_directions() {
        assert_eq!(Direction::Top.node_flex_size(50.0, 30.0, 10.0, 20.0), [60.0, 50.0]);
        assert_eq!(Direction::Bottom.node_flex_size(50.0, 30.0, 10.0, 20.0), [60.0, 50.0]);
        assert_eq!(Direction::Left.node_flex_size(50.0, 30.0, 10.0, 20.0), [40.0, 70.0]);
        assert_eq!(Direction::Right.node_flex_size(50.0, 30.0, 10.0, 20.0), [40.0, 70.0]);
    }

    #[test]
    fn anchors_face_each_other() {
        // Child one level below its parent in layout space.
        let (w, h) = (50.0, 30.0);
        let parent = Point::new(0.0, 0.0);
        let child = Point::new(0.0, 80.0);
        for direction in Direction::ALL {
            let parent_end = direction.edge_parent_end(direction.node_origin(parent, w, h), w, h);
            let child_start = direction.edge_start(direction.node_origin(child, w, h), w, h);
            let gap = ((child_start.x - parent_end.x).powi(2)
                + (child_start.y - parent_end.y).powi(2))
            .sqrt();
            let expected = if direction.is_vertical() { 80.0 - h } else { 80.0 - w };
            assert!((gap - expected).abs() < 1e-4, "{direction}: {gap}");
        }
    }

    #[test]
    fn top_origin_centres_the_box() {
        let origin = Direction::Top.node_origin(Point::new(100.0, 20.0), 50.0, 30.0);
        assert_eq!(origin, Point::new(75.0, 20.0));
        let start = Direction::Top.edge_start(origin, 50.0, 30.0);
        assert_eq!(start, Point::new(100.0, 20.0));
    }

    #[test]
    fn view_box_is_non_negative_and_honours_asymmetry() {
        let extents = Extents {
            left: -250.0,
            top: 0.0,
            right: 50.0,
            bottom: 240.0,
        };
        let root = node_at(0.0, 0.0, extents);
        for direction in Direction::ALL {
            let vb = direction.view_box_dimensions(&root, 50.0);
            assert!(vb.width >= 0.0 && vb.height >= 0.0, "{direction}");
        }
        let top = Direction::Top.view_box_dimensions(&root, 50.0);
        assert_eq!(top, ViewBox::new(-250.0, -25.0, 300.0, 240.0));
        let left = Direction::Left.view_box_dimensions(&root, 50.0);
        assert_eq!(left, ViewBox::new(-25.0, -250.0, 240.0, 300.0));
        let bottom = Direction::Bottom.view_box_dimensions(&root, 50.0);
        assert_eq!(bottom, ViewBox::new(-250.0, -215.0, 300.0, 240.0));
    }

    #[test]
    fn edge_curve_follows_orientation() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 100.0);
        let vertical = (Direction::Top.calculate_edge())(a, b, a, Default::default());
        let horizontal = (Direction::Left.calculate_edge())(a, b, a, Default::default());
        assert_ne!(vertical, horizontal);
    }
}
