use serde::Serialize;

use crate::ir::NodeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Bounding box of a subtree, relative to the subtree root's layout position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Extents {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Extents {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ViewBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn to_attr(&self) -> String {
        format!(
            "{:.2} {:.2} {:.2} {:.2}",
            self.x, self.y, self.width, self.height
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    Expanded,
    Collapsed,
    Leaf,
}

pub type NodeIndex = usize;

#[derive(Debug, Clone)]
pub struct PositionedNode {
    pub record: NodeRecord,
    /// Centre along the sibling axis, in layout space.
    pub x: f32,
    /// Top along the depth axis, in layout space.
    pub y: f32,
    /// `[sibling axis, depth axis]` size handed to the layout engine.
    pub flex_size: [f32; 2],
    pub depth: usize,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
    pub hidden_children: Vec<NodeIndex>,
    pub extents: Extents,
    /// Id of the rendered edge to the parent, set on each render pass.
    pub edge: Option<String>,
}

impl PositionedNode {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn state(&self) -> NodeState {
        if !self.children.is_empty() {
            NodeState::Expanded
        } else if !self.hidden_children.is_empty() {
            NodeState::Collapsed
        } else {
            NodeState::Leaf
        }
    }
}
