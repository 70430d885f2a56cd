use crate::canvas::Canvas;
use crate::graph::Graph;
use crate::layout::{NodeState, ViewBox};
use crate::render::edge_path;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub direction: String,
    pub view_box: ViewBox,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub parent: Option<String>,
    pub depth: usize,
    pub state: NodeState,
    /// Top-left corner of the box in screen space.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
    pub path: String,
}

impl LayoutDump {
    /// Visible nodes in pre-order, with the edge from each non-root node to
    /// its parent.
    pub fn from_graph<C: Canvas>(graph: &Graph<C>) -> Self {
        let options = graph.options();
        let tree = graph.tree();
        let direction = options.direction;
        let (width, height) = (options.node.node_width, options.node.node_height);

        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        for idx in tree.descendants() {
            let node = tree.node(idx);
            let origin = direction.node_origin(node.position(), width, height);
            let parent = node.parent.map(|parent| tree.node(parent).id().to_string());
            nodes.push(NodeDump {
                id: node.id().to_string(),
                parent: parent.clone(),
                depth: node.depth,
                state: node.state(),
                x: origin.x,
                y: origin.y,
                width,
                height,
            });
            if let (Some(parent), Some(path)) = (parent, edge_path(tree, idx, options)) {
                edges.push(EdgeDump {
                    from: node.id().to_string(),
                    to: parent,
                    path,
                });
            }
        }

        LayoutDump {
            direction: direction.to_string(),
            view_box: graph.canvas().view_box(),
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump<C: Canvas>(path: &Path, graph: &Graph<C>) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_graph(graph);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
