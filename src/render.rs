use crate::canvas::{Canvas, Element, ElementKind, RectStyle};
use crate::config::Options;
use crate::interaction::generate_styles;
use crate::layout::{EdgeOffset, NodeIndex, NodeState, PositionedTree};
use crate::theme::NodeStyle;
use anyhow::Result;
use std::path::Path;

pub const EXPAND_COLLAPSE_BUTTON_SIZE: f32 = 14.0;
pub const ROOT_GROUP_ID: &str = "tree-root";

pub fn node_group_id(id: &str) -> String {
    format!("node-{id}")
}

pub fn node_box_id(id: &str) -> String {
    format!("box-{id}")
}

pub fn node_content_id(id: &str) -> String {
    format!("content-{id}")
}

/// Id of the edge from `child` to its parent. A node has at most one parent
/// edge, so the child id alone keeps it unique whatever characters ids use.
pub fn edge_id(child: &str) -> String {
    format!("edge-{child}")
}

pub fn toggle_id(id: &str) -> String {
    format!("toggle-{id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Clears `canvas` and draws every visible node and edge of `tree`. Each
/// visible non-root node remembers the id of its edge; hidden nodes forget
/// theirs.
pub fn paint<C>(tree: &mut PositionedTree, options: &Options, canvas: &mut C) -> RenderSummary
where
    C: Canvas + ?Sized,
{
    canvas.clear();
    for idx in 0..tree.len() {
        tree.node_mut(idx).edge = None;
    }

    let visible = tree.descendants();
    let mut root_group = Element::group(0.0, 0.0)
        .with_id(ROOT_GROUP_ID)
        .with_attr("class", options.container_class_name.clone());
    let mut edges = Element::new(ElementKind::Group).with_attr("class", "edges");
    let mut nodes = Element::new(ElementKind::Group).with_attr("class", "nodes");
    let mut summary = RenderSummary::default();

    for &idx in visible.iter().skip(1) {
        if let Some(edge) = draw_edge(tree, idx, options) {
            tree.node_mut(idx).edge = edge.id.clone();
            edges.add(edge);
            summary.edges += 1;
        }
    }
    for &idx in &visible {
        nodes.add(draw_node(tree, idx, options));
        summary.nodes += 1;
    }

    root_group.add(edges);
    root_group.add(nodes);
    canvas.add(root_group);
    tracing::debug!(nodes = summary.nodes, edges = summary.edges, "painted tree");
    summary
}

/// Path data of the edge between `idx` and its parent.
pub fn edge_path(tree: &PositionedTree, idx: NodeIndex, options: &Options) -> Option<String> {
    let node = tree.node(idx);
    let parent = tree.node(node.parent?);
    let direction = options.direction;
    let (w, h) = (options.node.node_width, options.node.node_height);
    let child_origin = direction.node_origin(node.position(), w, h);
    let parent_origin = direction.node_origin(parent.position(), w, h);
    let source = direction.edge_start(child_origin, w, h);
    let target = direction.edge_parent_end(parent_origin, w, h);
    let mid = direction.edge_mid(child_origin, w, h);
    Some((direction.calculate_edge())(source, target, mid, EdgeOffset::default()))
}

fn draw_edge(tree: &PositionedTree, idx: NodeIndex, options: &Options) -> Option<Element> {
    let node = tree.node(idx);
    let parent = tree.node(node.parent?);
    let d = edge_path(tree, idx, options)?;
    Some(
        Element::path(d)
            .with_id(edge_id(node.id()))
            .with_attr("class", "edge")
            .with_attr("data-self", node.id())
            .with_attr("data-parent", parent.id())
            .with_attr("fill", "none")
            .with_attr("stroke", options.edge_color.clone())
            .with_attr("stroke-width", options.edge_width.to_string()),
    )
}

fn draw_node(tree: &PositionedTree, idx: NodeIndex, options: &Options) -> Element {
    let node = tree.node(idx);
    let id = node.id();
    let (w, h) = (options.node.node_width, options.node.node_height);
    let origin = options.direction.node_origin(node.position(), w, h);
    let style = NodeStyle::resolve(&options.node, &options.font, node.record.style_override());

    let mut group = Element::group(origin.x, origin.y)
        .with_id(node_group_id(id))
        .with_attr("class", "node")
        .with_attr("data-self", id);
    if let Some(parent) = node.parent {
        group.set_attr("data-parent", tree.node(parent).id());
    }
    if options.highlight_on_hover {
        group.set_attr("data-highlight", "true");
    }
    if options.tooltip.enable_tooltip {
        group.set_attr("data-tooltip", "true");
    }

    let rect_style = RectStyle {
        radius: style.corner_radius,
        color: style.background.clone(),
        stroke_width: style.border_width,
        stroke_color: style.border_color.clone(),
        stroke_dash_array: dash_array(&options.node.border_style).to_string(),
        ..RectStyle::default()
    };
    group.add(Element::rect(w, h, &rect_style).with_id(node_box_id(id)));

    let content = node.record.content(&options.content_key);
    let body = options.node.node_template.render(&content);
    let font_style = generate_styles(&style.font.style_entries());
    let html = format!(
        "<div xmlns=\"http://www.w3.org/1999/xhtml\" style=\"width: 100%; height: 100%; {}\">{}</div>",
        escape_xml(&font_style),
        body
    );
    group.add(Element::foreign_object(html, w, h).with_id(node_content_id(id)));

    if options.enable_expand_collapse {
        if let Some(toggle) = draw_toggle(tree, idx, options, origin) {
            group.add(toggle);
        }
    }
    group
}

fn draw_toggle(
    tree: &PositionedTree,
    idx: NodeIndex,
    options: &Options,
    origin: crate::layout::Point,
) -> Option<Element> {
    let node = tree.node(idx);
    let label = match node.state() {
        NodeState::Expanded => "-",
        NodeState::Collapsed => "+",
        NodeState::Leaf => return None,
    };
    let (w, h) = (options.node.node_width, options.node.node_height);
    let anchor = options.direction.edge_parent_end(origin, w, h);
    let (cx, cy) = (anchor.x - origin.x, anchor.y - origin.y);
    let radius = EXPAND_COLLAPSE_BUTTON_SIZE / 2.0;
    Some(
        Element::new(ElementKind::Group)
            .with_id(toggle_id(node.id()))
            .with_attr("class", "toggle")
            .with_attr("data-toggle", node.id())
            .with_child(
                Element::circle(cx, cy, radius)
                    .with_attr("fill", options.node.node_bg_color.clone())
                    .with_attr("stroke", options.node.border_color.clone()),
            )
            .with_child(
                Element::text(label, cx, cy)
                    .with_attr("text-anchor", "middle")
                    .with_attr("dominant-baseline", "central")
                    .with_attr("font-size", "12"),
            ),
    )
}

fn dash_array(border_style: &str) -> &'static str {
    match border_style {
        "dashed" => "4 2",
        "dotted" => "1 2",
        _ => "0",
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, width: f32, height: f32) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(width, height)
        .or_else(|| usvg::Size::from_wh(400.0, 400.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid output size {width}x{height}"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
