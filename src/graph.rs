//! Graph controller: owns the positioned tree and the canvas, and turns
//! structural edits and pointer events into layout and drawing passes.

use crate::canvas::{Canvas, SvgCanvas};
use crate::config::Options;
use crate::error::Result;
use crate::export;
use crate::interaction::{HighlightStyle, highlight_to_path, tooltip_styles, update_tooltip};
use crate::ir::{Direction, TreeNode};
use crate::layout::{NodeState, PositionedNode, PositionedTree, ViewBox, compute_layout};
use crate::render::{RenderSummary, paint};
use crate::theme::NodeStyle;

pub struct Graph<C: Canvas = SvgCanvas> {
    options: Options,
    tree: PositionedTree,
    canvas: C,
    /// Flex size the current coordinates were computed with.
    flex_size: [f32; 2],
    summary: RenderSummary,
}

impl<C: Canvas> Graph<C> {
    /// Builds the positioned tree and lays it out. Nothing is drawn until
    /// [`Graph::render`].
    pub fn new(data: &TreeNode, options: Options, canvas: C) -> Result<Self> {
        let tree = PositionedTree::from_tree(data)?;
        let mut graph = Self {
            options,
            tree,
            canvas,
            flex_size: [0.0, 0.0],
            summary: RenderSummary::default(),
        };
        graph.construct();
        Ok(graph)
    }

    /// Lays out the visible nodes from scratch.
    pub fn construct(&mut self) {
        compute_layout(&mut self.tree, self.options.direction, &self.options);
        self.flex_size = self.current_flex_size();
        tracing::debug!(
            nodes = self.tree.len(),
            direction = %self.options.direction,
            "constructed graph"
        );
    }

    /// Redraws the canvas from the current layout and fits the viewport.
    pub fn render(&mut self) -> RenderSummary {
        self.summary = paint(&mut self.tree, &self.options, &mut self.canvas);
        self.fit_screen();
        self.summary
    }

    /// Hides everything below node `id`. Unknown ids and nodes inside a
    /// collapsed subtree are ignored.
    pub fn collapse(&mut self, id: &str) -> bool {
        let Some(idx) = self.tree.find_visible(id) else {
            tracing::debug!(id, "collapse ignored: node not visible");
            return false;
        };
        if !self.tree.collapse(idx) {
            return false;
        }
        tracing::debug!(id, "collapsed node");
        self.construct();
        self.render();
        true
    }

    pub fn expand(&mut self, id: &str) -> bool {
        let Some(idx) = self.tree.find_visible(id) else {
            tracing::debug!(id, "expand ignored: node not visible");
            return false;
        };
        if !self.tree.expand(idx) {
            return false;
        }
        tracing::debug!(id, "expanded node");
        self.construct();
        self.render();
        true
    }

    /// Collapses an expanded node or expands a collapsed one. Leaves and
    /// unknown ids are left alone.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.state(id) {
            Some(NodeState::Expanded) => self.collapse(id),
            Some(NodeState::Collapsed) => self.expand(id),
            Some(NodeState::Leaf) | None => false,
        }
    }

    /// Switches the layout direction. Coordinates are recomputed only when
    /// the node footprint differs between the two directions.
    pub fn change_layout(&mut self, direction: Direction) {
        self.options = self.options.with_direction(direction);
        let relayout = self.current_flex_size() != self.flex_size;
        if relayout {
            self.construct();
        }
        tracing::debug!(direction = %direction, relayout, "changed layout");
        self.render();
    }

    pub fn fit_screen(&mut self) -> ViewBox {
        let view_box = self
            .options
            .direction
            .view_box_dimensions(self.tree.root_node(), self.options.children_spacing);
        self.canvas.set_view_box(view_box);
        view_box
    }

    pub fn zoom(&mut self, delta: f32) {
        self.canvas.zoom(delta);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.canvas.pan(dx, dy);
    }

    /// Highlights the path from `id` to the root. Returns the restyled
    /// element ids, empty when hover highlighting is off or `id` is hidden.
    pub fn hover(&mut self, id: &str) -> Vec<String> {
        if !self.options.highlight_on_hover {
            return Vec::new();
        }
        let Some(idx) = self.tree.find_visible(id) else {
            return Vec::new();
        };
        let options = &self.options;
        highlight_to_path(&self.tree, &mut self.canvas, idx, |node| {
            highlight_style(options, node, true)
        })
    }

    /// Restores the default style along the path from `id` to the root.
    pub fn unhover(&mut self, id: &str) -> Vec<String> {
        if !self.options.highlight_on_hover {
            return Vec::new();
        }
        let Some(idx) = self.tree.find_visible(id) else {
            return Vec::new();
        };
        let options = &self.options;
        highlight_to_path(&self.tree, &mut self.canvas, idx, |node| {
            highlight_style(options, node, false)
        })
    }

    /// Shows the tooltip for node `id` next to the pointer at `(x, y)`.
    /// Returns false when tooltips are off or the node is not on screen.
    pub fn pointer_move(&mut self, id: &str, x: f32, y: f32) -> bool {
        let tooltip = &self.options.tooltip;
        if !tooltip.enable_tooltip {
            return false;
        }
        let Some(idx) = self.tree.find_visible(id) else {
            return false;
        };
        let node = self.tree.node(idx);
        let content = node.record.content(&self.options.content_key);
        let html = self.options.tooltip_template().render(&content);
        let styles = tooltip_styles(
            x,
            y,
            tooltip.tooltip_max_width,
            &tooltip.tooltip_border_color,
            &tooltip.tooltip_bg_color,
            tooltip.tooltip_template.is_none(),
        )
        .join(" ");
        update_tooltip(&mut self.canvas, &tooltip.tooltip_id, Some(&styles), &html);
        true
    }

    /// Hides the tooltip unless the pointer moved onto another element of
    /// the canvas. Returns true when the tooltip was cleared.
    pub fn pointer_leave(&mut self, destination: Option<&str>) -> bool {
        if !self.options.tooltip.enable_tooltip {
            return false;
        }
        if destination.is_some_and(|id| self.canvas.contains(id)) {
            return false;
        }
        update_tooltip(&mut self.canvas, &self.options.tooltip.tooltip_id, None, "");
        true
    }

    /// Standalone SVG document of the current canvas.
    pub fn export_to_svg(&self) -> String {
        export::svg_document(&self.canvas.to_svg())
    }

    pub fn state(&self, id: &str) -> Option<NodeState> {
        self.tree.find(id).map(|idx| self.tree.state(idx))
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn tree(&self) -> &PositionedTree {
        &self.tree
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Counts from the last render pass.
    pub fn summary(&self) -> RenderSummary {
        self.summary
    }

    fn current_flex_size(&self) -> [f32; 2] {
        let options = &self.options;
        options.direction.node_flex_size(
            options.node.node_width,
            options.node.node_height,
            options.sibling_spacing,
            options.children_spacing,
        )
    }
}

fn highlight_style(options: &Options, node: &PositionedNode, hovered: bool) -> HighlightStyle {
    let style = NodeStyle::resolve(&options.node, &options.font, node.record.style_override());
    if hovered {
        HighlightStyle {
            border_width: style.border_width,
            border_color: style.border_color_hover,
            background: style.background_hover,
            edge_width: options.edge_width,
            edge_color: options.edge_color_hover.clone(),
        }
    } else {
        HighlightStyle {
            border_width: style.border_width,
            border_color: style.border_color,
            background: style.background,
            edge_width: options.edge_width,
            edge_color: options.edge_color.clone(),
        }
    }
}
