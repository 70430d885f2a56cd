//! Embedding surface: a chart bound to a host element.

use crate::canvas::{Canvas, SvgCanvas};
use crate::config::Options;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::ir::{Direction, TreeNode};

/// The element the chart is mounted into, identified by its DOM id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostElement {
    id: String,
}

impl HostElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

pub struct TreeChart {
    host: Option<HostElement>,
    options: Options,
    graph: Option<Graph>,
}

impl TreeChart {
    pub fn new(host: Option<HostElement>, options: Options) -> Self {
        Self {
            host,
            options,
            graph: None,
        }
    }

    /// Builds and draws the chart for `data`. Fails before touching the
    /// previous drawing when the host element is missing or the tree is
    /// invalid.
    pub fn render(&mut self, data: &TreeNode) -> Result<&mut Graph> {
        let Some(host) = &self.host else {
            return Err(Error::ElementNotFound);
        };
        let options = self.options.clone();
        let canvas = SvgCanvas::new(options.width, options.height, options.canvas_style.clone());
        let mut graph = Graph::new(data, options, canvas)?;
        let summary = graph.render();
        tracing::debug!(
            host = host.id(),
            nodes = summary.nodes,
            edges = summary.edges,
            "rendered chart"
        );
        Ok(self.graph.insert(graph))
    }

    pub fn host(&self) -> Option<&HostElement> {
        self.host.as_ref()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    pub fn graph_mut(&mut self) -> Option<&mut Graph> {
        self.graph.as_mut()
    }

    pub fn collapse(&mut self, id: &str) -> bool {
        self.graph.as_mut().is_some_and(|graph| graph.collapse(id))
    }

    pub fn expand(&mut self, id: &str) -> bool {
        self.graph.as_mut().is_some_and(|graph| graph.expand(id))
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        self.graph.as_mut().is_some_and(|graph| graph.toggle(id))
    }

    pub fn change_layout(&mut self, direction: Direction) {
        self.options = self.options.with_direction(direction);
        if let Some(graph) = self.graph.as_mut() {
            graph.change_layout(direction);
        }
    }

    pub fn fit_screen(&mut self) {
        if let Some(graph) = self.graph.as_mut() {
            graph.fit_screen();
        }
    }

    pub fn export_to_svg(&self) -> Option<String> {
        self.graph.as_ref().map(Graph::export_to_svg)
    }

    /// Markup for the host element: the SVG followed by the tooltip boxes.
    pub fn to_html(&self) -> Option<String> {
        let graph = self.graph.as_ref()?;
        let canvas = graph.canvas();
        let mut html = canvas.to_svg();
        for tooltip in canvas.tooltips() {
            html.push_str(&tooltip.to_html());
        }
        Some(html)
    }
}
