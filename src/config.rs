use crate::ir::Direction;
use crate::theme::{FontOptions, NodeOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Pluggable HTML renderer for a node body or tooltip body.
#[derive(Clone)]
pub struct Template(Arc<dyn Fn(&Value) -> String + Send + Sync>);

impl Template {
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(render))
    }

    pub fn render(&self, content: &Value) -> String {
        (self.0)(content)
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::new(default_node_template)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Template(..)")
    }
}

pub fn content_text(content: &Value) -> String {
    match content {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn default_node_template(content: &Value) -> String {
    format!(
        "<div style='display: flex;justify-content: center;align-items: center; text-align: center; height: 100%;'>{}</div>",
        crate::render::escape_xml(&content_text(content))
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TooltipOptions {
    pub enable_tooltip: bool,
    pub tooltip_id: String,
    #[serde(skip)]
    pub tooltip_template: Option<Template>,
    pub tooltip_max_width: f32,
    pub tooltip_border_color: String,
    #[serde(rename = "tooltipBGColor")]
    pub tooltip_bg_color: String,
}

impl Default for TooltipOptions {
    fn default() -> Self {
        Self {
            enable_tooltip: false,
            tooltip_id: "tooltip-container".to_string(),
            tooltip_template: None,
            tooltip_max_width: 100.0,
            tooltip_border_color: "#BCBCBC".to_string(),
            tooltip_bg_color: "#FFFFFF".to_string(),
        }
    }
}

/// Chart options. Fields missing from user input keep their default value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub width: f32,
    pub height: f32,
    pub direction: Direction,
    pub content_key: String,
    pub sibling_spacing: f32,
    pub children_spacing: f32,
    pub highlight_on_hover: bool,
    pub container_class_name: String,
    pub canvas_style: String,
    pub enable_expand_collapse: bool,
    pub edge_color: String,
    pub edge_color_hover: String,
    pub edge_width: f32,
    #[serde(flatten)]
    pub node: NodeOptions,
    #[serde(flatten)]
    pub tooltip: TooltipOptions,
    #[serde(flatten)]
    pub font: FontOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            direction: Direction::Top,
            content_key: "name".to_string(),
            sibling_spacing: 50.0,
            children_spacing: 50.0,
            highlight_on_hover: true,
            container_class_name: "root".to_string(),
            canvas_style: String::new(),
            enable_expand_collapse: false,
            edge_color: "#8C8C8C".to_string(),
            edge_color_hover: "#5C6BC0".to_string(),
            edge_width: 1.0,
            node: NodeOptions::default(),
            tooltip: TooltipOptions::default(),
            font: FontOptions::default(),
        }
    }
}

impl Options {
    /// Merges a JSON object of user options over the defaults.
    pub fn from_value(value: Value) -> crate::error::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_direction(&self, direction: Direction) -> Self {
        Self {
            direction,
            ..self.clone()
        }
    }

    pub fn with_node_template<F>(mut self, render: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.node.node_template = Template::new(render);
        self
    }

    pub fn with_tooltip_template<F>(mut self, render: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.tooltip.tooltip_template = Some(Template::new(render));
        self
    }

    pub fn tooltip_template(&self) -> &Template {
        self.tooltip
            .tooltip_template
            .as_ref()
            .unwrap_or(&self.node.node_template)
    }
}

/// Loads options from a JSON or JSON5 file. `None` yields the defaults.
pub fn load_options(path: Option<&Path>) -> anyhow::Result<Options> {
    let Some(path) = path else {
        return Ok(Options::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let value: Value = json5::from_str(&contents)?;
    Ok(Options::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_fields_merge_over_defaults() {
        let options = Options::from_value(json!({
            "width": 800,
            "direction": "left",
            "nodeBGColor": "#000000",
            "enableTooltip": true,
            "fontSize": "12px"
        }))
        .unwrap();
        assert_eq!(options.width, 800.0);
        assert_eq!(options.height, 400.0);
        assert_eq!(options.direction, Direction::Left);
        assert_eq!(options.node.node_bg_color, "#000000");
        assert_eq!(options.node.border_color, "#BCBCBC");
        assert!(options.tooltip.enable_tooltip);
        assert_eq!(options.tooltip.tooltip_id, "tooltip-container");
        assert_eq!(options.font.font_size, "12px");
        assert_eq!(options.font.font_weight, 400);
    }

    #[test]
    fn with_direction_keeps_everything_else() {
        let options = Options {
            sibling_spacing: 12.0,
            ..Options::default()
        };
        let next = options.with_direction(Direction::Bottom);
        assert_eq!(next.direction, Direction::Bottom);
        assert_eq!(next.sibling_spacing, 12.0);
        assert_eq!(options.direction, Direction::Top);
    }

    #[test]
    fn default_template_wraps_and_escapes_content() {
        let options = Options::default();
        let html = options.node.node_template.render(&json!("R&D"));
        assert!(html.starts_with("<div style="));
        assert!(html.contains("R&amp;D"));
    }

    #[test]
    fn tooltip_template_falls_back_to_node_template() {
        let options = Options::default().with_node_template(|v| format!("node:{}", content_text(v)));
        assert_eq!(options.tooltip_template().render(&json!("x")), "node:x");
        let options = options.with_tooltip_template(|_| "tip".to_string());
        assert_eq!(options.tooltip_template().render(&json!("x")), "tip");
    }

    #[test]
    fn load_options_accepts_json5() {
        let dir = std::env::temp_dir().join(format!("otr-options-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("options.json5");
        std::fs::write(&path, "{ // comment\n siblingSpacing: 20, direction: 'right', }").unwrap();
        let options = load_options(Some(&path)).unwrap();
        assert_eq!(options.sibling_spacing, 20.0);
        assert_eq!(options.direction, Direction::Right);
        std::fs::remove_dir_all(&dir).ok();
    }
}
