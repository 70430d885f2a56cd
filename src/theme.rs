use crate::config::Template;
use crate::ir::NodeStyleOverride;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeOptions {
    pub node_width: f32,
    pub node_height: f32,
    #[serde(skip)]
    pub node_template: Template,
    #[serde(rename = "nodeBGColor")]
    pub node_bg_color: String,
    #[serde(rename = "nodeBGColorHover")]
    pub node_bg_color_hover: String,
    pub border_width: f32,
    pub border_style: String,
    pub border_radius: String,
    pub border_color: String,
    pub border_color_hover: String,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            node_width: 50.0,
            node_height: 30.0,
            node_template: Template::default(),
            node_bg_color: "#FFFFFF".to_string(),
            node_bg_color_hover: "#FFFFFF".to_string(),
            border_width: 1.0,
            border_style: "solid".to_string(),
            border_radius: "5px".to_string(),
            border_color: "#BCBCBC".to_string(),
            border_color_hover: "#5C6BC0".to_string(),
        }
    }
}

impl NodeOptions {
    /// Corner radius in user units, parsed from a CSS length such as `5px`.
    pub fn corner_radius(&self) -> f32 {
        parse_css_length(&self.border_radius).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontOptions {
    pub font_size: String,
    pub font_family: String,
    pub font_weight: u32,
    pub font_color: String,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            font_size: "14px".to_string(),
            font_family: String::new(),
            font_weight: 400,
            font_color: "#000000".to_string(),
        }
    }
}

impl FontOptions {
    /// Style entries keyed by option name, ready for `generate_styles`.
    /// An empty font family is left out so the host's font applies.
    pub fn style_entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = vec![
            ("fontSize", self.font_size.clone()),
            ("fontWeight", self.font_weight.to_string()),
            ("fontColor", self.font_color.clone()),
        ];
        if !self.font_family.is_empty() {
            entries.push(("fontFamily", self.font_family.clone()));
        }
        entries
    }
}

/// Colours and font of one node after applying its per-node overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub background: String,
    pub background_hover: String,
    pub border_color: String,
    pub border_color_hover: String,
    pub border_width: f32,
    pub corner_radius: f32,
    pub font: FontOptions,
}

impl NodeStyle {
    pub fn resolve(
        node: &NodeOptions,
        font: &FontOptions,
        overrides: Option<&NodeStyleOverride>,
    ) -> Self {
        let mut style = Self {
            background: node.node_bg_color.clone(),
            background_hover: node.node_bg_color_hover.clone(),
            border_color: node.border_color.clone(),
            border_color_hover: node.border_color_hover.clone(),
            border_width: node.border_width,
            corner_radius: node.corner_radius(),
            font: font.clone(),
        };
        let Some(overrides) = overrides else {
            return style;
        };
        if let Some(v) = &overrides.node_bg_color {
            style.background = v.clone();
        }
        if let Some(v) = &overrides.node_bg_color_hover {
            style.background_hover = v.clone();
        }
        if let Some(v) = &overrides.border_color {
            style.border_color = v.clone();
        }
        if let Some(v) = &overrides.border_color_hover {
            style.border_color_hover = v.clone();
        }
        if let Some(v) = &overrides.font_size {
            style.font.font_size = v.clone();
        }
        if let Some(v) = overrides.font_weight {
            style.font.font_weight = v;
        }
        if let Some(v) = &overrides.font_family {
            style.font.font_family = v.clone();
        }
        if let Some(v) = &overrides.font_color {
            style.font.font_color = v.clone();
        }
        style
    }
}

fn parse_css_length(value: &str) -> Option<f32> {
    let trimmed = value.trim();
    let end = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<f32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_radius_parses_css_lengths() {
        let mut node = NodeOptions::default();
        assert_eq!(node.corner_radius(), 5.0);
        node.border_radius = "2.5em".to_string();
        assert_eq!(node.corner_radius(), 2.5);
        node.border_radius = "auto".to_string();
        assert_eq!(node.corner_radius(), 0.0);
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let overrides = NodeStyleOverride {
            node_bg_color: Some("#111111".to_string()),
            font_weight: Some(700),
            ..NodeStyleOverride::default()
        };
        let style = NodeStyle::resolve(
            &NodeOptions::default(),
            &FontOptions::default(),
            Some(&overrides),
        );
        assert_eq!(style.background, "#111111");
        assert_eq!(style.border_color, "#BCBCBC");
        assert_eq!(style.font.font_weight, 700);
        assert_eq!(style.font.font_size, "14px");
    }

    #[test]
    fn empty_font_family_is_not_emitted() {
        let entries = FontOptions::default().style_entries();
        assert!(entries.iter().all(|(key, _)| *key != "fontFamily"));
    }
}
