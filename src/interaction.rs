use crate::canvas::Canvas;
use crate::layout::{NodeIndex, PositionedNode, PositionedTree};
use crate::render::node_box_id;

/// Distance between the pointer and the tooltip's top-left corner.
pub const TOOLTIP_OFFSET: f32 = 20.0;

/// Stroke and fill applied to one node box and the edge to its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightStyle {
    pub border_width: f32,
    pub border_color: String,
    pub background: String,
    pub edge_width: f32,
    pub edge_color: String,
}

/// Restyles the box of `idx` and its edge, then does the same for every
/// ancestor. The root has no edge. Returns the ids of the restyled elements,
/// leaf first.
pub fn highlight_to_path<C, F>(
    tree: &PositionedTree,
    canvas: &mut C,
    idx: NodeIndex,
    style_for: F,
) -> Vec<String>
where
    C: Canvas + ?Sized,
    F: Fn(&PositionedNode) -> HighlightStyle,
{
    let mut touched = Vec::new();
    for step in tree.path_to_root(idx) {
        let node = tree.node(step);
        let style = style_for(node);

        let box_id = node_box_id(node.id());
        let border_width = style.border_width.to_string();
        if canvas.set_attribute(&box_id, "stroke", &style.border_color) {
            canvas.set_attribute(&box_id, "stroke-width", &border_width);
            canvas.set_attribute(&box_id, "fill", &style.background);
            touched.push(box_id);
        }

        if let Some(edge_id) = &node.edge {
            let edge_width = style.edge_width.to_string();
            if canvas.set_attribute(edge_id, "stroke", &style.edge_color) {
                canvas.set_attribute(edge_id, "stroke-width", &edge_width);
                touched.push(edge_id.clone());
            }
        }
    }
    touched
}

pub fn tooltip_styles(
    x: f32,
    y: f32,
    max_width: f32,
    border_color: &str,
    bg_color: &str,
    add_padding: bool,
) -> Vec<String> {
    let mut styles = vec![
        "position: absolute;".to_string(),
        format!("left: {}px;", x + TOOLTIP_OFFSET),
        format!("top: {}px;", y + TOOLTIP_OFFSET),
        format!("border: 1px solid {border_color};"),
        "border-radius: 5px;".to_string(),
        format!("max-width: {max_width}px;"),
        format!("background-color: {bg_color};"),
    ];
    if add_padding {
        styles.push("padding: 10px;".to_string());
    }
    styles
}

/// Sets the style of tooltip `id` (removing it when `styles` is `None`) and
/// replaces its content only when it differs. Returns true when the content
/// was rewritten.
pub fn update_tooltip<C>(canvas: &mut C, id: &str, styles: Option<&str>, content: &str) -> bool
where
    C: Canvas + ?Sized,
{
    let tooltip = canvas.tooltip_mut(id);
    tooltip.style = styles.map(str::to_string);
    if normalize_quotes(&tooltip.content) == normalize_quotes(content) {
        return false;
    }
    tooltip.content = content.to_string();
    tooltip.content_writes += 1;
    true
}

fn normalize_quotes(html: &str) -> String {
    html.replace('\'', "\"")
}

/// `camelCase` style keys to a CSS declaration list. `fontColor` maps to
/// `color`.
pub fn generate_styles<K, V>(entries: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    entries
        .iter()
        .map(|(key, value)| {
            let key = match key.as_ref() {
                "fontColor" => "color",
                other => other,
            };
            format!("{}: {};", camel_to_kebab(key), value.as_ref())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `nodeBGColor` -> `node-bg-color`. A run of capitals is one word unless its
/// last capital starts a lowercase word.
pub fn camel_to_kebab(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_uppercase() {
            out.push(c);
            continue;
        }
        let prev_upper = i > 0 && chars[i - 1].is_ascii_uppercase();
        let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
        let starts_word = !prev_upper || next_lower;
        if i > 0 && starts_word {
            out.push('-');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::SvgCanvas;

    #[test]
    fn kebab_case_handles_acronyms() {
        assert_eq!(camel_to_kebab("fontSize"), "font-size");
        assert_eq!(camel_to_kebab("nodeBGColor"), "node-bg-color");
        assert_eq!(camel_to_kebab("tooltipBGColorHover"), "tooltip-bg-color-hover");
        assert_eq!(camel_to_kebab("ABc"), "a-bc");
        assert_eq!(camel_to_kebab("color"), "color");
    }

    #[test]
    fn styles_are_joined_declarations() {
        let styles = generate_styles(&[("fontSize", "14px"), ("fontColor", "#000"), ("fontWeight", "400")]);
        assert_eq!(styles, "font-size: 14px; color: #000; font-weight: 400;");
    }

    #[test]
    fn tooltip_is_offset_from_the_pointer() {
        let styles = tooltip_styles(100.0, 50.0, 120.0, "#ccc", "#fff", true);
        assert!(styles.contains(&"left: 120px;".to_string()));
        assert!(styles.contains(&"top: 70px;".to_string()));
        assert_eq!(styles.last().map(String::as_str), Some("padding: 10px;"));
        assert_eq!(tooltip_styles(0.0, 0.0, 1.0, "", "", false).len(), 7);
    }

    #[test]
    fn tooltip_content_is_written_only_when_changed() {
        let mut canvas = SvgCanvas::new(10.0, 10.0, "");
        assert!(update_tooltip(&mut canvas, "tip", Some("left: 1px;"), "<b class='x'>A</b>"));
        assert!(!update_tooltip(&mut canvas, "tip", Some("left: 2px;"), "<b class=\"x\">A</b>"));
        assert!(update_tooltip(&mut canvas, "tip", None, "B"));
        let tooltip = canvas.tooltip("tip").unwrap();
        assert_eq!(tooltip.content_writes, 2);
        assert_eq!(tooltip.content, "B");
        assert_eq!(tooltip.style, None);
    }
}
