//! In-memory SVG drawing surface with pan/zoom state and a tooltip overlay.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::layout::ViewBox;
use crate::render::escape_xml;

const MIN_ZOOM: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Group,
    Rect,
    Circle,
    Text,
    ForeignObject,
    Path,
}

impl ElementKind {
    fn tag(self) -> &'static str {
        match self {
            Self::Group => "g",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Text => "text",
            Self::ForeignObject => "foreignObject",
            Self::Path => "path",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RectStyle {
    pub radius: f32,
    pub color: String,
    pub opacity: f32,
    pub stroke_width: f32,
    pub stroke_color: String,
    pub stroke_dash_array: String,
}

impl Default for RectStyle {
    fn default() -> Self {
        Self {
            radius: 0.0,
            color: "#fefefe".to_string(),
            opacity: 1.0,
            stroke_width: 1.0,
            stroke_color: "#000".to_string(),
            stroke_dash_array: "0".to_string(),
        }
    }
}

/// One SVG element. Children are owned; `html` is raw markup placed inside a
/// `foreignObject`, `text` is escaped character data.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub id: Option<String>,
    attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
    html: Option<String>,
    text: Option<String>,
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            id: None,
            attrs: Vec::new(),
            children: Vec::new(),
            html: None,
            text: None,
        }
    }

    pub fn group(x: f32, y: f32) -> Self {
        Self::new(ElementKind::Group).with_attr("transform", format!("translate({x:.2}, {y:.2})"))
    }

    pub fn rect(width: f32, height: f32, style: &RectStyle) -> Self {
        Self::new(ElementKind::Rect)
            .with_attr("width", format!("{width:.2}"))
            .with_attr("height", format!("{height:.2}"))
            .with_attr("rx", format!("{:.2}", style.radius))
            .with_attr("ry", format!("{:.2}", style.radius))
            .with_attr("opacity", style.opacity.to_string())
            .with_attr("stroke-width", style.stroke_width.to_string())
            .with_attr("stroke", style.stroke_color.clone())
            .with_attr("stroke-dasharray", style.stroke_dash_array.clone())
            .with_attr("fill", style.color.clone())
    }

    pub fn circle(cx: f32, cy: f32, r: f32) -> Self {
        Self::new(ElementKind::Circle)
            .with_attr("cx", format!("{cx:.2}"))
            .with_attr("cy", format!("{cy:.2}"))
            .with_attr("r", format!("{r:.2}"))
    }

    pub fn text(content: impl Into<String>, x: f32, y: f32) -> Self {
        let mut element = Self::new(ElementKind::Text)
            .with_attr("x", format!("{x:.2}"))
            .with_attr("y", format!("{y:.2}"));
        element.text = Some(content.into());
        element
    }

    pub fn foreign_object(html: impl Into<String>, width: f32, height: f32) -> Self {
        let mut element = Self::new(ElementKind::ForeignObject)
            .with_attr("width", format!("{width:.2}"))
            .with_attr("height", format!("{height:.2}"));
        element.html = Some(html.into());
        element
    }

    pub fn path(d: impl Into<String>) -> Self {
        Self::new(ElementKind::Path).with_attr("d", d)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn add(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    /// Number of elements of `kind` in this subtree, self included.
    pub fn count(&self, kind: ElementKind) -> usize {
        usize::from(self.kind == kind)
            + self
                .children
                .iter()
                .map(|child| child.count(kind))
                .sum::<usize>()
    }

    fn write_svg(&self, out: &mut String) {
        let tag = self.kind.tag();
        out.push('<');
        out.push_str(tag);
        if let Some(id) = &self.id {
            let _ = write!(out, " id=\"{}\"", escape_xml(id));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape_xml(value));
        }
        let empty = self.children.is_empty() && self.html.is_none() && self.text.is_none();
        if empty {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape_xml(text));
        }
        if let Some(html) = &self.html {
            out.push_str(html);
        }
        for child in &self.children {
            child.write_svg(out);
        }
        let _ = write!(out, "</{tag}>");
    }
}

fn find_in<'a>(elements: &'a [Element], id: &str) -> Option<&'a Element> {
    for element in elements {
        if element.id.as_deref() == Some(id) {
            return Some(element);
        }
        if let Some(found) = find_in(&element.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(elements: &'a mut [Element], id: &str) -> Option<&'a mut Element> {
    for element in elements.iter_mut() {
        if element.id.as_deref() == Some(id) {
            return Some(element);
        }
        if let Some(found) = find_in_mut(&mut element.children, id) {
            return Some(found);
        }
    }
    None
}

/// A floating HTML box shown next to the pointer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tooltip {
    pub id: String,
    pub style: Option<String>,
    pub content: String,
    /// How many times `content` was actually rewritten.
    pub content_writes: usize,
}

impl Tooltip {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.style.is_some() && !self.content.is_empty()
    }

    pub fn to_html(&self) -> String {
        let mut out = format!("<div id=\"{}\"", escape_xml(&self.id));
        if let Some(style) = &self.style {
            let _ = write!(out, " style=\"{}\"", escape_xml(style));
        }
        let _ = write!(out, ">{}</div>", self.content);
        out
    }
}

/// Drawing surface the graph controller renders into.
pub trait Canvas {
    /// Removes every element and resets the view box to the canvas size.
    fn clear(&mut self);
    fn add(&mut self, element: Element);
    fn set_view_box(&mut self, view_box: ViewBox);
    fn view_box(&self) -> ViewBox;
    fn find(&self, id: &str) -> Option<&Element>;
    /// Returns false when no element has this id.
    fn set_attribute(&mut self, id: &str, name: &str, value: &str) -> bool;
    fn zoom(&mut self, delta: f32);
    fn pan(&mut self, dx: f32, dy: f32);
    /// Tooltip with this id, created on first use.
    fn tooltip_mut(&mut self, id: &str) -> &mut Tooltip;
    fn tooltip(&self, id: &str) -> Option<&Tooltip>;
    fn to_svg(&self) -> String;

    fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f32,
    height: f32,
    style: String,
    elements: Vec<Element>,
    view_box: ViewBox,
    /// View box at zoom level 1; zooming scales around its centre.
    base_view_box: ViewBox,
    zoom_level: f32,
    tooltips: BTreeMap<String, Tooltip>,
}

impl SvgCanvas {
    pub fn new(width: f32, height: f32, style: impl Into<String>) -> Self {
        let view_box = ViewBox::new(0.0, 0.0, width, height);
        Self {
            width,
            height,
            style: style.into(),
            elements: Vec::new(),
            view_box,
            base_view_box: view_box,
            zoom_level: 1.0,
            tooltips: BTreeMap::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn zoom_level(&self) -> f32 {
        self.zoom_level
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn count(&self, kind: ElementKind) -> usize {
        self.elements.iter().map(|element| element.count(kind)).sum()
    }

    pub fn tooltips(&self) -> impl Iterator<Item = &Tooltip> {
        self.tooltips.values()
    }

    fn apply_zoom(&mut self) {
        let center = self.view_box.center();
        let width = self.base_view_box.width / self.zoom_level;
        let height = self.base_view_box.height / self.zoom_level;
        self.view_box = ViewBox::new(center.x - width / 2.0, center.y - height / 2.0, width, height);
    }
}

impl Canvas for SvgCanvas {
    fn clear(&mut self) {
        self.elements.clear();
        let view_box = ViewBox::new(0.0, 0.0, self.width, self.height);
        self.view_box = view_box;
        self.base_view_box = view_box;
        self.zoom_level = 1.0;
    }

    fn add(&mut self, element: Element) {
        self.elements.push(element);
    }

    fn set_view_box(&mut self, view_box: ViewBox) {
        self.view_box = view_box;
        self.base_view_box = view_box;
        self.zoom_level = 1.0;
    }

    fn view_box(&self) -> ViewBox {
        self.view_box
    }

    fn find(&self, id: &str) -> Option<&Element> {
        find_in(&self.elements, id)
    }

    fn set_attribute(&mut self, id: &str, name: &str, value: &str) -> bool {
        match find_in_mut(&mut self.elements, id) {
            Some(element) => {
                element.set_attr(name, value);
                true
            }
            None => false,
        }
    }

    fn zoom(&mut self, delta: f32) {
        self.zoom_level = (self.zoom_level + delta).max(MIN_ZOOM);
        self.apply_zoom();
    }

    fn pan(&mut self, dx: f32, dy: f32) {
        self.view_box.x += dx;
        self.view_box.y += dy;
    }

    fn tooltip_mut(&mut self, id: &str) -> &mut Tooltip {
        self.tooltips
            .entry(id.to_string())
            .or_insert_with(|| Tooltip::new(id))
    }

    fn tooltip(&self, id: &str) -> Option<&Tooltip> {
        self.tooltips.get(id)
    }

    fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{}\" height=\"{}\" viewBox=\"{}\"",
            self.width,
            self.height,
            self.view_box.to_attr()
        );
        if !self.style.is_empty() {
            let _ = write!(out, " style=\"{}\"", escape_xml(&self.style));
        }
        out.push('>');
        for element in &self.elements {
            element.write_svg(&mut out);
        }
        out.push_str("</svg>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_canvas() -> SvgCanvas {
        let mut canvas = SvgCanvas::new(400.0, 300.0, "");
        let mut group = Element::group(10.0, 20.0).with_id("g");
        group.add(Element::rect(50.0, 30.0, &RectStyle::default()).with_id("box"));
        group.add(Element::path("M 0 0 L 1 1").with_id("edge"));
        canvas.add(group);
        canvas
    }

    #[test]
    fn serializes_nested_elements() {
        let canvas = sample_canvas();
        let svg = canvas.to_svg();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("viewBox=\"0.00 0.00 400.00 300.00\""));
        assert!(svg.contains("<g id=\"g\" transform=\"translate(10.00, 20.00)\"><rect id=\"box\""));
        assert!(svg.contains("<path id=\"edge\" d=\"M 0 0 L 1 1\"/>"));
        assert!(svg.ends_with("</g></svg>"));
    }

    #[test]
    fn attributes_are_updated_by_id() {
        let mut canvas = sample_canvas();
        assert!(canvas.set_attribute("edge", "stroke", "#5C6BC0"));
        assert_eq!(canvas.find("edge").unwrap().attr("stroke"), Some("#5C6BC0"));
        assert!(!canvas.set_attribute("missing", "stroke", "red"));
        assert!(canvas.contains("box"));
    }

    #[test]
    fn clear_resets_elements_and_view_box() {
        let mut canvas = sample_canvas();
        canvas.set_view_box(ViewBox::new(-50.0, -50.0, 10.0, 10.0));
        canvas.clear();
        assert!(canvas.elements().is_empty());
        assert_eq!(canvas.view_box(), ViewBox::new(0.0, 0.0, 400.0, 300.0));
    }

    #[test]
    fn zoom_scales_around_the_centre() {
        let mut canvas = SvgCanvas::new(100.0, 100.0, "");
        canvas.set_view_box(ViewBox::new(0.0, 0.0, 200.0, 100.0));
        canvas.zoom(1.0);
        assert_eq!(canvas.view_box(), ViewBox::new(50.0, 25.0, 100.0, 50.0));
        canvas.zoom(-5.0);
        assert_eq!(canvas.zoom_level(), MIN_ZOOM);
        canvas.pan(10.0, 0.0);
        assert_eq!(canvas.view_box().center().x, 110.0);
    }

    #[test]
    fn one_tooltip_per_id() {
        let mut canvas = SvgCanvas::new(100.0, 100.0, "");
        canvas.tooltip_mut("tip").content = "a".to_string();
        canvas.tooltip_mut("tip").style = Some("left: 1px;".to_string());
        assert_eq!(canvas.tooltips().count(), 1);
        assert_eq!(
            canvas.tooltip("tip").unwrap().to_html(),
            "<div id=\"tip\" style=\"left: 1px;\">a</div>"
        );
    }

    #[test]
    fn counts_elements_by_kind() {
        let canvas = sample_canvas();
        assert_eq!(canvas.count(ElementKind::Group), 1);
        assert_eq!(canvas.count(ElementKind::Rect), 1);
        assert_eq!(canvas.count(ElementKind::Path), 1);
    }
}
