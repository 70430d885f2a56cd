use orgtree_rs_renderer::export::patch_legacy_namespaces;
use orgtree_rs_renderer::{Direction, HostElement, Options, TreeChart, parse_tree};
use serde::Deserialize;
use serde_json::{Map, Value};
use wasm_bindgen::prelude::*;

/// Chart options plus a few wrapper-only switches, all in one JSON object.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WasmRenderOptions {
    #[serde(default)]
    collapsed: Vec<String>,
    #[serde(default)]
    legacy_namespaces: bool,
    #[serde(flatten)]
    chart: Map<String, Value>,
}

fn parse_render_options(raw: Option<&str>) -> Result<(WasmRenderOptions, Options), String> {
    let render_options = match raw {
        Some(raw) => serde_json::from_str::<WasmRenderOptions>(raw).map_err(|e| e.to_string())?,
        None => WasmRenderOptions::default(),
    };
    let options = Options::from_value(Value::Object(render_options.chart.clone()))
        .map_err(|e| e.to_string())?;
    Ok((render_options, options))
}

fn build_svg(code: &str, options_json: Option<&str>) -> Result<String, String> {
    let (render_options, options) = parse_render_options(options_json)?;
    let data = parse_tree(code).map_err(|e| e.to_string())?;
    let mut chart = TreeChart::new(Some(HostElement::new("detached")), options);
    let graph = chart.render(&data).map_err(|e| e.to_string())?;
    for id in &render_options.collapsed {
        graph.collapse(id);
    }
    let svg = graph.export_to_svg();
    if render_options.legacy_namespaces {
        return Ok(patch_legacy_namespaces(&svg));
    }
    Ok(svg)
}

/// Renders tree JSON to a standalone SVG document without touching the DOM.
#[wasm_bindgen]
pub fn render_tree_svg(code: &str, options_json: Option<String>) -> Result<String, JsValue> {
    build_svg(code, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}

/// A chart mounted into a DOM element. Pointer handlers are forwarded by the
/// page; every structural change re-mounts the markup.
#[wasm_bindgen]
pub struct OrgTreeChart {
    chart: TreeChart,
}

#[wasm_bindgen]
impl OrgTreeChart {
    #[wasm_bindgen(constructor)]
    pub fn new(host_id: &str, options_json: Option<String>) -> Result<OrgTreeChart, JsValue> {
        let (_, options) =
            parse_render_options(options_json.as_deref()).map_err(|error| JsValue::from_str(&error))?;
        let host = find_element(host_id).map(|_| HostElement::new(host_id));
        Ok(Self {
            chart: TreeChart::new(host, options),
        })
    }

    pub fn render(&mut self, code: &str) -> Result<(), JsValue> {
        let data = parse_tree(code).map_err(to_js)?;
        self.chart.render(&data).map_err(to_js)?;
        self.mount()
    }

    pub fn collapse(&mut self, id: &str) -> Result<bool, JsValue> {
        let changed = self.chart.collapse(id);
        self.mount_if(changed)
    }

    pub fn expand(&mut self, id: &str) -> Result<bool, JsValue> {
        let changed = self.chart.expand(id);
        self.mount_if(changed)
    }

    pub fn toggle(&mut self, id: &str) -> Result<bool, JsValue> {
        let changed = self.chart.toggle(id);
        self.mount_if(changed)
    }

    #[wasm_bindgen(js_name = changeLayout)]
    pub fn change_layout(&mut self, direction: &str) -> Result<(), JsValue> {
        let direction: Direction = direction.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.chart.change_layout(direction);
        self.mount()
    }

    #[wasm_bindgen(js_name = fitScreen)]
    pub fn fit_screen(&mut self) -> Result<(), JsValue> {
        self.chart.fit_screen();
        self.mount()
    }

    pub fn zoom(&mut self, delta: f32) -> Result<(), JsValue> {
        if let Some(graph) = self.chart.graph_mut() {
            graph.zoom(delta);
        }
        self.mount()
    }

    pub fn pan(&mut self, dx: f32, dy: f32) -> Result<(), JsValue> {
        if let Some(graph) = self.chart.graph_mut() {
            graph.pan(dx, dy);
        }
        self.mount()
    }

    pub fn hover(&mut self, id: &str) -> Result<(), JsValue> {
        let touched = self.chart.graph_mut().map(|graph| graph.hover(id)).unwrap_or_default();
        self.mount_if(!touched.is_empty()).map(|_| ())
    }

    pub fn unhover(&mut self, id: &str) -> Result<(), JsValue> {
        let touched = self.chart.graph_mut().map(|graph| graph.unhover(id)).unwrap_or_default();
        self.mount_if(!touched.is_empty()).map(|_| ())
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, id: &str, x: f32, y: f32) -> Result<(), JsValue> {
        let shown = self
            .chart
            .graph_mut()
            .is_some_and(|graph| graph.pointer_move(id, x, y));
        self.mount_if(shown).map(|_| ())
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self, destination: Option<String>) -> Result<(), JsValue> {
        let cleared = self
            .chart
            .graph_mut()
            .is_some_and(|graph| graph.pointer_leave(destination.as_deref()));
        self.mount_if(cleared).map(|_| ())
    }

    #[wasm_bindgen(js_name = exportToSvg)]
    pub fn export_to_svg(&self) -> Option<String> {
        self.chart.export_to_svg()
    }

    fn mount_if(&self, changed: bool) -> Result<bool, JsValue> {
        if changed {
            self.mount()?;
        }
        Ok(changed)
    }

    fn mount(&self) -> Result<(), JsValue> {
        let Some(host) = self.chart.host() else {
            return Ok(());
        };
        let Some(html) = self.chart.to_html() else {
            return Ok(());
        };
        let element = find_element(host.id()).ok_or_else(|| JsValue::from_str("Element not found"))?;
        element.set_inner_html(&html);
        Ok(())
    }
}

fn find_element(id: &str) -> Option<web_sys::Element> {
    web_sys::window()?.document()?.get_element_by_id(id)
}

fn to_js(error: orgtree_rs_renderer::Error) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[cfg(test)]
mod tests {
    use crate::build_svg;

    #[test]
    fn renders_flat_records_with_options() {
        let code = r#"[
            { "id": "a", "name": "Alpha" },
            { "id": "b", "parentId": "a", "name": "Beta" },
            { "id": "c", "parentId": "a", "name": "Gamma" },
            { "id": "d", "parentId": "c", "name": "Delta" }
        ]"#;

        let svg = build_svg(code, Some(r#"{ "direction": "left", "edgeColor": "#123456" }"#))
            .expect("flat records should render");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Delta"));
        assert!(svg.contains("stroke=\"#123456\""));

        let collapsed = build_svg(code, Some(r#"{ "collapsed": ["c"] }"#))
            .expect("collapsed tree should render");
        assert!(!collapsed.contains("Delta"));
        assert!(collapsed.contains("Gamma"));
    }

    #[test]
    fn reports_bad_input() {
        assert!(build_svg("[]", None).is_err());
        assert!(build_svg(r#"{ "id": "a" }"#, Some("{ not json")).is_err());
    }
}
