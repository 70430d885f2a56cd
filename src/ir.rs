use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "top" | "td" | "tb" => Some(Self::Top),
            "bottom" | "bt" => Some(Self::Bottom),
            "left" | "lr" => Some(Self::Left),
            "right" | "rl" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| format!("unknown direction `{s}`"))
    }
}

/// Style fields a single node may override; anything left `None` falls back
/// to the chart options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyleOverride {
    #[serde(rename = "nodeBGColor", skip_serializing_if = "Option::is_none")]
    pub node_bg_color: Option<String>,
    #[serde(rename = "nodeBGColorHover", skip_serializing_if = "Option::is_none")]
    pub node_bg_color_hover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color_hover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
}

/// Input tree as handed over by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(deserialize_with = "id_from_scalar")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<NodeStyleOverride>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl TreeNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
            options: None,
            data: Map::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

impl Drop for TreeNode {
    // Flattens the subtree first so dropping a long chain does not recurse
    // once per level.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// A tree node stripped of its children, as stored in the positioned tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    pub options: Option<NodeStyleOverride>,
    pub data: Map<String, Value>,
}

impl NodeRecord {
    pub fn content(&self, key: &str) -> Value {
        if key == "name" {
            return Value::String(self.name.clone());
        }
        self.data.get(key).cloned().unwrap_or(Value::Null)
    }

    pub fn style_override(&self) -> Option<&NodeStyleOverride> {
        self.options.as_ref()
    }
}

impl From<&TreeNode> for NodeRecord {
    fn from(node: &TreeNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            options: node.options.clone(),
            data: node.data.clone(),
        }
    }
}

pub(crate) fn scalar_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn id_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_to_id(&value)
        .ok_or_else(|| serde::de::Error::custom("node id must be a string or a number"))
}
