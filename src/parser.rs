//! Tree input parsing. Accepts JSON or JSON5, either as one nested object or
//! as an array of flat records linked by a parent id.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::ir::{TreeNode, scalar_to_id};

/// Field names used to link flat records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeKeys {
    pub id_key: String,
    pub parent_key: String,
}

impl Default for TreeKeys {
    fn default() -> Self {
        Self {
            id_key: "id".to_string(),
            parent_key: "parentId".to_string(),
        }
    }
}

pub fn parse_tree(input: &str) -> Result<TreeNode> {
    parse_tree_with(input, &TreeKeys::default())
}

pub fn parse_tree_with(input: &str, keys: &TreeKeys) -> Result<TreeNode> {
    let value: Value =
        json5::from_str(input).map_err(|err| Error::invalid_tree(err.to_string()))?;
    tree_from_value(value, keys)
}

pub fn tree_from_value(value: Value, keys: &TreeKeys) -> Result<TreeNode> {
    match value {
        Value::Object(_) => Ok(serde_json::from_value(value)?),
        Value::Array(records) => stratify(records, keys),
        _ => Err(Error::invalid_tree(
            "expected a tree object or an array of records",
        )),
    }
}

/// Links flat records into a tree. Exactly one record may lack a parent;
/// every other record must name an existing one.
pub fn stratify(records: Vec<Value>, keys: &TreeKeys) -> Result<TreeNode> {
    let mut nodes: HashMap<String, TreeNode> = HashMap::with_capacity(records.len());
    let mut children: HashMap<String, Vec<String>> = HashMap::new();
    let mut roots = Vec::new();
    let mut parents = Vec::with_capacity(records.len());

    for (position, record) in records.into_iter().enumerate() {
        let Value::Object(mut fields) = record else {
            return Err(Error::invalid_tree(format!("record {position} is not an object")));
        };
        let id = fields
            .remove(&keys.id_key)
            .as_ref()
            .and_then(scalar_to_id)
            .ok_or_else(|| {
                Error::invalid_tree(format!("record {position} has no `{}`", keys.id_key))
            })?;
        let parent = fields
            .remove(&keys.parent_key)
            .as_ref()
            .and_then(scalar_to_id)
            .filter(|parent| !parent.is_empty());
        fields.remove("children");

        let node = record_to_node(&id, fields)?;
        if nodes.insert(id.clone(), node).is_some() {
            return Err(Error::DuplicateNodeId { id });
        }
        match &parent {
            Some(parent) => children.entry(parent.clone()).or_default().push(id.clone()),
            None => roots.push(id.clone()),
        }
        parents.push((id, parent));
    }

    for (id, parent) in &parents {
        if let Some(parent) = parent {
            if !nodes.contains_key(parent) {
                return Err(Error::invalid_tree(format!(
                    "node `{id}` references missing parent `{parent}`"
                )));
            }
        }
    }
    let root = match roots.as_slice() {
        [root] => root.clone(),
        [] => return Err(Error::invalid_tree("no root record")),
        _ => return Err(Error::invalid_tree(format!("multiple roots: {}", roots.join(", ")))),
    };

    let total = nodes.len();
    let order = reachable_pre_order(&root, &children);
    if order.len() != total {
        return Err(Error::invalid_tree("records contain a cycle"));
    }
    let tree = assemble(&order, nodes, &children)?;
    tracing::debug!(nodes = total, root = %tree.id, "stratified flat records");
    Ok(tree)
}

fn record_to_node(id: &str, mut fields: Map<String, Value>) -> Result<TreeNode> {
    fields.insert("id".to_string(), Value::String(id.to_string()));
    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// Ids reachable from `root`, parents before children.
fn reachable_pre_order<'a>(root: &'a str, children: &'a HashMap<String, Vec<String>>) -> Vec<&'a str> {
    let mut order = Vec::new();
    let mut seen = HashSet::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        order.push(id);
        if let Some(child_ids) = children.get(id) {
            stack.extend(child_ids.iter().rev().map(String::as_str));
        }
    }
    order
}

/// Builds the nested tree bottom-up: walking `order` backwards finishes every
/// child before its parent claims it.
fn assemble(
    order: &[&str],
    mut nodes: HashMap<String, TreeNode>,
    children: &HashMap<String, Vec<String>>,
) -> Result<TreeNode> {
    let mut built: HashMap<&str, TreeNode> = HashMap::with_capacity(order.len());
    for &id in order.iter().rev() {
        let mut node = nodes
            .remove(id)
            .ok_or_else(|| Error::invalid_tree(format!("node `{id}` is reachable twice")))?;
        if let Some(child_ids) = children.get(id) {
            node.children.reserve(child_ids.len());
            for child in child_ids {
                let child = built.remove(child.as_str()).ok_or_else(|| {
                    Error::invalid_tree(format!("node `{child}` is reachable twice"))
                })?;
                node.children.push(child);
            }
        }
        built.insert(id, node);
    }
    order
        .first()
        .and_then(|root| built.remove(root))
        .ok_or_else(|| Error::invalid_tree("no root record"))
}
