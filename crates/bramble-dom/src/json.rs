//! Trees described as nested JSON.
//!
//! ```json
//! {"tag": "div", "attributes": {"class": "wrapper"}, "children": [
//!     {"tag": "a", "attributes": {"rel": "delay"}},
//!     {"text": "hello"},
//!     {"comment": "footer"}
//! ]}
//! ```
//!
//! The top level is either one node or an array of nodes; every top-level
//! node is appended under the document node.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ElementData, MarkupTree, NodeId, NodeType};

/// Errors raised while building a tree from a description.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The input was not valid JSON, or did not have the expected shape.
    #[error("invalid tree description: {0}")]
    Json(#[from] serde_json::Error),

    /// An element was described with an empty tag name.
    #[error("element at depth {depth} has an empty tag name")]
    EmptyTag {
        /// Nesting depth of the offending element (top level is 0).
        depth: usize,
    },
}

/// One node in the JSON description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    /// An element with optional attributes and children.
    Element {
        /// Tag name.
        tag: String,
        /// Attributes, sorted by name when serialized.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attributes: BTreeMap<String, String>,
        /// Child nodes in document order.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<NodeSpec>,
    },
    /// A text node.
    Text {
        /// Character data.
        text: String,
    },
    /// A comment node.
    Comment {
        /// Comment body.
        comment: String,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TopLevel {
    Many(Vec<NodeSpec>),
    One(NodeSpec),
}

impl MarkupTree {
    /// Build a tree from its JSON description.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Json`] if the input is not a valid description and
    /// [`TreeError::EmptyTag`] if an element has an empty tag name.
    pub fn from_json(input: &str) -> Result<Self, TreeError> {
        let nodes = match serde_json::from_str::<TopLevel>(input)? {
            TopLevel::Many(nodes) => nodes,
            TopLevel::One(node) => vec![node],
        };
        Self::from_specs(&nodes)
    }

    /// Build a tree from already-deserialized node descriptions.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTag`] if an element has an empty tag name.
    pub fn from_specs(nodes: &[NodeSpec]) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        for spec in nodes {
            let _ = tree.append_spec(NodeId::ROOT, spec, 0)?;
        }
        Ok(tree)
    }

    /// Append `spec` (and its subtree) under `parent`, returning the new node.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyTag`] if an element has an empty tag name.
    pub fn append_spec(
        &mut self,
        parent: NodeId,
        spec: &NodeSpec,
        depth: usize,
    ) -> Result<NodeId, TreeError> {
        let id = match spec {
            NodeSpec::Element {
                tag,
                attributes,
                children,
            } => {
                if tag.is_empty() {
                    return Err(TreeError::EmptyTag { depth });
                }
                let element = ElementData {
                    tag_name: tag.clone(),
                    attrs: attributes
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect(),
                };
                let id = self.append_element(parent, element);
                for child in children {
                    let _ = self.append_spec(id, child, depth + 1)?;
                }
                return Ok(id);
            }
            NodeSpec::Text { text } => self.alloc(NodeType::Text(text.clone())),
            NodeSpec::Comment { comment } => self.alloc(NodeType::Comment(comment.clone())),
        };
        self.append_child(parent, id);
        Ok(id)
    }

    /// Describe the subtree rooted at `id`.
    ///
    /// The document node has no description of its own; asking for it
    /// returns its children. An unknown id yields an empty list.
    #[must_use]
    pub fn to_specs(&self, id: NodeId) -> Vec<NodeSpec> {
        match self.get(id).map(|n| &n.node_type) {
            Some(NodeType::Document) => self
                .children(id)
                .iter()
                .flat_map(|&child| self.to_specs(child))
                .collect(),
            Some(NodeType::Element(data)) => vec![NodeSpec::Element {
                tag: data.tag_name.clone(),
                attributes: data
                    .attrs
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                children: self
                    .children(id)
                    .iter()
                    .flat_map(|&child| self.to_specs(child))
                    .collect(),
            }],
            Some(NodeType::Text(text)) => vec![NodeSpec::Text { text: text.clone() }],
            Some(NodeType::Comment(comment)) => vec![NodeSpec::Comment {
                comment: comment.clone(),
            }],
            None => Vec::new(),
        }
    }

    /// Serialize the subtree rooted at `id` as pretty-printed JSON.
    ///
    /// A single node is written as an object, the document node as an array.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Json`] if serialization fails.
    pub fn to_json(&self, id: NodeId) -> Result<String, TreeError> {
        let specs = self.to_specs(id);
        let json = match specs.as_slice() {
            [single] if id != NodeId::ROOT => serde_json::to_string_pretty(single)?,
            _ => serde_json::to_string_pretty(&specs)?,
        };
        Ok(json)
    }
}
