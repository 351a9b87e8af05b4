//! Tagged value tree for schema-free JSON fragments.
//!
//! A closed variant over the six JSON kinds. Fields declared as free-form
//! JSON materialize into this tree and re-emit losslessly: numbers keep the
//! exact source digit sequence rather than a decoded float, and object
//! properties keep document order.

use indexmap::IndexMap;

use crate::error::Error;
use crate::model::{FieldDeserializerMap, Parsable};
use crate::node::JsonParseNode;
use crate::writer::JsonSerializationWriter;

/// One node of an arbitrary JSON fragment.
#[derive(Clone, Debug, PartialEq)]
pub enum UntypedNode {
    /// Property map in document order.
    Object(IndexMap<String, UntypedNode>),
    Array(Vec<UntypedNode>),
    String(String),
    /// The original digit sequence, verbatim. `47.641942` stays `47.641942`.
    Number(String),
    Boolean(bool),
    Null,
}

impl UntypedNode {
    /// Factory with the polymorphic-construction signature, so free-form
    /// fields read through the same surface as any other object field.
    pub fn from_node(node: &JsonParseNode<'_>) -> Result<UntypedNode, Error> {
        Ok(node.get_untyped_value())
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, UntypedNode>> {
        match self {
            UntypedNode::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[UntypedNode]> {
        match self {
            UntypedNode::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            UntypedNode::String(s) => Some(s),
            _ => None,
        }
    }

    /// The raw digit sequence of a number node.
    pub fn as_number(&self) -> Option<&str> {
        match self {
            UntypedNode::Number(raw) => Some(raw),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            UntypedNode::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, UntypedNode::Null)
    }
}

/// The tree participates in the ordinary binding surface: an empty field
/// table (materialization happens wholesale, not per-field) and a serialize
/// that re-emits the fragment verbatim.
impl Parsable for UntypedNode {
    fn field_deserializers(&self) -> FieldDeserializerMap<Self> {
        FieldDeserializerMap::new()
    }

    fn serialize(&self, writer: &mut JsonSerializationWriter) {
        writer.write_untyped_value(None, self);
    }
}
