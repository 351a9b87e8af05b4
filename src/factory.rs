//! Root parse-node construction.
//!
//! One operation: validate the content-type label, buffer the whole byte
//! stream, parse it into a single document value. Nothing is incremental —
//! every accessor on the resulting nodes runs against a fully-materialized
//! document, which is what makes concurrent read-only traversal safe.

use std::io::Read;
use std::sync::Arc;

use serde_json::Value;

use crate::context::JsonSerializationContext;
use crate::error::Error;
use crate::node::JsonParseNode;

/// The single supported media type.
pub const VALID_CONTENT_TYPE: &str = "application/json";

/// Builds the root parse node for a buffered JSON document.
#[derive(Clone, Default)]
pub struct JsonParseNodeFactory {
    context: Arc<JsonSerializationContext>,
}

impl JsonParseNodeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory bound to an explicitly constructed context.
    pub fn with_context(context: Arc<JsonSerializationContext>) -> Self {
        Self { context }
    }

    pub fn valid_content_type(&self) -> &'static str {
        VALID_CONTENT_TYPE
    }

    /// Buffer `content` into one document and return it, bound to this
    /// factory's context. The root node is a borrow of the document.
    pub fn get_root_parse_node(
        &self,
        content_type: &str,
        mut content: impl Read,
    ) -> Result<JsonParseDocument, Error> {
        if content_type.is_empty() {
            return Err(Error::Argument("content_type"));
        }
        if !content_type.eq_ignore_ascii_case(VALID_CONTENT_TYPE) {
            return Err(Error::UnsupportedContentType {
                expected: VALID_CONTENT_TYPE,
                received: content_type.to_string(),
            });
        }

        let mut buffer = Vec::new();
        content.read_to_end(&mut buffer).map_err(Error::Io)?;

        // Path-annotated parse failures: "keywords[1].wssId: invalid number"
        // beats a bare byte offset when a large payload is corrupt.
        let mut deserializer = serde_json::Deserializer::from_slice(&buffer);
        let value: Value = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|e| Error::format("document", format!("{}: {}", e.path(), e.inner())))?;

        Ok(JsonParseDocument {
            value,
            context: self.context.clone(),
        })
    }
}

/// A fully-buffered document plus the context the operation runs under.
/// Keep it alive for as long as any node borrowed from it.
#[derive(Debug)]
pub struct JsonParseDocument {
    value: Value,
    context: Arc<JsonSerializationContext>,
}

impl JsonParseDocument {
    /// The root parse node over the buffered document.
    pub fn root(&self) -> JsonParseNode<'_> {
        JsonParseNode::new(&self.value)
    }

    pub fn context(&self) -> &Arc<JsonSerializationContext> {
        &self.context
    }
}

// --------------------------------- Tests ---------------------------------- //
