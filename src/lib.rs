//! Polymorphic JSON codec backing generated data-binding models.
//!
//! Maps between an in-memory JSON document and typed or free-form model
//! instances:
//! - a recursive, lazily-evaluated [`JsonParseNode`] that answers absence
//!   (not errors) on kind mismatches,
//! - name-keyed field binding with lossless capture of schema-unknown
//!   properties into an [`AdditionalData`] sink,
//! - "one of" / "all of" composed-type resolution via discriminator or
//!   brute-force merge ([`composed`]),
//! - a closed tagged-value tree ([`UntypedNode`]) for schema-free fragments,
//! - the mirroring [`JsonSerializationWriter`] producing compact JSON text.
//!
//! The document model is `serde_json::Value` with `preserve_order` (field
//! binding walks properties in document order) and `arbitrary_precision`
//! (numbers keep their source digit sequence).

pub mod composed;
pub mod context;
pub mod enums;
pub mod error;
pub mod factory;
pub mod model;
pub mod node;
pub mod temporal;
pub mod untyped;
pub mod writer;

#[cfg(test)]
pub(crate) mod testkit;

pub use composed::{ResolutionState, discriminator_value, merge_first_wins, project_deserializers};
pub use context::{GuidFormat, JsonSerializationContext};
pub use enums::{WireEnum, WireEnumMember, WireFlags};
pub use error::Error;
pub use factory::{JsonParseDocument, JsonParseNodeFactory, VALID_CONTENT_TYPE};
pub use model::{
    AdditionalData, AdditionalValue, FieldDeserializer, FieldDeserializerMap, Parsable,
    ParsableFactory,
};
pub use node::{AssignmentHook, JsonParseNode, PrimitiveValue};
pub use untyped::UntypedNode;
pub use writer::JsonSerializationWriter;
