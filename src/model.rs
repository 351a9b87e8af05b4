//! Binding capabilities for model objects.
//!
//! A model participates in deserialization by exposing a name-keyed table of
//! setter callbacks — an explicit map built per model type, no runtime
//! reflection — and in serialization by writing its own fields through the
//! writer. Models that keep schema-unknown properties additionally expose an
//! additional-data sink; undeclared values land there decoded through the
//! infer-anything rule into a closed tagged sum, never an untyped blob.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use crate::error::Error;
use crate::node::JsonParseNode;
use crate::writer::JsonSerializationWriter;

/// Setter callback for one declared property.
pub type FieldDeserializer<T> = Box<dyn Fn(&mut T, &JsonParseNode<'_>) -> Result<(), Error>>;

/// Declared-property table: name → setter.
pub type FieldDeserializerMap<T> = HashMap<&'static str, FieldDeserializer<T>>;

/// Factory used for polymorphic construction. It receives the node being
/// bound and may inspect it (typically a discriminator child) before
/// choosing which concrete variant to build.
pub type ParsableFactory<T> = fn(&JsonParseNode<'_>) -> Result<T, Error>;

/// A type that can be bound from and written to JSON.
pub trait Parsable {
    /// The declared-field callback table. Instance state may shape the
    /// table: composed wrappers return an empty one once scalar-resolved.
    fn field_deserializers(&self) -> FieldDeserializerMap<Self>
    where
        Self: Sized;

    /// Write this model's fields into an already-opened JSON object, or a
    /// bare value for composed wrappers.
    fn serialize(&self, writer: &mut JsonSerializationWriter);

    /// The open-ended sink for schema-unknown properties, when the model
    /// has one.
    fn additional_data_sink(&mut self) -> Option<&mut AdditionalData> {
        None
    }

    /// Composed wrappers answer true so the writer delegates to their
    /// `serialize` without wrapping another object around it.
    fn is_composed(&self) -> bool {
        false
    }
}

/// Schema-unknown properties in document order.
pub type AdditionalData = IndexMap<String, AdditionalValue>;

/// A decoded schema-unknown value. The closed set of kinds the
/// infer-anything rule can produce.
#[derive(Clone, Debug, PartialEq)]
pub enum AdditionalValue {
    /// An explicit wire null — distinct from the property being absent.
    Null,
    Bool(bool),
    String(String),
    Decimal(Decimal),
    F64(f64),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    U16(u16),
    U32(u32),
    U64(u64),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
    Guid(Uuid),
    /// Arrays and objects are retained as an opaque structural handle, not
    /// deep-decoded, so they re-emit verbatim.
    Raw(Value),
}

impl AdditionalValue {
    /// The infer-anything rule for undeclared properties.
    ///
    /// Numbers try each width in a fixed order against the source digit
    /// sequence and keep the first that accepts; strings try the temporal
    /// and GUID shapes before falling back to plain text.
    pub fn infer(value: &Value) -> Result<AdditionalValue, Error> {
        match value {
            Value::Null => Ok(AdditionalValue::Null),
            Value::Bool(b) => Ok(AdditionalValue::Bool(*b)),
            Value::Number(n) => Self::infer_number(&n.to_string()),
            Value::String(s) => Ok(Self::infer_string(s)),
            Value::Array(_) | Value::Object(_) => Ok(AdditionalValue::Raw(value.clone())),
        }
    }

    fn infer_number(raw: &str) -> Result<AdditionalValue, Error> {
        if let Ok(d) = Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) {
            return Ok(AdditionalValue::Decimal(d));
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Ok(AdditionalValue::F64(f));
        }
        if let Ok(i) = raw.parse::<i16>() {
            return Ok(AdditionalValue::I16(i));
        }
        if let Ok(i) = raw.parse::<i32>() {
            return Ok(AdditionalValue::I32(i));
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Ok(AdditionalValue::I64(i));
        }
        if let Ok(f) = raw.parse::<f32>() {
            return Ok(AdditionalValue::F32(f));
        }
        if let Ok(u) = raw.parse::<u16>() {
            return Ok(AdditionalValue::U16(u));
        }
        if let Ok(u) = raw.parse::<u32>() {
            return Ok(AdditionalValue::U32(u));
        }
        if let Ok(u) = raw.parse::<u64>() {
            return Ok(AdditionalValue::U64(u));
        }
        Err(Error::InvalidOperation(format!(
            "no numeric kind accepts additional value {raw:?}"
        )))
    }

    fn infer_string(s: &str) -> AdditionalValue {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return AdditionalValue::DateTime(dt);
        }
        if let Ok(dto) = DateTime::parse_from_rfc3339(s) {
            return AdditionalValue::DateTimeOffset(dto);
        }
        if let Ok(guid) = Uuid::from_str(s) {
            return AdditionalValue::Guid(guid);
        }
        AdditionalValue::String(s.to_string())
    }
}

// --------------------------------- Tests ---------------------------------- //
