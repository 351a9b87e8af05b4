//! The parse node: an immutable view over one JSON value.
//!
//! Children are built on demand as accessors walk the document — never as a
//! persistent tree — and inherit the pre-/post-assignment hooks of their
//! parent. Kind mismatches answer absent; only present-but-corrupt content
//! (bad base64, malformed dates, numbers out of width) is an error.

use std::any::{Any, TypeId};
use std::rc::Rc;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use crate::enums::{WireEnum, WireFlags, decode_enum, decode_flags};
use crate::error::Error;
use crate::model::{AdditionalValue, Parsable};
use crate::temporal;
use crate::untyped::UntypedNode;
use crate::writer::JsonSerializationWriter;

/// Cross-cutting instrumentation hook invoked around field assignment.
pub type AssignmentHook = dyn Fn(&dyn Parsable);

/// Read-only handle on one JSON value plus its position in a document.
#[derive(Clone)]
pub struct JsonParseNode<'a> {
    value: &'a Value,
    on_before_assign: Option<Rc<AssignmentHook>>,
    on_after_assign: Option<Rc<AssignmentHook>>,
}

impl<'a> JsonParseNode<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self {
            value,
            on_before_assign: None,
            on_after_assign: None,
        }
    }

    /// Install a hook to run before each object's fields are assigned.
    /// Children inherit it.
    pub fn set_on_before_assign_field_values(&mut self, hook: Option<Rc<AssignmentHook>>) {
        self.on_before_assign = hook;
    }

    /// Install a hook to run after each object's fields are assigned.
    /// Children inherit it.
    pub fn set_on_after_assign_field_values(&mut self, hook: Option<Rc<AssignmentHook>>) {
        self.on_after_assign = hook;
    }

    /// A child node over `value`, inheriting hooks.
    fn child(&self, value: &'a Value) -> JsonParseNode<'a> {
        JsonParseNode {
            value,
            on_before_assign: self.on_before_assign.clone(),
            on_after_assign: self.on_after_assign.clone(),
        }
    }

    // --------------------------- Scalar getters --------------------------- //

    pub fn get_string_value(&self) -> Option<String> {
        self.value.as_str().map(str::to_owned)
    }

    pub fn get_bool_value(&self) -> Option<bool> {
        self.value.as_bool()
    }

    pub fn get_u8_value(&self) -> Result<Option<u8>, Error> {
        self.integer_value("byte")
    }

    pub fn get_i8_value(&self) -> Result<Option<i8>, Error> {
        self.integer_value("signed byte")
    }

    pub fn get_i32_value(&self) -> Result<Option<i32>, Error> {
        self.integer_value("int32")
    }

    pub fn get_i64_value(&self) -> Result<Option<i64>, Error> {
        self.integer_value("int64")
    }

    pub fn get_f32_value(&self) -> Option<f32> {
        self.get_f64_value().map(|f| f as f32)
    }

    pub fn get_f64_value(&self) -> Option<f64> {
        match self.value {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn get_decimal_value(&self) -> Result<Option<Decimal>, Error> {
        let Value::Number(n) = self.value else {
            return Ok(None);
        };
        let raw = n.to_string();
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map(Some)
            .map_err(|_| Error::format("decimal", raw))
    }

    pub fn get_guid_value(&self) -> Result<Option<Uuid>, Error> {
        let Some(raw) = self.value.as_str() else {
            return Ok(None);
        };
        Uuid::parse_str(raw)
            .map(Some)
            .map_err(|_| Error::format("guid", raw.to_string()))
    }

    /// Strict RFC 3339 first, then a lenient general parse, before failing.
    pub fn get_date_time_offset_value(&self) -> Result<Option<DateTime<FixedOffset>>, Error> {
        let Some(raw) = self.value.as_str() else {
            return Ok(None);
        };
        temporal::parse_date_time_offset(raw).map(Some)
    }

    /// An ISO-8601 period (`PT1H`).
    pub fn get_duration_value(&self) -> Result<Option<Duration>, Error> {
        let Some(raw) = self.value.as_str() else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        temporal::parse_duration(raw).map(Some)
    }

    pub fn get_date_value(&self) -> Result<Option<NaiveDate>, Error> {
        let Some(raw) = self.value.as_str() else {
            return Ok(None);
        };
        temporal::parse_date(raw).map(Some)
    }

    pub fn get_time_value(&self) -> Result<Option<NaiveTime>, Error> {
        let Some(raw) = self.value.as_str() else {
            return Ok(None);
        };
        temporal::parse_time(raw).map(Some)
    }

    /// Base64-decoded bytes; an empty string is absence, not an error.
    pub fn get_byte_array_value(&self) -> Result<Option<Vec<u8>>, Error> {
        let Some(raw) = self.value.as_str() else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        BASE64
            .decode(raw)
            .map(Some)
            .map_err(|_| Error::format("base64", raw.to_string()))
    }

    /// Absent when the backing string is empty/absent or matches no member.
    pub fn get_enum_value<T: WireEnum>(&self) -> Option<T> {
        let raw = self.value.as_str()?;
        if raw.is_empty() {
            return None;
        }
        decode_enum(raw)
    }

    /// Absent only when the backing string is empty/absent; a token with no
    /// recognized pieces is the zero value.
    pub fn get_flags_enum_value<T: WireFlags>(&self) -> Option<T> {
        let raw = self.value.as_str()?;
        if raw.is_empty() {
            return None;
        }
        Some(decode_flags(raw))
    }

    fn integer_value<T: TryFrom<i64>>(&self, kind: &'static str) -> Result<Option<T>, Error> {
        let Value::Number(n) = self.value else {
            return Ok(None);
        };
        let wide = n
            .as_i64()
            .ok_or_else(|| Error::format(kind, n.to_string()))?;
        T::try_from(wide)
            .map(Some)
            .map_err(|_| Error::format(kind, n.to_string()))
    }

    // ------------------------- Structure accessors ------------------------ //

    /// The named property as a new node, hooks propagated. Absent when this
    /// node is not an object or the name is missing.
    pub fn get_child_node(&self, name: &str) -> Result<Option<JsonParseNode<'a>>, Error> {
        if name.is_empty() {
            return Err(Error::Argument("name"));
        }
        Ok(self
            .value
            .as_object()
            .and_then(|properties| properties.get(name))
            .map(|value| self.child(value)))
    }

    /// Lazy, forward-only element sequence; empty when this node is not an
    /// array. Re-invoking this accessor is the only way to restart.
    pub fn get_collection_of_primitive_values<T: PrimitiveValue + 'a>(
        &self,
    ) -> impl Iterator<Item = Result<Option<T>, Error>> + 'a {
        let template = self.clone();
        self.value
            .as_array()
            .into_iter()
            .flatten()
            .map(move |element| T::from_node(&template.child(element)))
    }

    /// Lazy, forward-only object sequence; each element is built through
    /// `factory` and bound like any other object node.
    pub fn get_collection_of_object_values<T, F>(
        &self,
        factory: F,
    ) -> impl Iterator<Item = Result<T, Error>> + 'a
    where
        T: Parsable + 'static,
        F: Fn(&JsonParseNode<'_>) -> Result<T, Error> + 'a,
    {
        let template = self.clone();
        self.value
            .as_array()
            .into_iter()
            .flatten()
            .map(move |element| template.child(element).get_object_value(&factory))
    }

    /// Lazy, forward-only enum sequence; unmatched elements yield absent.
    pub fn get_collection_of_enum_values<T: WireEnum>(
        &self,
    ) -> impl Iterator<Item = Option<T>> + 'a {
        let template = self.clone();
        self.value
            .as_array()
            .into_iter()
            .flatten()
            .map(move |element| template.child(element).get_enum_value())
    }

    /// Build a model from this node: construct through `factory` (which may
    /// inspect the node for a discriminator), then run field binding between
    /// the two hooks. When `T` is the tagged-value tree, short-circuits to
    /// the materializer and ignores `factory`.
    pub fn get_object_value<T, F>(&self, factory: F) -> Result<T, Error>
    where
        T: Parsable + 'static,
        F: Fn(&JsonParseNode<'_>) -> Result<T, Error>,
    {
        if TypeId::of::<T>() == TypeId::of::<UntypedNode>() {
            let untyped: Box<dyn Any> = Box::new(self.get_untyped_value());
            let tree = untyped.downcast::<T>().expect("TypeId matched UntypedNode");
            return Ok(*tree);
        }
        let mut item = factory(self)?;
        if let Some(hook) = &self.on_before_assign {
            hook(&item);
        }
        self.assign_field_values(&mut item)?;
        if let Some(hook) = &self.on_after_assign {
            hook(&item);
        }
        Ok(item)
    }

    /// Materialize this node into the tagged value tree.
    pub fn get_untyped_value(&self) -> UntypedNode {
        materialize(self.value)
    }

    // ----------------------------- Field binding -------------------------- //

    /// Walk the object's properties in document order, dispatching each to
    /// the model's declared-field table or its additional-data sink.
    /// No-op when this node is not an object.
    fn assign_field_values<T: Parsable>(&self, item: &mut T) -> Result<(), Error> {
        let Some(properties) = self.value.as_object() else {
            return Ok(());
        };
        let deserializers = item.field_deserializers();
        for (name, raw) in properties {
            if let Some(deserializer) = deserializers.get(name.as_str()) {
                // A null never reaches a declared setter: the field keeps
                // its prior/default value.
                if raw.is_null() {
                    tracing::trace!(property = %name, "declared property is null, skipping");
                    continue;
                }
                tracing::debug!(property = %name, "binding declared property");
                deserializer(item, &self.child(raw))?;
            } else if let Some(sink) = item.additional_data_sink() {
                tracing::debug!(property = %name, "capturing additional property");
                if !sink.contains_key(name.as_str()) {
                    sink.insert(name.clone(), AdditionalValue::infer(raw)?);
                }
            } else {
                tracing::debug!(property = %name, "dropping property, model has no sink");
            }
        }
        Ok(())
    }
}

/// Depth-first conversion into the tagged value tree. Numbers carry their
/// source digit sequence through untouched.
fn materialize(value: &Value) -> UntypedNode {
    match value {
        Value::Null => UntypedNode::Null,
        Value::Bool(b) => UntypedNode::Boolean(*b),
        Value::Number(n) => UntypedNode::Number(n.to_string()),
        Value::String(s) => UntypedNode::String(s.clone()),
        Value::Array(items) => UntypedNode::Array(items.iter().map(materialize).collect()),
        Value::Object(properties) => UntypedNode::Object(
            properties
                .iter()
                .map(|(name, value)| (name.clone(), materialize(value)))
                .collect::<IndexMap<_, _>>(),
        ),
    }
}

// --------------------------- Primitive dispatch --------------------------- //

/// Element dispatch for primitive collections: each supported kind knows
/// which scalar getter reads it and how it writes back. Requesting an
/// unsupported element type fails at compile time rather than at runtime.
pub trait PrimitiveValue: Sized {
    fn from_node(node: &JsonParseNode<'_>) -> Result<Option<Self>, Error>;
    fn write_value(&self, writer: &mut JsonSerializationWriter);
}

macro_rules! primitive_value {
    ($ty:ty, $get:ident, $write:ident, fallible) => {
        impl PrimitiveValue for $ty {
            fn from_node(node: &JsonParseNode<'_>) -> Result<Option<Self>, Error> {
                node.$get()
            }
            fn write_value(&self, writer: &mut JsonSerializationWriter) {
                writer.$write(None, self.clone());
            }
        }
    };
    ($ty:ty, $get:ident, $write:ident) => {
        impl PrimitiveValue for $ty {
            fn from_node(node: &JsonParseNode<'_>) -> Result<Option<Self>, Error> {
                Ok(node.$get())
            }
            fn write_value(&self, writer: &mut JsonSerializationWriter) {
                writer.$write(None, self.clone());
            }
        }
    };
}

primitive_value!(bool, get_bool_value, write_bool_value);
primitive_value!(f32, get_f32_value, write_f32_value);
primitive_value!(f64, get_f64_value, write_f64_value);
primitive_value!(u8, get_u8_value, write_u8_value, fallible);
primitive_value!(i8, get_i8_value, write_i8_value, fallible);
primitive_value!(i32, get_i32_value, write_i32_value, fallible);
primitive_value!(i64, get_i64_value, write_i64_value, fallible);
primitive_value!(Decimal, get_decimal_value, write_decimal_value, fallible);
primitive_value!(Uuid, get_guid_value, write_guid_value, fallible);
primitive_value!(Duration, get_duration_value, write_duration_value, fallible);
primitive_value!(NaiveDate, get_date_value, write_date_value, fallible);
primitive_value!(NaiveTime, get_time_value, write_time_value, fallible);

impl PrimitiveValue for String {
    fn from_node(node: &JsonParseNode<'_>) -> Result<Option<Self>, Error> {
        Ok(node.get_string_value())
    }
    fn write_value(&self, writer: &mut JsonSerializationWriter) {
        writer.write_string_value(None, self);
    }
}

impl PrimitiveValue for DateTime<FixedOffset> {
    fn from_node(node: &JsonParseNode<'_>) -> Result<Option<Self>, Error> {
        node.get_date_time_offset_value()
    }
    fn write_value(&self, writer: &mut JsonSerializationWriter) {
        writer.write_date_time_offset_value(None, *self);
    }
}

// --------------------------------- Tests ---------------------------------- //
