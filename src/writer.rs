//! The serialization writer: the inverse of the parse node.
//!
//! Produces exactly compact JSON text into an in-memory buffer. Models write
//! their own fields through the typed `write_*_value` surface; structure
//! (separators, property names, object/array framing) is the writer's
//! business. String escaping is whatever serde_json's encoder does.

use std::any::Any;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, Timelike};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::context::{GuidFormat, JsonSerializationContext};
use crate::enums::{WireEnum, WireFlags, encode_enum, encode_flags};
use crate::model::{AdditionalData, AdditionalValue, Parsable};
use crate::node::PrimitiveValue;
use crate::temporal;
use crate::untyped::UntypedNode;

/// Streaming-style writer over an owned byte buffer.
pub struct JsonSerializationWriter {
    buffer: Vec<u8>,
    /// One frame per open object/array: true once its first entry exists.
    frames: Vec<bool>,
    /// Set when a property name has been emitted and the next bare value
    /// belongs to it (composed wrappers serialize as bare values).
    pending_bare: bool,
    context: Arc<JsonSerializationContext>,
}

impl Default for JsonSerializationWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonSerializationWriter {
    pub fn new() -> Self {
        Self::with_context(Arc::default())
    }

    /// A writer bound to an explicitly constructed context.
    pub fn with_context(context: Arc<JsonSerializationContext>) -> Self {
        Self {
            buffer: Vec::new(),
            frames: vec![false],
            pending_bare: false,
            context,
        }
    }

    /// The serialized content produced so far, as UTF-8 bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// The serialized content produced so far, as text.
    pub fn into_string(self) -> String {
        String::from_utf8(self.buffer).unwrap_or_default()
    }

    // ------------------------------ Framing ------------------------------- //

    /// Separator-and-name prologue for the next entry.
    fn begin_entry(&mut self, name: Option<&str>) {
        if self.pending_bare {
            // The property name is already out; this value completes it.
            self.pending_bare = false;
            return;
        }
        if let Some(started) = self.frames.last_mut() {
            if *started {
                self.buffer.push(b',');
            } else {
                *started = true;
            }
        }
        if let Some(name) = name {
            self.push_json(&name);
            self.buffer.push(b':');
        }
    }

    fn open(&mut self, bracket: u8) {
        self.buffer.push(bracket);
        self.frames.push(false);
    }

    fn close(&mut self, bracket: u8) {
        self.buffer.push(bracket);
        self.frames.pop();
    }

    /// Append a value through serde_json's encoder (compact, default
    /// escaping). Unencodable values (non-finite floats) become null.
    fn push_json<T: serde::Serialize>(&mut self, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.buffer.extend_from_slice(&bytes),
            Err(_) => self.buffer.extend_from_slice(b"null"),
        }
    }

    fn write_token<T: serde::Serialize>(&mut self, name: Option<&str>, value: &T) {
        self.begin_entry(name);
        self.push_json(value);
    }

    // ------------------------------ Scalars ------------------------------- //

    pub fn write_null_value(&mut self, name: Option<&str>) {
        self.begin_entry(name);
        self.buffer.extend_from_slice(b"null");
    }

    pub fn write_string_value(&mut self, name: Option<&str>, value: &str) {
        self.write_token(name, &value);
    }

    pub fn write_bool_value(&mut self, name: Option<&str>, value: bool) {
        self.write_token(name, &value);
    }

    pub fn write_u8_value(&mut self, name: Option<&str>, value: u8) {
        self.write_token(name, &value);
    }

    pub fn write_i8_value(&mut self, name: Option<&str>, value: i8) {
        self.write_token(name, &value);
    }

    pub fn write_i32_value(&mut self, name: Option<&str>, value: i32) {
        self.write_token(name, &value);
    }

    pub fn write_i64_value(&mut self, name: Option<&str>, value: i64) {
        self.write_token(name, &value);
    }

    pub fn write_f32_value(&mut self, name: Option<&str>, value: f32) {
        self.write_token(name, &value);
    }

    pub fn write_f64_value(&mut self, name: Option<&str>, value: f64) {
        self.write_token(name, &value);
    }

    /// Decimals keep their scale: `1.80` stays `1.80`.
    pub fn write_decimal_value(&mut self, name: Option<&str>, value: Decimal) {
        self.begin_entry(name);
        self.buffer.extend_from_slice(value.to_string().as_bytes());
    }

    pub fn write_guid_value(&mut self, name: Option<&str>, value: Uuid) {
        let text = match self.context.guid_format {
            GuidFormat::Hyphenated => value.hyphenated().to_string(),
            GuidFormat::Simple => value.simple().to_string(),
        };
        self.write_string_value(name, &text);
    }

    pub fn write_date_time_offset_value(&mut self, name: Option<&str>, value: DateTime<FixedOffset>) {
        self.write_string_value(name, &value.to_rfc3339_opts(SecondsFormat::AutoSi, false));
    }

    pub fn write_duration_value(&mut self, name: Option<&str>, value: Duration) {
        self.write_string_value(name, &temporal::format_duration(value));
    }

    pub fn write_date_value(&mut self, name: Option<&str>, value: NaiveDate) {
        self.write_string_value(name, &value.format("%Y-%m-%d").to_string());
    }

    pub fn write_time_value(&mut self, name: Option<&str>, value: NaiveTime) {
        let format = if value.nanosecond() > 0 {
            "%H:%M:%S%.f"
        } else {
            "%H:%M:%S"
        };
        self.write_string_value(name, &value.format(format).to_string());
    }

    pub fn write_byte_array_value(&mut self, name: Option<&str>, value: &[u8]) {
        self.write_string_value(name, &BASE64.encode(value));
    }

    /// Wire-name override when declared, else the camel-cased member name.
    pub fn write_enum_value<T: WireEnum>(&mut self, name: Option<&str>, value: T) {
        if let Some(token) = encode_enum(value) {
            self.write_string_value(name, &token);
        }
    }

    /// Comma-joined tokens of every set bit, in declaration order.
    pub fn write_flags_enum_value<T: WireFlags>(&mut self, name: Option<&str>, value: T) {
        let token = encode_flags(value);
        self.write_string_value(name, &token);
    }

    // ----------------------------- Structures ----------------------------- //

    /// Write a model as a JSON object. Composed wrappers serialize their own
    /// bare value; the tagged value tree re-emits verbatim.
    pub fn write_object_value<T: Parsable + 'static>(&mut self, name: Option<&str>, value: &T) {
        let any: &dyn Any = value;
        if let Some(untyped) = any.downcast_ref::<UntypedNode>() {
            self.write_untyped_value(name, untyped);
            return;
        }
        if value.is_composed() {
            if name.is_some() {
                self.begin_entry(name);
                self.pending_bare = true;
            }
            value.serialize(self);
            return;
        }
        self.begin_entry(name);
        self.open(b'{');
        value.serialize(self);
        self.close(b'}');
    }

    /// Flatten several models' fields into one JSON object — the
    /// serialization mirror of brute-force composition.
    pub fn write_fused_object_value(&mut self, name: Option<&str>, parts: &[&dyn Parsable]) {
        self.begin_entry(name);
        self.open(b'{');
        for part in parts {
            part.serialize(self);
        }
        self.close(b'}');
    }

    pub fn write_collection_of_primitive_values<T: PrimitiveValue>(
        &mut self,
        name: Option<&str>,
        values: &[T],
    ) {
        self.begin_entry(name);
        self.open(b'[');
        for value in values {
            value.write_value(self);
        }
        self.close(b']');
    }

    pub fn write_collection_of_object_values<T: Parsable + 'static>(
        &mut self,
        name: Option<&str>,
        values: &[T],
    ) {
        self.begin_entry(name);
        self.open(b'[');
        for value in values {
            self.write_object_value(None, value);
        }
        self.close(b']');
    }

    /// Re-emit a tagged value tree verbatim; number nodes contribute their
    /// original digit sequence.
    pub fn write_untyped_value(&mut self, name: Option<&str>, node: &UntypedNode) {
        self.begin_entry(name);
        match node {
            UntypedNode::Null => self.buffer.extend_from_slice(b"null"),
            UntypedNode::Boolean(b) => self.push_json(b),
            UntypedNode::Number(raw) => self.buffer.extend_from_slice(raw.as_bytes()),
            UntypedNode::String(s) => self.push_json(s),
            UntypedNode::Array(items) => {
                self.open(b'[');
                for item in items {
                    self.write_untyped_value(None, item);
                }
                self.close(b']');
            }
            UntypedNode::Object(properties) => {
                self.open(b'{');
                for (key, value) in properties {
                    self.write_untyped_value(Some(key), value);
                }
                self.close(b'}');
            }
        }
    }

    /// Write captured schema-unknown properties back out, each through the
    /// matching typed write.
    pub fn write_additional_data(&mut self, data: &AdditionalData) {
        for (name, value) in data {
            let name = Some(name.as_str());
            match value {
                AdditionalValue::Null => self.write_null_value(name),
                AdditionalValue::Bool(b) => self.write_bool_value(name, *b),
                AdditionalValue::String(s) => self.write_string_value(name, s),
                AdditionalValue::Decimal(d) => self.write_decimal_value(name, *d),
                AdditionalValue::F64(f) => self.write_f64_value(name, *f),
                AdditionalValue::F32(f) => self.write_f32_value(name, *f),
                AdditionalValue::I16(i) => self.write_token(name, i),
                AdditionalValue::I32(i) => self.write_i32_value(name, *i),
                AdditionalValue::I64(i) => self.write_i64_value(name, *i),
                AdditionalValue::U16(u) => self.write_token(name, u),
                AdditionalValue::U32(u) => self.write_token(name, u),
                AdditionalValue::U64(u) => self.write_token(name, u),
                AdditionalValue::DateTime(dt) => {
                    let text = dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string();
                    self.write_string_value(name, &text);
                }
                AdditionalValue::DateTimeOffset(dto) => {
                    self.write_date_time_offset_value(name, *dto);
                }
                AdditionalValue::Guid(guid) => self.write_guid_value(name, *guid),
                AdditionalValue::Raw(raw) => self.write_token(name, raw),
            }
        }
    }
}

// --------------------------------- Tests ---------------------------------- //
