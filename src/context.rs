//! Read-only configuration shared across one parse or write operation.
//!
//! The context is constructed explicitly at the call boundary and handed to
//! the factory (parse side) or the writer (write side). It is never mutated
//! mid-traversal; `Default::default()` is a constructor, not shared state.

/// Textual format used when emitting GUID values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuidFormat {
    /// `48d31887-5fad-4d73-a9f5-3c356e68a038`
    #[default]
    Hyphenated,
    /// `48d318875fad4d73a9f53c356e68a038`
    Simple,
}

/// Configuration for one parse or write operation.
///
/// Safely reused across many independent operations; share it behind an
/// `Arc` when a factory and several writers need the same settings.
#[derive(Clone, Debug, Default)]
pub struct JsonSerializationContext {
    pub guid_format: GuidFormat,
}

impl JsonSerializationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_guid_format(mut self, format: GuidFormat) -> Self {
        self.guid_format = format;
        self
    }
}
