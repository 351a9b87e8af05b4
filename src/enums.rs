//! Wire-name mapping for enumerations.
//!
//! Generated enums carry a declaration-order member table instead of runtime
//! reflection: each member has a Rust-side name and an optional explicit
//! wire-name override. Reading matches overrides exactly first, then member
//! names case-insensitively. Writing emits the override when present, else
//! the member name with its first letter lowercased.

use std::ops::{BitAnd, BitOr};

/// One declared member of a wire enum.
#[derive(Clone, Copy, Debug)]
pub struct WireEnumMember<T: 'static> {
    pub value: T,
    pub name: &'static str,
    /// Explicit wire token, when the member name cannot appear on the wire
    /// as-is (e.g. `Item2:SubItem1`).
    pub wire_name: Option<&'static str>,
}

/// A non-flag enumeration: the whole wire token must resolve to exactly one
/// member.
pub trait WireEnum: Copy + PartialEq + 'static {
    /// Members in declaration order.
    fn members() -> &'static [WireEnumMember<Self>];
}

/// A bit-flag enumeration: the wire token is a comma-joined list of member
/// tokens, OR-ed together. `Default::default()` must be the zero value.
pub trait WireFlags:
    Copy + Default + PartialEq + BitOr<Output = Self> + BitAnd<Output = Self> + 'static
{
    /// Members in declaration order.
    fn members() -> &'static [WireEnumMember<Self>];
}

// ---------------------------- Token resolution ---------------------------- //

/// Resolve one wire token against a member table. Overrides win on an exact
/// match; member names match case-insensitively.
pub(crate) fn resolve_member<T: Copy>(
    members: &'static [WireEnumMember<T>],
    token: &str,
) -> Option<T> {
    if let Some(member) = members
        .iter()
        .find(|m| m.wire_name.is_some_and(|w| w == token))
    {
        return Some(member.value);
    }
    members
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(token))
        .map(|m| m.value)
}

/// Decode a non-flag token: no match yields absent.
pub(crate) fn decode_enum<T: WireEnum>(token: &str) -> Option<T> {
    resolve_member(T::members(), token)
}

/// Decode a flag token list: unmatched pieces are dropped silently, and zero
/// matches yields the zero value rather than absent.
pub(crate) fn decode_flags<T: WireFlags>(token: &str) -> T {
    let mut acc = T::default();
    for piece in token.split(',') {
        if let Some(value) = resolve_member(T::members(), piece.trim()) {
            acc = acc | value;
        }
    }
    acc
}

// ------------------------------ Wire output ------------------------------- //

/// The token a member is written as: override verbatim, else the member name
/// with its first letter lowercased.
pub(crate) fn wire_token<T: 'static>(member: &WireEnumMember<T>) -> String {
    match member.wire_name {
        Some(wire) => wire.to_string(),
        None => lower_first(member.name),
    }
}

/// The wire token of a non-flag value, if it is a declared member.
pub(crate) fn encode_enum<T: WireEnum>(value: T) -> Option<String> {
    T::members()
        .iter()
        .find(|m| m.value == value)
        .map(wire_token)
}

/// The comma-joined wire tokens of every set bit, in declaration order.
pub(crate) fn encode_flags<T: WireFlags>(value: T) -> String {
    let zero = T::default();
    T::members()
        .iter()
        .filter(|m| m.value != zero && (value & m.value) == m.value)
        .map(wire_token)
        .collect::<Vec<_>>()
        .join(",")
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// --------------------------------- Tests ---------------------------------- //
