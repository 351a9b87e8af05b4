//! Composed-type resolution: "one of" and "all of" wrapper support.
//!
//! A composed wrapper owns named candidate sub-models plus an optional
//! bare-scalar slot; at most one of the two is meaningful per instance, and
//! which one is decided during resolution and never changes afterward.
//! Wrapper factories pick one of two policies:
//!
//! - Discriminator-driven: classify from a designated type-tag child and
//!   instantiate exactly one candidate. A bare-scalar root populates the
//!   scalar slot instead and binding stops (empty field table). No match on
//!   either path leaves every slot empty — ambiguity is observable, not an
//!   error.
//! - Brute-force: instantiate every candidate, then merge their field
//!   tables. A property declared by several candidates binds only into the
//!   first-registered one; later duplicates are dropped. Collisions resolve
//!   by candidate priority, never by value inspection.

use crate::error::Error;
use crate::model::FieldDeserializerMap;
use crate::node::JsonParseNode;

/// Where resolution of one wrapper instance landed. Terminal once it leaves
/// `Unresolved`; field binding proceeds only from `CandidatesResolved`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolutionState {
    #[default]
    Unresolved,
    /// The root was a bare scalar; the scalar slot holds it.
    ScalarResolved,
    /// The root was an object and at least one candidate was instantiated.
    CandidatesResolved,
}

/// The pure classify step: read the designated type-tag child, nothing else.
/// Absent when the node is not an object, the property is missing, or its
/// value is not a string.
pub fn discriminator_value(
    node: &JsonParseNode<'_>,
    property: &str,
) -> Result<Option<String>, Error> {
    Ok(node
        .get_child_node(property)?
        .and_then(|child| child.get_string_value()))
}

/// Re-key a candidate's field table onto the wrapper: each callback reaches
/// through `lens` into the candidate slot, and is a no-op if the slot is
/// empty.
pub fn project_deserializers<W: 'static, C: 'static>(
    table: FieldDeserializerMap<C>,
    lens: for<'w> fn(&'w mut W) -> Option<&'w mut C>,
) -> FieldDeserializerMap<W> {
    table
        .into_iter()
        .map(|(name, deserializer)| {
            let projected: crate::model::FieldDeserializer<W> =
                Box::new(move |wrapper: &mut W, node: &JsonParseNode<'_>| {
                    match lens(wrapper) {
                        Some(candidate) => deserializer(candidate, node),
                        None => Ok(()),
                    }
                });
            (name, projected)
        })
        .collect()
}

/// Merge candidate tables in registration order; the first candidate to
/// declare a name keeps it.
pub fn merge_first_wins<T>(
    tables: impl IntoIterator<Item = FieldDeserializerMap<T>>,
) -> FieldDeserializerMap<T> {
    let mut merged = FieldDeserializerMap::new();
    for table in tables {
        for (name, deserializer) in table {
            merged.entry(name).or_insert(deserializer);
        }
    }
    merged
}

// --------------------------------- Tests ---------------------------------- //
