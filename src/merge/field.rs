//! Field tables: the declarative key mapping a mergeable type exposes.

use crate::error::MergeError;

/// A type whose fields can be overridden from a flat dotted-key option map.
///
/// Implementations return one entry per mergeable field, in declaration
/// order. The declared keys are part of the type, not the instance; the
/// same table comes back on every call.
pub trait Mergeable {
    fn merge_fields(&mut self) -> Vec<MergeField<'_>>;
}

/// One entry of a field table: the declared key plus where it lives.
pub struct MergeField<'a> {
    pub key: &'static str,
    pub slot: FieldSlot<'a>,
}

/// Location of a field inside the target value.
pub enum FieldSlot<'a> {
    Leaf(LeafSlot<'a>),
    /// A structured field. Its key only prefixes its descendants' keys.
    Nested(&'a mut dyn Mergeable),
}

/// A directly assignable field, tagged with its semantic type.
pub enum LeafSlot<'a> {
    U64(&'a mut u64),
    U32(&'a mut u32),
    Bool(&'a mut bool),
    Text(&'a mut String),
}

impl<'a> MergeField<'a> {
    pub fn u64(key: &'static str, field: &'a mut u64) -> Self {
        Self {
            key,
            slot: FieldSlot::Leaf(LeafSlot::U64(field)),
        }
    }

    pub fn u32(key: &'static str, field: &'a mut u32) -> Self {
        Self {
            key,
            slot: FieldSlot::Leaf(LeafSlot::U32(field)),
        }
    }

    pub fn flag(key: &'static str, field: &'a mut bool) -> Self {
        Self {
            key,
            slot: FieldSlot::Leaf(LeafSlot::Bool(field)),
        }
    }

    pub fn text(key: &'static str, field: &'a mut String) -> Self {
        Self {
            key,
            slot: FieldSlot::Leaf(LeafSlot::Text(field)),
        }
    }

    /// Nested structure. An empty key adds no prefix, so the child's
    /// declared keys are used as-is.
    pub fn nested(key: &'static str, field: &'a mut dyn Mergeable) -> Self {
        Self {
            key,
            slot: FieldSlot::Nested(field),
        }
    }
}

/// A parsed value bound to the slot it will be written into.
pub(crate) enum PendingWrite<'a> {
    U64(&'a mut u64, u64),
    U32(&'a mut u32, u32),
    Bool(&'a mut bool, bool),
    Text(&'a mut String, String),
}

impl<'a> LeafSlot<'a> {
    /// Name of the semantic type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            LeafSlot::U64(_) | LeafSlot::U32(_) => "unsigned integer",
            LeafSlot::Bool(_) => "boolean",
            LeafSlot::Text(_) => "string",
        }
    }

    /// Parse `raw` for this slot without writing anything yet.
    pub(crate) fn prepare(self, key: &str, raw: &str) -> Result<PendingWrite<'a>, MergeError> {
        let expected = self.type_name();
        let invalid = |reason: String| MergeError {
            key: key.to_string(),
            value: raw.to_string(),
            reason: format!("expected {}: {}", expected, reason),
        };

        match self {
            LeafSlot::U64(field) => raw
                .parse::<u64>()
                .map(|v| PendingWrite::U64(field, v))
                .map_err(|e| invalid(e.to_string())),
            LeafSlot::U32(field) => raw
                .parse::<u32>()
                .map(|v| PendingWrite::U32(field, v))
                .map_err(|e| invalid(e.to_string())),
            LeafSlot::Bool(field) => raw
                .parse::<bool>()
                .map(|v| PendingWrite::Bool(field, v))
                .map_err(|e| invalid(e.to_string())),
            LeafSlot::Text(field) => Ok(PendingWrite::Text(field, raw.to_string())),
        }
    }
}

impl PendingWrite<'_> {
    pub(crate) fn apply(self) {
        match self {
            PendingWrite::U64(field, v) => *field = v,
            PendingWrite::U32(field, v) => *field = v,
            PendingWrite::Bool(field, v) => *field = v,
            PendingWrite::Text(field, v) => *field = v,
        }
    }
}
