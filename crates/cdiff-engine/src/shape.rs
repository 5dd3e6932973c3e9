//! Structural classification of field values.

use serde_json::Value;

use crate::equality::Container;

/// What kind of field value this is, as far as diffing is concerned.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldShape<'a> {
    /// A block collection: every element is a container with a non-null `type`.
    /// An empty container qualifies.
    Blocks(Vec<&'a Value>),
    /// Anything else, diffed as a single value.
    Opaque(&'a Value),
}

impl<'a> FieldShape<'a> {
    pub fn of(value: &'a Value) -> Self {
        let Some(container) = Container::of(value) else {
            return Self::Opaque(value);
        };
        let blocks: Vec<&'a Value> = container.values().collect();
        let all_blocks = blocks.iter().all(|block| {
            Container::of(block)
                .and_then(|b| b.get("type"))
                .is_some_and(|t| !t.is_null())
        });
        if all_blocks {
            Self::Blocks(blocks)
        } else {
            Self::Opaque(value)
        }
    }

    pub fn is_blocks(&self) -> bool {
        matches!(self, Self::Blocks(_))
    }
}

/// Returns `true` if either value is shaped like a block collection.
pub(crate) fn either_is_blocks(a: &Value, b: &Value) -> bool {
    FieldShape::of(a).is_blocks() || FieldShape::of(b).is_blocks()
}
