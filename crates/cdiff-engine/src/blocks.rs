//! Block collection diff: expand a differing block field into per-block,
//! per-attribute, per-sub-field differences.
//!
//! Blocks are aligned by position. Block *i* on one side is always compared
//! with block *i* on the other, so inserting a block near the front shows up
//! as changes to every block after it.

use std::borrow::Cow;

use serde_json::Value;

use cdiff_types::{FieldDiff, FieldPath};

use crate::equality::{scalar_string, union_keys, value_changed, Container};
use crate::shape::either_is_blocks;

/// Recursion budget for nested block collections.
pub const DEFAULT_BLOCK_DEPTH: usize = 10;

/// Block attributes compared alongside the block's fields.
pub const BLOCK_ATTRIBUTES: [&str; 4] = ["title", "slug", "enabled", "collapsed"];

/// Type label of a missing block or a block without a usable type.
const UNKNOWN_TYPE: &str = "?";

static NULL: Value = Value::Null;

/// One side of a positional block pair.
#[derive(Clone, Copy)]
struct BlockView<'a> {
    block: Option<Container<'a>>,
}

impl<'a> BlockView<'a> {
    fn new(block: Option<&'a Value>) -> Self {
        Self {
            block: block.and_then(Container::of),
        }
    }

    fn type_value(&self) -> Option<&'a Value> {
        self.block
            .and_then(|b| b.get("type"))
            .filter(|t| !t.is_null())
    }

    /// The raw type as reported in a type difference.
    fn raw_type(&self) -> Value {
        self.type_value()
            .cloned()
            .unwrap_or_else(|| Value::from(UNKNOWN_TYPE))
    }

    /// The type as text; containers have no usable type.
    fn type_label(&self) -> Cow<'a, str> {
        match self.type_value() {
            Some(v) if matches!(v, Value::String(_) | Value::Number(_) | Value::Bool(_)) => {
                scalar_string(v)
            }
            _ => Cow::Borrowed(UNKNOWN_TYPE),
        }
    }

    fn attribute(&self, key: &str) -> &'a Value {
        self.block.and_then(|b| b.get(key)).unwrap_or(&NULL)
    }

    fn fields(&self) -> Option<Container<'a>> {
        self.block
            .and_then(|b| b.get("fields"))
            .and_then(Container::of)
    }
}

fn block_list(value: &Value) -> Vec<&Value> {
    Container::of(value)
        .map(|c| c.values().collect())
        .unwrap_or_default()
}

/// Expand the difference between two block field values.
///
/// `path` labels the field being expanded. Nested block collections are
/// expanded while `depth` is above zero; at zero a differing nested field is
/// reported as a single value pair. An empty result means nothing below the
/// block level differs, and callers report the field as a whole instead.
///
/// Paths are unique per expansion; should two ever render to the same text,
/// the later difference wins once the paths become report labels.
pub fn expand_block_field_diffs(
    path: &FieldPath,
    current: &Value,
    remote: &Value,
    depth: usize,
) -> Vec<(FieldPath, FieldDiff)> {
    let current_blocks = block_list(current);
    let remote_blocks = block_list(remote);
    let count = current_blocks.len().max(remote_blocks.len());
    let mut out = Vec::new();

    for i in 0..count {
        let c = BlockView::new(current_blocks.get(i).copied());
        let r = BlockView::new(remote_blocks.get(i).copied());
        let number = i + 1;

        let (c_type, r_type) = (c.type_label(), r.type_label());
        if c_type != r_type {
            out.push((
                path.block_type(number),
                FieldDiff::new(c.raw_type(), r.raw_type()),
            ));
        }
        let type_label = if c_type != UNKNOWN_TYPE { c_type } else { r_type };
        let prefix = path.block(number, type_label);

        for attribute in BLOCK_ATTRIBUTES {
            let (cv, rv) = (c.attribute(attribute), r.attribute(attribute));
            if value_changed(cv, rv) {
                out.push((prefix.sub_field(attribute), FieldDiff::new(cv.clone(), rv.clone())));
            }
        }

        let (c_fields, r_fields) = (c.fields(), r.fields());
        for handle in union_keys(c_fields, r_fields) {
            let cv = c_fields.and_then(|f| f.get(&handle)).unwrap_or(&NULL);
            let rv = r_fields.and_then(|f| f.get(&handle)).unwrap_or(&NULL);
            if !value_changed(cv, rv) {
                continue;
            }
            let sub_path = prefix.sub_field(handle);
            if depth > 0 && either_is_blocks(cv, rv) {
                let nested = expand_block_field_diffs(&sub_path, cv, rv, depth - 1);
                if nested.is_empty() {
                    out.push((sub_path, FieldDiff::new(cv.clone(), rv.clone())));
                } else {
                    out.extend(nested);
                }
            } else {
                out.push((sub_path, FieldDiff::new(cv.clone(), rv.clone())));
            }
        }
    }

    out
}
