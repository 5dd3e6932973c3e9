//! Structured labels for field differences.
//!
//! A difference inside a block field is addressed by the field handle, the
//! block position and type, and the sub-field name, repeated for each level of
//! nesting. Labels are kept as segments while diffing and rendered to text only
//! when the report is built, e.g. `body — Block 2 (image): caption`.

use std::fmt;

/// One step of a [`FieldPath`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field handle, block attribute, or top-level record key.
    Field(String),
    /// A block at a 1-based position, labelled with its display type.
    Block { number: usize, block_type: String },
    /// The type attribute of the block at a 1-based position.
    BlockType { number: usize },
}

/// A displayable path to a single field difference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// A path rooted at a field handle.
    pub fn field(handle: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(handle.into())],
        }
    }

    fn with(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Descend into the block at 1-based `number`.
    pub fn block(&self, number: usize, block_type: impl Into<String>) -> Self {
        self.with(PathSegment::Block {
            number,
            block_type: block_type.into(),
        })
    }

    /// The type attribute of the block at 1-based `number`.
    pub fn block_type(&self, number: usize) -> Self {
        self.with(PathSegment::BlockType { number })
    }

    /// A named attribute or sub-field below the current path.
    pub fn sub_field(&self, name: impl Into<String>) -> Self {
        self.with(PathSegment::Field(name.into()))
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Handle of the top-level field this path starts at.
    pub fn root(&self) -> Option<&str> {
        match self.segments.first() {
            Some(PathSegment::Field(name)) => Some(name),
            _ => None,
        }
    }

    /// Number of block levels the path descends through.
    pub fn block_depth(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::Block { .. } | PathSegment::BlockType { .. }))
            .count()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ": {name}")?,
                PathSegment::Block { number, block_type } => {
                    write!(f, " — Block {number} ({block_type})")?
                }
                PathSegment::BlockType { number } => write!(f, " — Block {number} (type)")?,
            }
        }
        Ok(())
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}
