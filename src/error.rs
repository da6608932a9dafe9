use crate::attribute::AttributeShape;

/// Errors produced while building, transforming, or encoding meshes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("attribute {name:?} has shape {found}, expected {expected}")]
    ShapeMismatch {
        name: String,
        expected: AttributeShape,
        found: AttributeShape,
    },
    #[error("mesh {mesh:?} has no attribute named {name:?}")]
    MissingAttribute { mesh: String, name: String },
    #[error("index {index} is out of range for attribute {attribute:?}: 0..{count} ∌ {index}")]
    IndexOutOfRange {
        index: u32,
        attribute: String,
        count: usize,
    },
    #[error("attribute {0:?} already exists in this mesh")]
    DuplicateAttribute(String),
    #[error("index buffer length {0} is not a multiple of 3")]
    PartialTriangle(usize),
    #[error("index {index} does not fit in a {width}-byte index buffer")]
    IndexWidthOverflow { index: u32, width: usize },
    #[error("cannot split into submeshes of {0} vertices; need at least 3, and the index width must address all of them")]
    SplitLimit(usize),
    #[error("chunk payload of {0} bytes does not fit in a 32-bit length field")]
    ChunkTooLarge(usize),
    #[error("text {0:?} contains an interior NUL byte")]
    InteriorNul(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[cfg(feature = "de_obj")]
    #[error(transparent)]
    Import(#[from] tobj::LoadError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
