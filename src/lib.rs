#![doc = include_str!("../README.md")]
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod attribute;
#[cfg(feature = "deserialize")]
pub mod de;
pub mod error;
mod mesh;
mod multi;
pub mod ser;
pub mod split;

pub use attribute::{Attribute, AttributeComponent, AttributeShape, AttributeType, VertexValue};
pub use error::{Error, Result};
pub use mesh::*;
pub use multi::*;
pub use ser::chunk::WriteChunks;
pub use split::MeshSplitter;
