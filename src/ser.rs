//! Serialization of [Meshes](crate::Mesh) and [MultiMeshes](crate::MultiMesh).
//!
//! * [chunk]: the tagged binary container
//! * [obj]: Wavefront-style text

pub mod chunk;
pub mod obj;
