//! Ordered sets of meshes.

use crate::{
    ser::chunk::{ChunkSink, ChunkWriter, WriteChunks},
    Mesh, Result,
};

/// An ordered set of [Meshes](Mesh), usually the output of a
/// [MeshSplitter](crate::MeshSplitter).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiMesh {
    meshes: Vec<Mesh>,
}

impl MultiMesh {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, mesh: Mesh) {
        self.meshes.push(mesh);
    }

    #[inline]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Mesh> {
        self.meshes.iter()
    }

    /// Total number of triangles across every submesh.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }
}

impl From<Mesh> for MultiMesh {
    fn from(mesh: Mesh) -> Self {
        Self { meshes: vec![mesh] }
    }
}

impl FromIterator<Mesh> for MultiMesh {
    fn from_iter<I: IntoIterator<Item = Mesh>>(iter: I) -> Self {
        Self {
            meshes: iter.into_iter().collect(),
        }
    }
}

impl Extend<Mesh> for MultiMesh {
    fn extend<I: IntoIterator<Item = Mesh>>(&mut self, iter: I) {
        self.meshes.extend(iter);
    }
}

impl IntoIterator for MultiMesh {
    type Item = Mesh;
    type IntoIter = std::vec::IntoIter<Mesh>;

    fn into_iter(self) -> Self::IntoIter {
        self.meshes.into_iter()
    }
}

impl<'m> IntoIterator for &'m MultiMesh {
    type Item = &'m Mesh;
    type IntoIter = std::slice::Iter<'m, Mesh>;

    fn into_iter(self) -> Self::IntoIter {
        self.meshes.iter()
    }
}

impl WriteChunks for MultiMesh {
    fn write_binary<S: ChunkSink>(&self, w: &mut ChunkWriter<S>) -> Result<()> {
        w.chunk("MLT", |w| {
            for mesh in &self.meshes {
                mesh.write_binary(w)?;
            }
            Ok(())
        })
    }
}
