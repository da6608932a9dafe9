//! Partitioning of meshes whose indices exceed a bound.

use std::collections::HashMap;

use crate::{Attribute, Error, IndexWidth, Mesh, MultiMesh, Result};

/// Largest number of vertices per submesh unless configured otherwise; fits a 16-bit index buffer
/// with room to spare.
pub const DEFAULT_MAX_VERTICES: usize = 65500;

/// Splits a [Mesh] into submeshes that each address fewer than `max_vertices` vertices.
///
/// Triangles are never divided between submeshes, so vertices shared by triangles that land in
/// different submeshes are duplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshSplitter {
    max_vertices: usize,
    index_width: IndexWidth,
}

impl Default for MeshSplitter {
    fn default() -> Self {
        Self {
            max_vertices: DEFAULT_MAX_VERTICES,
            index_width: IndexWidth::U16,
        }
    }
}

impl MeshSplitter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_max_vertices(self, max_vertices: usize) -> Self {
        Self {
            max_vertices,
            ..self
        }
    }

    /// Index width of the generated submeshes.
    #[inline]
    pub fn with_index_width(self, index_width: IndexWidth) -> Self {
        Self {
            index_width,
            ..self
        }
    }

    #[inline]
    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    #[inline]
    pub fn index_width(&self) -> IndexWidth {
        self.index_width
    }

    fn check_limit(&self) -> Result<()> {
        let fits_width = (self.max_vertices as u64) <= u64::from(self.index_width.max_index()) + 1;
        if self.max_vertices < 3 || !fits_width {
            return Err(Error::SplitLimit(self.max_vertices));
        }
        Ok(())
    }

    /// Split `mesh`.
    ///
    /// If every index of `mesh` is already below the limit, the result holds an unmodified copy
    /// of `mesh`. Otherwise submeshes are named `"<name>.<n>"`, counting from 0, and use
    /// [MeshSplitter::index_width].
    ///
    /// # Errors
    ///
    /// * [Error::SplitLimit] if the limit can't hold a triangle or can't be addressed at the
    ///   configured index width
    /// * any error from [Mesh::validate]
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(mesh = mesh.name(), max_vertices = self.max_vertices))
    )]
    pub fn split(&self, mesh: &Mesh) -> Result<MultiMesh> {
        self.check_limit()?;
        mesh.validate()?;

        if mesh.indices().iter().all(|&i| (i as usize) < self.max_vertices) {
            #[cfg(feature = "tracing")]
            tracing::debug!("mesh already within limit");
            return Ok(MultiMesh::from(mesh.clone()));
        }

        let mut out = MultiMesh::new();
        let mut part = Partition::default();
        let total = mesh.triangle_count();
        for (t, tri) in mesh.triangles().enumerate() {
            if part.len() + part.fresh_vertices(&tri) > self.max_vertices {
                out.push(part.finish(mesh, out.len(), self.index_width)?);
            }
            part.add(tri);
            if part.len() >= self.max_vertices || t + 1 == total {
                out.push(part.finish(mesh, out.len(), self.index_width)?);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            submeshes = out.len(),
            triangles = total,
            "split mesh"
        );
        Ok(out)
    }
}

/// The submesh currently being collected.
#[derive(Debug, Default)]
struct Partition {
    /// original vertex -> local vertex
    local: HashMap<u32, u32>,
    /// original vertex of each local vertex
    originals: Vec<u32>,
    indices: Vec<u32>,
}

impl Partition {
    #[inline]
    fn len(&self) -> usize {
        self.originals.len()
    }

    /// Number of distinct vertices of `tri` not yet in this partition.
    fn fresh_vertices(&self, tri: &[u32; 3]) -> usize {
        tri.iter()
            .enumerate()
            .filter(|&(i, v)| !self.local.contains_key(v) && !tri[..i].contains(v))
            .count()
    }

    fn add(&mut self, tri: [u32; 3]) {
        for v in tri {
            let next = self.originals.len() as u32;
            let local = *self.local.entry(v).or_insert_with(|| {
                self.originals.push(v);
                next
            });
            self.indices.push(local);
        }
    }

    /// Build a submesh from the collected triangles and reset.
    fn finish(&mut self, source: &Mesh, seq: usize, index_width: IndexWidth) -> Result<Mesh> {
        let mut mesh = Mesh::new(format!("{}.{}", source.name(), seq), index_width);
        for attr in source.attributes() {
            let mut copy = Attribute::copy_params(attr);
            copy.reserve(self.originals.len());
            for &v in &self.originals {
                copy.extend_from(attr, v as usize)?;
            }
            mesh.push_attribute(copy)?;
        }
        mesh.extend_indices(self.indices.drain(..));
        #[cfg(feature = "tracing")]
        tracing::trace!(
            submesh = mesh.name(),
            vertices = self.originals.len(),
            triangles = mesh.triangle_count(),
            "closed submesh"
        );
        self.local.clear();
        self.originals.clear();
        Ok(mesh)
    }
}
