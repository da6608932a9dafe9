//! Triangle lists and the operations over them.

use nalgebra::Vector3;

use crate::{
    attribute::{names, Attribute, AttributeShape},
    ser::chunk::{ChunkSink, ChunkWriter, WriteChunks},
    Error, Result,
};

/// Accumulated normals shorter than this (squared) fall back to [FALLBACK_NORMAL].
pub const MIN_NORMAL_LENGTH_SQUARED: f32 = 1.0e-6;

/// Normal given to vertices which no triangle meaningfully contributes to.
pub const FALLBACK_NORMAL: Vector3<f32> = Vector3::new(1.0, 0.0, 0.0);

/// Width of each entry in a [Mesh]'s encoded index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexWidth {
    U16,
    #[default]
    U32,
}

impl IndexWidth {
    /// Bytes per index.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            IndexWidth::U16 => 2,
            IndexWidth::U32 => 4,
        }
    }

    /// The largest index representable at this width.
    #[inline]
    pub const fn max_index(self) -> u32 {
        match self {
            IndexWidth::U16 => u16::MAX as u32,
            IndexWidth::U32 => u32::MAX,
        }
    }

    /// Tag of the index chunk at this width.
    #[inline]
    pub const fn tag(self) -> &'static str {
        match self {
            IndexWidth::U16 => "ix2",
            IndexWidth::U32 => "ix4",
        }
    }
}

/// A triangle list: a set of uniquely-named [Attributes](Attribute) addressed by one shared
/// index buffer.
///
/// Every attribute that the index buffer addresses is expected to hold the same number of
/// vertices; this is checked by [Mesh::validate], which every consuming operation runs first.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    name: String,
    attributes: Vec<Attribute>,
    index_width: IndexWidth,
    indices: Vec<u32>,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new("mesh", IndexWidth::default())
    }
}

impl Mesh {
    pub fn new(name: impl Into<String>, index_width: IndexWidth) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            index_width,
            indices: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn index_width(&self) -> IndexWidth {
        self.index_width
    }

    /// Add an empty attribute, returning its position.
    ///
    /// # Errors
    ///
    /// * [Error::DuplicateAttribute] if an attribute with the same name exists
    pub fn add_attribute(&mut self, name: impl Into<String>, shape: AttributeShape) -> Result<usize> {
        self.push_attribute(Attribute::new(name, shape))
    }

    /// Add an existing attribute, returning its position.
    ///
    /// # Errors
    ///
    /// * [Error::DuplicateAttribute] if an attribute with the same name exists
    pub fn push_attribute(&mut self, attribute: Attribute) -> Result<usize> {
        if self.find_attribute(attribute.name()).is_some() {
            return Err(Error::DuplicateAttribute(attribute.name().to_owned()));
        }
        self.attributes.push(attribute);
        Ok(self.attributes.len() - 1)
    }

    /// The position of the attribute named `name`.
    pub fn find_attribute(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name() == name)
    }

    #[inline]
    pub fn attribute(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    #[inline]
    pub fn attribute_mut(&mut self, index: usize) -> Option<&mut Attribute> {
        self.attributes.get_mut(index)
    }

    pub fn attribute_by_name(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    #[inline]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Number of vertices in the first attribute, or 0 if there are none.
    pub fn vertex_count(&self) -> usize {
        self.attributes.first().map_or(0, Attribute::len)
    }

    #[inline]
    pub fn push_index(&mut self, index: u32) {
        self.indices.push(index);
    }

    pub fn extend_indices(&mut self, indices: impl IntoIterator<Item = u32>) {
        self.indices.extend(indices);
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate through every complete triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Check that the index buffer is a whole number of triangles and that every index addresses
    /// a vertex of every attribute.
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(Error::PartialTriangle(self.indices.len()));
        }
        let Some(&max) = self.indices.iter().max() else {
            return Ok(());
        };
        for attr in &self.attributes {
            if max as usize >= attr.len() {
                return Err(Error::IndexOutOfRange {
                    index: max,
                    attribute: attr.name().to_owned(),
                    count: attr.len(),
                });
            }
        }
        Ok(())
    }

    /// The `"pos"` attribute, which must be `vec3<f32>`.
    pub(crate) fn positions(&self) -> Result<&Attribute> {
        let pos = self
            .attribute_by_name(names::POSITION)
            .ok_or_else(|| Error::MissingAttribute {
                mesh: self.name.clone(),
                name: names::POSITION.to_owned(),
            })?;
        if !pos.shape().same_layout(&AttributeShape::FLOAT3) {
            return Err(Error::ShapeMismatch {
                name: pos.name().to_owned(),
                expected: AttributeShape::FLOAT3,
                found: pos.shape(),
            });
        }
        Ok(pos)
    }

    /// Add a `"normal"` attribute computed from `"pos"` and the index buffer.
    ///
    /// Each triangle adds its unnormalized face normal (so larger triangles weigh more) to each
    /// of its corners. Vertices whose sum is (nearly) zero get [FALLBACK_NORMAL].
    ///
    /// Does nothing if `"normal"` already exists.
    ///
    /// # Errors
    ///
    /// * [Error::MissingAttribute] if there is no `"pos"` attribute
    /// * [Error::ShapeMismatch] if `"pos"` is not `vec3<f32>`
    /// * any error from [Mesh::validate]
    pub fn generate_normals(&mut self) -> Result<()> {
        if self.find_attribute(names::NORMAL).is_some() {
            return Ok(());
        }
        let positions: Vec<Vector3<f32>> = self.positions()?.iter()?.collect();
        self.validate()?;

        let mut sums = vec![Vector3::<f32>::zeros(); positions.len()];
        for [a, b, c] in self.triangles() {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let face = (positions[b] - positions[a]).cross(&(positions[c] - positions[a]));
            sums[a] += face;
            sums[b] += face;
            sums[c] += face;
        }

        let mut normal = Attribute::new(names::NORMAL, AttributeShape::FLOAT3);
        normal.reserve(sums.len());
        for sum in sums {
            let n = if sum.norm_squared() >= MIN_NORMAL_LENGTH_SQUARED {
                sum.normalize()
            } else {
                FALLBACK_NORMAL
            };
            normal.push(n)?;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(mesh = self.name.as_str(), vertices = normal.len(), "generated normals");
        self.attributes.push(normal);
        Ok(())
    }

    fn write_indices<S: ChunkSink>(&self, w: &mut ChunkWriter<S>) -> Result<()> {
        match self.index_width {
            IndexWidth::U16 => {
                for &index in &self.indices {
                    let narrow = u16::try_from(index).map_err(|_| Error::IndexWidthOverflow {
                        index,
                        width: IndexWidth::U16.size(),
                    })?;
                    w.write_u16le(narrow)?;
                }
            }
            IndexWidth::U32 => {
                for &index in &self.indices {
                    w.write_u32le(index)?;
                }
            }
        }
        Ok(())
    }
}

impl WriteChunks for Mesh {
    fn write_binary<S: ChunkSink>(&self, w: &mut ChunkWriter<S>) -> Result<()> {
        self.validate()?;
        w.chunk("MSH", |w| {
            w.chunk("msh", |w| w.write_text(&self.name))?;
            for attr in &self.attributes {
                attr.write_binary(w)?;
            }
            w.chunk(self.index_width.tag(), |w| self.write_indices(w))
        })
    }
}
