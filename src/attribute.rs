//! Named per-vertex data channels.

use std::fmt;

use crate::{
    ser::chunk::{ChunkSink, ChunkWriter, WriteChunks},
    Error, Result,
};

mod value;
pub use value::*;

/// Conventional attribute names.
pub mod names {
    pub const POSITION: &str = "pos";
    pub const NORMAL: &str = "normal";
    pub const TEXCOORD: &str = "uv";
}

/// The inner components of an [AttributeShape]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeComponent {
    U8,
    U16,
    U32,
    I8,
    I16,
    F32,
}

impl AttributeComponent {
    pub const fn size(self) -> usize {
        use std::mem::size_of;
        match self {
            AttributeComponent::U8 => size_of::<u8>(),
            AttributeComponent::U16 => size_of::<u16>(),
            AttributeComponent::U32 => size_of::<u32>(),
            AttributeComponent::I8 => size_of::<i8>(),
            AttributeComponent::I16 => size_of::<i16>(),
            AttributeComponent::F32 => size_of::<f32>(),
        }
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, AttributeComponent::F32)
    }

    #[inline]
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            AttributeComponent::U8 | AttributeComponent::U16 | AttributeComponent::U32
        )
    }

    /// Character identifying this component within a value chunk tag.
    pub const fn tag_code(self) -> char {
        match self {
            AttributeComponent::U8 => 'B',
            AttributeComponent::U16 => 'H',
            AttributeComponent::U32 => 'I',
            AttributeComponent::I8 => 'b',
            AttributeComponent::I16 => 'h',
            AttributeComponent::F32 => 'f',
        }
    }

    const fn rust_name(self) -> &'static str {
        match self {
            AttributeComponent::U8 => "u8",
            AttributeComponent::U16 => "u16",
            AttributeComponent::U32 => "u32",
            AttributeComponent::I8 => "i8",
            AttributeComponent::I16 => "i16",
            AttributeComponent::F32 => "f32",
        }
    }
}

/// The number of components in one vertex of an [Attribute].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
}

impl AttributeType {
    pub const fn size_elements(self) -> usize {
        match self {
            AttributeType::Scalar => 1,
            AttributeType::Vec2 => 2,
            AttributeType::Vec3 => 3,
            AttributeType::Vec4 => 4,
        }
    }

    pub const fn size_bytes(self, comp: AttributeComponent) -> usize {
        comp.size() * self.size_elements()
    }

    /// The type with `n` components, if there is one.
    pub const fn from_elements(n: usize) -> Option<Self> {
        match n {
            1 => Some(AttributeType::Scalar),
            2 => Some(AttributeType::Vec2),
            3 => Some(AttributeType::Vec3),
            4 => Some(AttributeType::Vec4),
            _ => None,
        }
    }
}

/// Declared layout of each vertex in an [Attribute].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeShape {
    pub ty: AttributeType,
    pub comp: AttributeComponent,
    /// Whether integer components are meant to be read as fractions of their range.
    pub normalized: bool,
}

impl AttributeShape {
    pub const FLOAT: Self = Self::new(AttributeType::Scalar, AttributeComponent::F32);
    pub const FLOAT2: Self = Self::new(AttributeType::Vec2, AttributeComponent::F32);
    pub const FLOAT3: Self = Self::new(AttributeType::Vec3, AttributeComponent::F32);
    pub const FLOAT4: Self = Self::new(AttributeType::Vec4, AttributeComponent::F32);

    #[inline]
    pub const fn new(ty: AttributeType, comp: AttributeComponent) -> Self {
        Self {
            ty,
            comp,
            normalized: false,
        }
    }

    #[inline]
    pub const fn normalized(self) -> Self {
        Self {
            normalized: true,
            ..self
        }
    }

    #[inline]
    pub const fn component_count(&self) -> usize {
        self.ty.size_elements()
    }

    /// Bytes per vertex.
    #[inline]
    pub const fn size_bytes(&self) -> usize {
        self.ty.size_bytes(self.comp)
    }

    #[inline]
    pub const fn is_float(&self) -> bool {
        self.comp.is_float()
    }

    #[inline]
    pub const fn is_unsigned(&self) -> bool {
        self.comp.is_unsigned()
    }

    /// Tag of the chunk holding values of this shape, e.g. `a3f`.
    pub fn value_tag(&self) -> String {
        format!("a{}{}", self.component_count(), self.comp.tag_code())
    }

    /// Whether the layout (ignoring `normalized`) matches `other`.
    #[inline]
    pub fn same_layout(&self, other: &Self) -> bool {
        self.ty == other.ty && self.comp == other.comp
    }
}

impl fmt::Display for AttributeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            AttributeType::Scalar => f.write_str(self.comp.rust_name())?,
            _ => write!(f, "vec{}<{}>", self.component_count(), self.comp.rust_name())?,
        }
        if self.normalized {
            f.write_str(" normalized")?;
        }
        Ok(())
    }
}

/// A named channel holding one value per vertex.
///
/// Values are stored little-endian, `shape.size_bytes()` bytes per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: String,
    shape: AttributeShape,
    data: Vec<u8>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, shape: AttributeShape) -> Self {
        Self {
            name: name.into(),
            shape,
            data: Vec::new(),
        }
    }

    /// A new, empty attribute with the same name and shape as `other`.
    pub fn copy_params(other: &Attribute) -> Self {
        Self::new(other.name.clone(), other.shape)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn shape(&self) -> AttributeShape {
        self.shape
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.shape.size_bytes()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Encoded bytes of one vertex.
    pub fn vertex_bytes(&self, vertex: usize) -> Option<&[u8]> {
        let stride = self.shape.size_bytes();
        let start = vertex.checked_mul(stride)?;
        let end = start.checked_add(stride)?;
        self.data.get(start..end)
    }

    pub fn reserve(&mut self, vertices: usize) {
        self.data.reserve(vertices * self.shape.size_bytes());
    }

    fn check_shape<V: VertexValue>(&self) -> Result<()> {
        let found = V::shape(self.shape.normalized);
        if !self.shape.same_layout(&found) {
            return Err(Error::ShapeMismatch {
                name: self.name.clone(),
                expected: self.shape,
                found,
            });
        }
        Ok(())
    }

    /// Append the value of the next vertex.
    ///
    /// # Errors
    ///
    /// * [Error::ShapeMismatch] if `V` does not have the declared shape of `self`
    pub fn push<V: VertexValue>(&mut self, value: V) -> Result<()> {
        self.check_shape::<V>()?;
        value.write_le(&mut self.data);
        Ok(())
    }

    /// Read the value of a vertex.
    ///
    /// # Errors
    ///
    /// * [Error::ShapeMismatch] if `V` does not have the declared shape of `self`
    /// * [Error::IndexOutOfRange] if `vertex` ∉ 0..`self.len()`
    pub fn get<V: VertexValue>(&self, vertex: usize) -> Result<V> {
        self.check_shape::<V>()?;
        let bytes = self.vertex_bytes(vertex).ok_or_else(|| Error::IndexOutOfRange {
            index: u32::try_from(vertex).unwrap_or(u32::MAX),
            attribute: self.name.clone(),
            count: self.len(),
        })?;
        Ok(V::read_le(bytes))
    }

    /// Iterate through every value, in vertex order.
    pub fn iter<'a, V: VertexValue + 'a>(&'a self) -> Result<impl Iterator<Item = V> + 'a> {
        self.check_shape::<V>()?;
        Ok(self
            .data
            .chunks_exact(self.shape.size_bytes())
            .map(V::read_le))
    }

    /// Append a copy of vertex `vertex` of `other`.
    ///
    /// # Errors
    ///
    /// * [Error::ShapeMismatch] if `other` has a different layout
    /// * [Error::IndexOutOfRange] if `vertex` ∉ 0..`other.len()`
    pub fn extend_from(&mut self, other: &Attribute, vertex: usize) -> Result<()> {
        if !self.shape.same_layout(&other.shape) {
            return Err(Error::ShapeMismatch {
                name: other.name.clone(),
                expected: self.shape,
                found: other.shape,
            });
        }
        let bytes = other
            .vertex_bytes(vertex)
            .ok_or_else(|| Error::IndexOutOfRange {
                index: u32::try_from(vertex).unwrap_or(u32::MAX),
                attribute: other.name.clone(),
                count: other.len(),
            })?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }
}

impl WriteChunks for Attribute {
    fn write_binary<S: ChunkSink>(&self, w: &mut ChunkWriter<S>) -> Result<()> {
        w.chunk("ATR", |w| {
            w.chunk("atn", |w| w.write_text(&self.name))?;
            w.chunk(&self.shape.value_tag(), |w| w.write_bytes(&self.data))
        })
    }
}
