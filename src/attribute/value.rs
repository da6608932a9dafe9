//! Rust types which can be stored in an [Attribute](super::Attribute).

use nalgebra::{Point, SVector};

use super::{AttributeComponent, AttributeShape, AttributeType};

/// Scalar types usable as the components of a [VertexValue].
pub trait Component: nalgebra::Scalar + Copy {
    const COMPONENT: AttributeComponent;
    /// Append `self` to `out`, little-endian.
    fn put_le(self, out: &mut Vec<u8>);
    /// Read a value from the start of `bytes`.
    ///
    /// # Panics
    ///
    /// * `bytes.len() < Self::COMPONENT.size()`
    fn take_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_component {
    ($($T:ty: $c:ident),+ $(,)?) => {
        $(
            static_assertions::const_assert_eq!(std::mem::size_of::<$T>(), AttributeComponent::$c.size());
            impl Component for $T {
                const COMPONENT: AttributeComponent = AttributeComponent::$c;
                #[inline]
                fn put_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
                #[inline]
                fn take_le(bytes: &[u8]) -> Self {
                    const SIZE: usize = std::mem::size_of::<$T>();
                    let mut raw = [0u8; SIZE];
                    raw.copy_from_slice(&bytes[..SIZE]);
                    <$T>::from_le_bytes(raw)
                }
            }
        )+
    };
}

impl_component!(u8: U8, u16: U16, u32: U32, i8: I8, i16: I16, f32: F32);

/// The value of one vertex within an attribute.
pub trait VertexValue: Sized {
    type Component: Component;
    const TYPE: AttributeType;

    /// The [AttributeShape] described by this type.
    #[inline]
    fn shape(normalized: bool) -> AttributeShape {
        AttributeShape {
            ty: Self::TYPE,
            comp: <Self::Component as Component>::COMPONENT,
            normalized,
        }
    }

    fn write_le(&self, out: &mut Vec<u8>);

    /// # Panics
    ///
    /// * `bytes` is shorter than `Self::shape(_).size_bytes()`
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar_value {
    ($($T:ty),+) => {
        $(
            impl VertexValue for $T {
                type Component = $T;
                const TYPE: AttributeType = AttributeType::Scalar;
                #[inline]
                fn write_le(&self, out: &mut Vec<u8>) {
                    self.put_le(out);
                }
                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    <$T as Component>::take_le(bytes)
                }
            }
        )+
    };
}

impl_scalar_value!(u8, u16, u32, i8, i16, f32);

macro_rules! impl_vector_value {
    ($($t:ident: $n:literal),+) => {
        $(
            impl<C: Component> VertexValue for [C; $n] {
                type Component = C;
                const TYPE: AttributeType = AttributeType::$t;
                #[inline]
                fn write_le(&self, out: &mut Vec<u8>) {
                    for c in self {
                        c.put_le(out);
                    }
                }
                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let size = C::COMPONENT.size();
                    std::array::from_fn(|i| C::take_le(&bytes[i * size..]))
                }
            }

            impl<C: Component> VertexValue for SVector<C, $n> {
                type Component = C;
                const TYPE: AttributeType = AttributeType::$t;
                #[inline]
                fn write_le(&self, out: &mut Vec<u8>) {
                    for c in self.iter() {
                        c.put_le(out);
                    }
                }
                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    Self::from(<[C; $n] as VertexValue>::read_le(bytes))
                }
            }

            impl<C: Component> VertexValue for Point<C, $n> {
                type Component = C;
                const TYPE: AttributeType = AttributeType::$t;
                #[inline]
                fn write_le(&self, out: &mut Vec<u8>) {
                    self.coords.write_le(out);
                }
                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    Self::from(<[C; $n] as VertexValue>::read_le(bytes))
                }
            }
        )+
    };
}

impl_vector_value!(Scalar: 1, Vec2: 2, Vec3: 3, Vec4: 4);
