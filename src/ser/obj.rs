//! Wavefront-style text output.
//!
//! Only `o`, `v`, and `f` lines are written. The presence of `"uv"` and `"normal"` attributes
//! changes the shape of each face line, but their values are not emitted; every slot of a face
//! corner uses the same (shared) index. Indices are 1-based, as OBJ readers expect.

use std::io::Write;

use nalgebra::Vector3;

use crate::{attribute::names, Mesh, MultiMesh, Result};

/// Shape of the corners of each `f` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceShape {
    /// `f 1 2 3`
    Position,
    /// `f 1/1 2/2 3/3`
    Texcoord,
    /// `f 1//1 2//2 3//3`
    Normal,
    /// `f 1/1/1 2/2/2 3/3/3`
    TexcoordNormal,
}

impl FaceShape {
    pub fn of(mesh: &Mesh) -> Self {
        let uv = mesh.find_attribute(names::TEXCOORD).is_some();
        let normal = mesh.find_attribute(names::NORMAL).is_some();
        match (uv, normal) {
            (false, false) => FaceShape::Position,
            (true, false) => FaceShape::Texcoord,
            (false, true) => FaceShape::Normal,
            (true, true) => FaceShape::TexcoordNormal,
        }
    }

    fn write_corner<W: Write>(self, out: &mut W, i: u64) -> std::io::Result<()> {
        match self {
            FaceShape::Position => write!(out, " {i}"),
            FaceShape::Texcoord => write!(out, " {i}/{i}"),
            FaceShape::Normal => write!(out, " {i}//{i}"),
            FaceShape::TexcoordNormal => write!(out, " {i}/{i}/{i}"),
        }
    }
}

/// A mesh which has been checked for export.
struct Object<'m> {
    mesh: &'m Mesh,
    positions: Vec<Vector3<f32>>,
    face: FaceShape,
}

impl<'m> Object<'m> {
    fn new(mesh: &'m Mesh) -> Result<Self> {
        let positions = mesh.positions()?.iter()?.collect();
        mesh.validate()?;
        Ok(Self {
            mesh,
            positions,
            face: FaceShape::of(mesh),
        })
    }

    /// Write `self`, offsetting indices by `base`; returns the number of vertices written.
    fn write<W: Write>(&self, out: &mut W, base: u64) -> Result<u64> {
        writeln!(out, "o {}", self.mesh.name())?;
        for v in &self.positions {
            writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
        }
        for tri in self.mesh.triangles() {
            out.write_all(b"f")?;
            for i in tri {
                self.face.write_corner(out, base + u64::from(i) + 1)?;
            }
            writeln!(out)?;
        }
        Ok(self.positions.len() as u64)
    }
}

/// Write `mesh` as a single object.
///
/// # Errors
///
/// * [Error::MissingAttribute](crate::Error::MissingAttribute) if there is no `"pos"` attribute
/// * [Error::ShapeMismatch](crate::Error::ShapeMismatch) if `"pos"` is not `vec3<f32>`
/// * any error from [Mesh::validate]
///
/// Nothing is written when any of the above fail.
pub fn write_mesh<W: Write>(mesh: &Mesh, out: &mut W) -> Result<()> {
    Object::new(mesh)?.write(out, 0).map(|_| ())
}

/// Write each submesh of `multi` as its own object.
///
/// Every submesh is checked before anything is written.
pub fn write_multi<W: Write>(multi: &MultiMesh, out: &mut W) -> Result<()> {
    let objects = multi.iter().map(Object::new).collect::<Result<Vec<_>>>()?;
    let mut base = 0;
    for obj in &objects {
        base += obj.write(out, base)?;
    }
    Ok(())
}

impl Mesh {
    /// See [write_mesh].
    #[inline]
    pub fn write_text<W: Write>(&self, out: &mut W) -> Result<()> {
        write_mesh(self, out)
    }
}

impl MultiMesh {
    /// See [write_multi].
    #[inline]
    pub fn write_text<W: Write>(&self, out: &mut W) -> Result<()> {
        write_multi(self, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttributeShape, Error, IndexWidth};

    fn triangle(name: &str) -> Mesh {
        let mut mesh = Mesh::new(name, IndexWidth::U32);
        let pos = mesh.add_attribute(names::POSITION, AttributeShape::FLOAT3).unwrap();
        let attr = mesh.attribute_mut(pos).unwrap();
        attr.push([0.0f32, 0.0, 0.0]).unwrap();
        attr.push([1.5f32, 0.0, 0.0]).unwrap();
        attr.push([0.0f32, -2.0, 0.25]).unwrap();
        mesh.extend_indices([0, 1, 2]);
        mesh
    }

    fn text(mesh: &Mesh) -> String {
        let mut out = Vec::new();
        mesh.write_text(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn positions_only() {
        assert_eq!(
            text(&triangle("tri")),
            "o tri\nv 0 0 0\nv 1.5 0 0\nv 0 -2 0.25\nf 1 2 3\n"
        );
    }

    #[test]
    fn face_shape_follows_attributes() {
        let mut mesh = triangle("tri");
        let uv = mesh.add_attribute(names::TEXCOORD, AttributeShape::FLOAT2).unwrap();
        for _ in 0..3 {
            mesh.attribute_mut(uv).unwrap().push([0.0f32, 0.0]).unwrap();
        }
        assert!(text(&mesh).ends_with("f 1/1 2/2 3/3\n"));
        mesh.generate_normals().unwrap();
        assert!(text(&mesh).ends_with("f 1/1/1 2/2/2 3/3/3\n"));

        let mut mesh = triangle("tri");
        mesh.generate_normals().unwrap();
        assert!(text(&mesh).ends_with("f 1//1 2//2 3//3\n"));
    }

    #[test]
    fn nothing_written_on_failure() {
        let mut out = Vec::new();
        let mesh = Mesh::new("empty", IndexWidth::U16);
        assert!(matches!(
            mesh.write_text(&mut out),
            Err(Error::MissingAttribute { .. })
        ));
        let mut mesh = Mesh::new("flat", IndexWidth::U16);
        mesh.add_attribute(names::POSITION, AttributeShape::FLOAT2).unwrap();
        assert!(matches!(
            mesh.write_text(&mut out),
            Err(Error::ShapeMismatch { .. })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn multi_offsets_indices() {
        let multi: MultiMesh = [triangle("a"), triangle("b")].into_iter().collect();
        let mut out = Vec::new();
        multi.write_text(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let faces: Vec<_> = out.lines().filter(|l| l.starts_with("f ")).collect();
        assert_eq!(faces, ["f 1 2 3", "f 4 5 6"]);
    }
}
