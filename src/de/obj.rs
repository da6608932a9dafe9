//! Loading [Meshes](Mesh) from Wavefront OBJ files.

use std::path::Path;

use crate::{attribute::names, Attribute, AttributeShape, IndexWidth, Mesh, Result};

/// Load every model in the OBJ file at `path`.
///
/// Faces are triangulated and each model is re-indexed so that one index addresses its
/// position, normal, and texcoord.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, fields(path = ?path.as_ref()))
)]
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Mesh>> {
    let (models, _materials) = tobj::load_obj(path.as_ref(), &tobj::GPU_LOAD_OPTIONS)?;
    #[cfg(feature = "tracing")]
    tracing::debug!(models = models.len(), "loaded obj");
    from_models(&models)
}

/// Convert models loaded with [tobj::GPU_LOAD_OPTIONS] (or equivalent) into meshes.
pub fn from_models(models: &[tobj::Model]) -> Result<Vec<Mesh>> {
    models.iter().map(from_model).collect()
}

fn from_model(model: &tobj::Model) -> Result<Mesh> {
    let src = &model.mesh;
    let mut mesh = Mesh::new(model.name.clone(), IndexWidth::U32);

    let mut pos = Attribute::new(names::POSITION, AttributeShape::FLOAT3);
    pos.reserve(src.positions.len() / 3);
    for p in src.positions.chunks_exact(3) {
        pos.push([p[0], p[1], p[2]])?;
    }
    mesh.push_attribute(pos)?;

    if !src.normals.is_empty() {
        let mut normal = Attribute::new(names::NORMAL, AttributeShape::FLOAT3);
        for n in src.normals.chunks_exact(3) {
            normal.push([n[0], n[1], n[2]])?;
        }
        mesh.push_attribute(normal)?;
    }

    if !src.texcoords.is_empty() {
        let mut uv = Attribute::new(names::TEXCOORD, AttributeShape::FLOAT2);
        for t in src.texcoords.chunks_exact(2) {
            uv.push([t[0], t[1]])?;
        }
        mesh.push_attribute(uv)?;
    }

    mesh.extend_indices(src.indices.iter().copied());
    mesh.validate()?;
    Ok(mesh)
}
