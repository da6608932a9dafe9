#![cfg(feature = "de_obj")]

use meshchunk::{attribute::names, de::obj, AttributeShape, IndexWidth, WriteChunks};

const QUAD: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/quad.obj");

#[test]
fn quad_imports_as_two_triangles() {
    let meshes = obj::load(QUAD).unwrap();
    assert_eq!(meshes.len(), 1);
    let mesh = &meshes[0];

    assert_eq!(mesh.name(), "quad");
    assert_eq!(mesh.index_width(), IndexWidth::U32);
    assert_eq!(mesh.triangle_count(), 2);
    assert_eq!(mesh.vertex_count(), 4);

    let attrs: Vec<_> = mesh.attributes().iter().map(|a| a.name()).collect();
    assert_eq!(attrs, [names::POSITION, names::NORMAL, names::TEXCOORD]);
    assert_eq!(
        mesh.attribute_by_name(names::TEXCOORD).unwrap().shape(),
        AttributeShape::FLOAT2
    );

    let normals: Vec<[f32; 3]> = mesh
        .attribute_by_name(names::NORMAL)
        .unwrap()
        .iter()
        .unwrap()
        .collect();
    assert!(normals.iter().all(|&n| n == [0.0, 0.0, 1.0]));
}

#[test]
fn imported_mesh_encodes() {
    let meshes = obj::load(QUAD).unwrap();
    let bytes = meshes[0].to_binary().unwrap();
    assert_eq!(bytes.len(), meshes[0].binary_len().unwrap());
    assert_eq!(&bytes[..4], b"MSH\0");
}

#[test]
fn missing_file_is_an_import_error() {
    let missing = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/missing.obj");
    assert!(matches!(
        obj::load(missing),
        Err(meshchunk::Error::Import(_))
    ));
}
