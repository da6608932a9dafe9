mod common;

use common::{mesh_with_positions, parse_chunks, text, visit_chunks};
use meshchunk::{
    AttributeComponent, AttributeShape, AttributeType, IndexWidth, Mesh, MultiMesh, WriteChunks,
};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

#[test]
fn mesh_layout_with_narrow_indices() {
    let mesh = mesh_with_positions("tri", IndexWidth::U16, &TRIANGLE, &[0, 1, 2]);
    let bytes = mesh.to_binary().unwrap();

    let top = parse_chunks(&bytes);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].tag, "MSH");

    let parts = parse_chunks(top[0].payload);
    let tags: Vec<_> = parts.iter().map(|c| c.tag).collect();
    assert_eq!(tags, ["msh", "ATR", "ix2"]);
    assert_eq!(text(parts[0].payload), "tri");

    let attr = parse_chunks(parts[1].payload);
    assert_eq!(attr[0].tag, "atn");
    assert_eq!(text(attr[0].payload), "pos");
    assert_eq!(attr[1].tag, "a3f");
    assert_eq!(attr[1].len, 36);
    let floats: Vec<f32> = attr[1]
        .payload
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes(b.try_into().unwrap()))
        .collect();
    assert_eq!(floats, TRIANGLE.concat());

    // 3 u16 indices, padded to 8 bytes
    assert_eq!(parts[2].len, 8);
    assert_eq!(parts[2].payload, [0u8, 0, 1, 0, 2, 0, 0, 0]);
}

#[test]
fn mesh_layout_with_wide_indices() {
    let mesh = mesh_with_positions("tri", IndexWidth::U32, &TRIANGLE, &[2, 1, 0]);
    let bytes = mesh.to_binary().unwrap();
    let top = parse_chunks(&bytes);
    let parts = parse_chunks(top[0].payload);
    assert_eq!(parts[2].tag, "ix4");
    assert_eq!(parts[2].payload, [2u8, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn attributes_encode_their_declared_shape() {
    let mut mesh = mesh_with_positions("tri", IndexWidth::U16, &TRIANGLE, &[0, 1, 2]);
    let color = mesh
        .add_attribute(
            "color",
            AttributeShape::new(AttributeType::Vec4, AttributeComponent::U8).normalized(),
        )
        .unwrap();
    for c in [[255u8, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]] {
        mesh.attribute_mut(color).unwrap().push(c).unwrap();
    }
    let bytes = mesh.to_binary().unwrap();
    let top = parse_chunks(&bytes);
    let parts = parse_chunks(top[0].payload);
    let tags: Vec<_> = parts.iter().map(|c| c.tag).collect();
    assert_eq!(tags, ["msh", "ATR", "ATR", "ix2"]);
    let color = parse_chunks(parts[2].payload);
    assert_eq!(text(color[0].payload), "color");
    assert_eq!(color[1].tag, "a4B");
    assert_eq!(color[1].len, 12);
}

#[test]
fn multi_mesh_wraps_each_mesh() {
    let multi: MultiMesh = ["a", "b", "c"]
        .into_iter()
        .map(|name| mesh_with_positions(name, IndexWidth::U16, &TRIANGLE, &[0, 1, 2]))
        .collect();
    let bytes = multi.to_binary().unwrap();
    let top = parse_chunks(&bytes);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].tag, "MLT");
    let meshes = parse_chunks(top[0].payload);
    assert_eq!(meshes.len(), 3);
    for (chunk, name) in meshes.iter().zip(["a", "b", "c"]) {
        assert_eq!(chunk.tag, "MSH");
        assert_eq!(text(parse_chunks(chunk.payload)[0].payload), name);
    }
}

#[test]
fn empty_mesh_still_encodes() {
    let bytes = Mesh::default().to_binary().unwrap();
    let top = parse_chunks(&bytes);
    let parts = parse_chunks(top[0].payload);
    let tags: Vec<_> = parts.iter().map(|c| c.tag).collect();
    assert_eq!(tags, ["msh", "ix4"]);
    assert_eq!(parts[1].len, 0);
}

#[test]
fn invalid_mesh_is_not_encoded() {
    let mesh = mesh_with_positions("tri", IndexWidth::U16, &TRIANGLE, &[0, 1, 3]);
    assert!(matches!(
        mesh.to_binary(),
        Err(meshchunk::Error::IndexOutOfRange { index: 3, .. })
    ));
}

#[quickcheck]
fn counted_length_matches_and_chunks_align(
    name: String,
    positions: Vec<(f32, f32, f32)>,
    indices: Vec<u32>,
    wide: bool,
) -> TestResult {
    if positions.is_empty() {
        return TestResult::discard();
    }
    let name = name.replace('\0', "");
    let positions: Vec<[f32; 3]> = positions.into_iter().map(|(x, y, z)| [x, y, z]).collect();
    let n = positions.len() as u32;
    let whole = indices.len() - indices.len() % 3;
    let indices: Vec<u32> = indices[..whole].iter().map(|i| i % n).collect();
    let width = if wide { IndexWidth::U32 } else { IndexWidth::U16 };
    let mesh = mesh_with_positions(&name, width, &positions, &indices);

    let counted = mesh.binary_len().unwrap();
    let bytes = mesh.to_binary().unwrap();
    if counted != bytes.len() || bytes.len() % 4 != 0 {
        return TestResult::failed();
    }
    let mut aligned = true;
    visit_chunks(&bytes, &mut |chunk| aligned &= chunk.len % 4 == 0);
    TestResult::from_bool(aligned)
}
