#![allow(dead_code)]

use meshchunk::{attribute::names, AttributeShape, IndexWidth, Mesh};

/// A chunk read back out of an encoded stream.
#[derive(Debug)]
pub struct Chunk<'a> {
    pub tag: &'a str,
    pub len: u32,
    pub payload: &'a [u8],
}

/// Split `bytes` into its top-level chunks, asserting the layout along the way.
pub fn parse_chunks(mut bytes: &[u8]) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    while !bytes.is_empty() {
        let nul = bytes.iter().position(|&b| b == 0).expect("unterminated tag");
        let tag_len = (nul + 1 + 3) / 4 * 4;
        assert!(bytes[nul..tag_len].iter().all(|&b| b == 0), "tag padding");
        let tag = std::str::from_utf8(&bytes[..nul]).expect("tag is ascii");
        let len = u32::from_le_bytes(bytes[tag_len..tag_len + 4].try_into().unwrap());
        let start = tag_len + 4;
        let end = start + len as usize;
        out.push(Chunk {
            tag,
            len,
            payload: &bytes[start..end],
        });
        bytes = &bytes[end..];
    }
    out
}

/// Tags whose payload is a sequence of chunks.
pub fn is_container(tag: &str) -> bool {
    matches!(tag, "MLT" | "MSH" | "ATR")
}

/// Visit every chunk in `bytes`, depth-first.
pub fn visit_chunks<'a>(bytes: &'a [u8], f: &mut impl FnMut(&Chunk<'a>)) {
    for chunk in parse_chunks(bytes) {
        f(&chunk);
        if is_container(chunk.tag) {
            visit_chunks(chunk.payload, f);
        }
    }
}

/// Decode NUL-terminated text from a chunk payload.
pub fn text(payload: &[u8]) -> &str {
    let nul = payload.iter().position(|&b| b == 0).expect("unterminated text");
    std::str::from_utf8(&payload[..nul]).unwrap()
}

/// A mesh with a `"pos"` attribute holding `positions` and the given indices.
pub fn mesh_with_positions(
    name: &str,
    width: IndexWidth,
    positions: &[[f32; 3]],
    indices: &[u32],
) -> Mesh {
    let mut mesh = Mesh::new(name, width);
    let pos = mesh
        .add_attribute(names::POSITION, AttributeShape::FLOAT3)
        .unwrap();
    let attr = mesh.attribute_mut(pos).unwrap();
    for &p in positions {
        attr.push(p).unwrap();
    }
    mesh.extend_indices(indices.iter().copied());
    mesh
}

/// A fan of `n` triangles around vertex 0.
pub fn fan(n: u32) -> Mesh {
    let mut positions = vec![[0.0f32, 0.0, 0.0]];
    for i in 0..=n {
        let a = i as f32 * 0.5;
        positions.push([a.cos(), a.sin(), 0.0]);
    }
    let indices: Vec<u32> = (1..=n).flat_map(|i| [0, i, i + 1]).collect();
    mesh_with_positions("fan", IndexWidth::U32, &positions, &indices)
}
