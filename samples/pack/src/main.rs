use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use meshchunk::{de::obj, MeshSplitter, MultiMesh, WriteChunks};

mod cli;
use cli::*;

#[derive(Debug, thiserror::Error)]
enum PackError {
    #[error("{path:?}: {source}")]
    Mesh {
        path: PathBuf,
        #[source]
        source: meshchunk::Error,
    },
    #[error("writing {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: meshchunk::Error,
    },
}

fn pack(cli: &Cli) -> Result<MultiMesh, PackError> {
    let splitter = MeshSplitter::new()
        .with_max_vertices(cli.max_vertices)
        .with_index_width(cli.index_width);
    let mut out = MultiMesh::new();
    for path in &cli.files {
        let in_file = |source| PackError::Mesh {
            path: path.clone(),
            source,
        };
        for mut mesh in obj::load(path).map_err(in_file)? {
            if cli.normals {
                mesh.generate_normals().map_err(in_file)?;
            }
            let parts = splitter.split(&mesh).map_err(in_file)?;
            tracing::info!(
                mesh = mesh.name(),
                triangles = mesh.triangle_count(),
                submeshes = parts.len(),
                "packed mesh"
            );
            out.extend(parts);
        }
    }
    Ok(out)
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), PackError> {
    fs::write(path, bytes).map_err(|e| PackError::Write {
        path: path.to_owned(),
        source: e.into(),
    })
}

/// Encode `multi` fully before creating `out` (and `obj_out`), so a failed encode leaves no
/// partial files behind.
fn write_outputs(multi: &MultiMesh, out: &Path, obj_out: Option<&Path>) -> Result<(), PackError> {
    let failed = |path: &Path| {
        let path = path.to_owned();
        move |source| PackError::Write { path, source }
    };

    let binary = multi.to_binary().map_err(failed(out))?;
    let text = match obj_out {
        Some(obj_out) => {
            let mut text = Vec::new();
            multi.write_text(&mut text).map_err(failed(obj_out))?;
            Some((obj_out, text))
        }
        None => None,
    };

    write(out, &binary)?;
    tracing::info!(path = ?out, meshes = multi.len(), "wrote container");
    if let Some((obj_out, text)) = text {
        write(obj_out, &text)?;
        tracing::info!(path = ?obj_out, "wrote text export");
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), PackError> {
    let multi = pack(cli)?;
    write_outputs(&multi, &cli.out, cli.obj_out.as_deref())
}

pub fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_filter, cli.log_format);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
