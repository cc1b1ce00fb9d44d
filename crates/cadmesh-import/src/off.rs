//! Object File Format (OFF) decoding.
//!
//! ```text
//! OFF
//! nv nf ne
//! x y z            (nv lines)
//! n i0 .. in-1     (nf lines, optional trailing colour ignored)
//! ```
//!
//! The header keyword may carry prefixes (`COFF`, `NOFF`, ...) and the counts
//! may share its line. `#` starts a comment.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use cadmesh_math::Point3;
use tracing::debug;

use crate::error::{ImportError, Result};
use crate::scene::PolygonMesh;

/// Load the polyhedron stored in an OFF file.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_off<P: AsRef<Path>>(path: P) -> Result<PolygonMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ImportError::from_open(path, e))?;
    let mesh = read_off(BufReader::new(file))?;
    debug!(
        vertices = mesh.vertices.len(),
        faces = mesh.polygons.len(),
        "decoded OFF"
    );
    Ok(mesh)
}

/// Decode OFF from a buffered reader.
pub fn read_off<R: BufRead>(reader: R) -> Result<PolygonMesh> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let content = line.split('#').next().unwrap_or("").trim();
        if !content.is_empty() {
            lines.push(content.to_string());
        }
    }
    let mut lines = lines.iter().map(|l| l.split_whitespace().collect::<Vec<_>>());

    let mut first = lines
        .next()
        .ok_or_else(|| ImportError::invalid_content("empty OFF file"))?;
    if !first.first().is_some_and(|k| k.ends_with("OFF")) {
        return Err(ImportError::invalid_content("missing OFF header"));
    }
    first.remove(0);
    let counts = if first.is_empty() {
        lines
            .next()
            .ok_or_else(|| ImportError::invalid_content("missing OFF element counts"))?
    } else {
        first
    };
    if counts.len() < 2 {
        return Err(ImportError::invalid_content("OFF counts line needs vertex and face counts"));
    }
    let nv: usize = counts[0].parse()?;
    let nf: usize = counts[1].parse()?;

    let mut mesh = PolygonMesh::default();
    // declared counts are untrusted
    mesh.vertices.reserve(nv.min(lines.len()));
    for i in 0..nv {
        let tokens = lines.next().ok_or_else(|| {
            ImportError::invalid_content(format!("OFF ended after {i} of {nv} vertices"))
        })?;
        if tokens.len() < 3 {
            return Err(ImportError::invalid_content(format!(
                "OFF vertex {i} has fewer than 3 coordinates"
            )));
        }
        mesh.vertices
            .push(Point3::new(tokens[0].parse()?, tokens[1].parse()?, tokens[2].parse()?));
    }

    mesh.polygons.reserve(nf.min(lines.len()));
    for i in 0..nf {
        let tokens = lines.next().ok_or_else(|| {
            ImportError::invalid_content(format!("OFF ended after {i} of {nf} faces"))
        })?;
        let n: usize = tokens
            .first()
            .ok_or_else(|| ImportError::invalid_content(format!("OFF face {i} is empty")))?
            .parse()?;
        let corners = tokens.get(1..=n).ok_or_else(|| {
            ImportError::invalid_content(format!("OFF face {i} lists fewer than {n} indices"))
        })?;
        mesh.polygons.push(
            corners
                .iter()
                .map(|t| t.parse::<u32>())
                .collect::<std::result::Result<_, _>>()?,
        );
    }

    mesh.check_indices()?;
    Ok(mesh)
}
