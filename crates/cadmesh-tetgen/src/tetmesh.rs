//! TetGen `.node` / `.ele` tetrahedral mesh loading.
//!
//! ```text
//! .node:  <#points> <dim=3> <#attributes> <boundary marker 0|1>
//!         <index> <x> <y> <z> [attributes] [marker]
//! .ele:   <#tetrahedra> <corners 4|10> <#attributes>
//!         <index> <c1> ... <cN> [attributes]
//! ```
//!
//! `#` starts a comment. Numbering may start at 0 or 1; the `.node` file's
//! first index decides, and corner indices are shifted to 0-based.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MesherError, MesherResult};
use crate::io::TetgenIo;

/// Strip a `.node`, `.ele` or `.tet` extension to get the file prefix.
pub fn tetmesh_prefix(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ["node", "ele", "tet"].contains(&ext.to_ascii_lowercase().as_str()) => {
            path.with_extension("")
        }
        _ => path.to_path_buf(),
    }
}

fn with_suffix(prefix: &Path, ext: &str) -> PathBuf {
    let mut s = prefix.as_os_str().to_owned();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

/// Read the non-comment, non-empty lines of a file as token lists.
fn read_records(path: &Path) -> MesherResult<Vec<Vec<String>>> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MesherError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            MesherError::Io(e)
        }
    })?;
    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let content = line.split('#').next().unwrap_or("");
        let tokens: Vec<String> = content.split_whitespace().map(str::to_string).collect();
        if !tokens.is_empty() {
            records.push(tokens);
        }
    }
    Ok(records)
}

fn field<T: std::str::FromStr>(tokens: &[String], i: usize, what: &str) -> MesherResult<T>
where
    MesherError: From<T::Err>,
{
    Ok(tokens
        .get(i)
        .ok_or_else(|| MesherError::invalid_content(format!("{what}: missing field {i}")))?
        .parse::<T>()?)
}

/// Load a tetrahedral mesh from `<prefix>.node` and `<prefix>.ele`.
///
/// `path` may be the prefix itself or any of `prefix.node`, `prefix.ele`,
/// `prefix.tet`.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_tetmesh<P: AsRef<Path>>(path: P) -> MesherResult<TetgenIo> {
    let prefix = tetmesh_prefix(path.as_ref());
    let mut io = TetgenIo::default();

    let nodes = read_records(&with_suffix(&prefix, "node"))?;
    let (header, rows) = nodes
        .split_first()
        .ok_or_else(|| MesherError::invalid_content("empty .node file"))?;
    let npoints: usize = field(header, 0, ".node header")?;
    let dim: usize = if header.len() > 1 { field(header, 1, ".node header")? } else { 3 };
    if dim != 3 {
        return Err(MesherError::invalid_content(format!(".node dimension {dim}, expected 3")));
    }
    if rows.len() < npoints {
        return Err(MesherError::invalid_content(format!(
            ".node declares {npoints} points but has {}",
            rows.len()
        )));
    }
    let first_number: usize = match rows.first() {
        Some(row) => field(row, 0, ".node point")?,
        None => 0,
    };
    if first_number > 1 {
        return Err(MesherError::invalid_content(format!(
            ".node numbering starts at {first_number}"
        )));
    }
    io.points.reserve(npoints * 3);
    for row in &rows[..npoints] {
        for k in 1..=3 {
            io.points.push(field(row, k, ".node point")?);
        }
    }

    let elements = read_records(&with_suffix(&prefix, "ele"))?;
    let (header, rows) = elements
        .split_first()
        .ok_or_else(|| MesherError::invalid_content("empty .ele file"))?;
    let ntets: usize = field(header, 0, ".ele header")?;
    let corners: usize = if header.len() > 1 { field(header, 1, ".ele header")? } else { 4 };
    if corners != 4 && corners != 10 {
        return Err(MesherError::invalid_content(format!(
            ".ele has {corners} corners per tetrahedron, expected 4 or 10"
        )));
    }
    if rows.len() < ntets {
        return Err(MesherError::invalid_content(format!(
            ".ele declares {ntets} tetrahedra but has {}",
            rows.len()
        )));
    }
    io.corners_per_tet = corners;
    io.tetrahedra.reserve(ntets * corners);
    for row in &rows[..ntets] {
        for k in 1..=corners {
            let raw: usize = field(row, k, ".ele tetrahedron")?;
            let index = raw.checked_sub(first_number).ok_or(MesherError::IndexOutOfRange {
                index: raw,
                count: npoints,
            })?;
            io.tetrahedra.push(index);
        }
    }

    io.validate()?;
    debug!(
        points = io.number_of_points(),
        tetrahedra = io.number_of_tetrahedra(),
        first_number,
        "loaded tetrahedral mesh"
    );
    Ok(io)
}
