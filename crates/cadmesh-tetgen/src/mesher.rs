//! Tetrahedralization behaviour and backends.
//!
//! [`Tetgen`] runs the TetGen program on a `.poly` (or `.node`) file in a
//! scratch directory and reads the `.node`/`.ele` result back. Every
//! [`Behavior`] switch maps onto a TetGen command-line switch, so boundary
//! preservation (`-Y`) and the quality bound (`-q`) reach the mesher as given.

use std::ffi::OsString;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{MesherError, MesherResult};
use crate::io::TetgenIo;
use crate::tetmesh::load_tetmesh;

/// Environment variable naming the TetGen executable.
pub const TETGEN_ENV: &str = "CADMESH_TETGEN";

/// Executable used when [`TETGEN_ENV`] is not set.
pub const DEFAULT_PROGRAM: &str = "tetgen";

/// Switches passed to the tetrahedralizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Behavior {
    /// Do not split boundary facets (TetGen `-Y`).
    pub no_bisect: bool,
    /// Treat the input as a piecewise linear complex (TetGen `-p`).
    pub plc: bool,
    /// Quality bound (TetGen `-q`). `0.0` disables refinement.
    pub quality: f64,
}

impl Behavior {
    /// Constrained, boundary-preserving meshing with the given quality bound.
    pub fn new(quality: f64) -> Self {
        Self {
            no_bisect: true,
            plc: true,
            quality,
        }
    }

    /// The quality bound to hand to the backend, if refinement is on.
    pub fn quality_bound(&self) -> Option<f64> {
        (self.quality > 0.0).then_some(self.quality)
    }

    /// TetGen switch string, without the leading dash.
    ///
    /// Output is always numbered from zero (`z`) and TetGen is kept quiet (`Q`).
    pub fn switches(&self) -> String {
        let mut s = String::new();
        if self.plc {
            s.push('p');
            if self.no_bisect {
                s.push('Y');
            }
        }
        if let Some(q) = self.quality_bound() {
            let _ = write!(s, "q{q}");
        }
        s.push_str("zQ");
        s
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Fills a closed surface with tetrahedra.
pub trait Tetrahedralizer {
    /// Tetrahedralize `input` and return the output buffers.
    fn tetrahedralize(&self, behavior: &Behavior, input: &TetgenIo) -> MesherResult<TetgenIo>;
}

/// TetGen backend driving the `tetgen` executable.
///
/// Each call works in a fresh scratch directory that is removed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tetgen {
    program: PathBuf,
}

impl Tetgen {
    /// Use the executable at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use `$CADMESH_TETGEN`, falling back to `tetgen` on the `PATH`.
    pub fn from_env() -> Self {
        match std::env::var_os(TETGEN_ENV) {
            Some(p) if !p.is_empty() => Self::new(p),
            _ => Self::default(),
        }
    }

    /// The executable this backend runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Whether the executable can be started at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-h")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }
}

impl Default for Tetgen {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Tetrahedralizer for Tetgen {
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(points = input.number_of_points(), facets = input.facets.len())
    )]
    fn tetrahedralize(&self, behavior: &Behavior, input: &TetgenIo) -> MesherResult<TetgenIo> {
        input.validate()?;

        let scratch = tempfile::Builder::new().prefix("cadmesh-tetgen").tempdir()?;
        let input_file = if behavior.plc {
            let path = scratch.path().join("input.poly");
            fs::write(&path, poly_text(input))?;
            path
        } else {
            let path = scratch.path().join("input.node");
            fs::write(&path, node_text(input))?;
            path
        };

        let switches = behavior.switches();
        debug!(program = %self.program.display(), %switches, "running TetGen");
        let mut flag = OsString::from("-");
        flag.push(&switches);
        let output = Command::new(&self.program)
            .arg(flag)
            .arg(&input_file)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| MesherError::Unavailable {
                program: self.program.display().to_string(),
                source,
            })?;
        if !output.status.success() {
            let mut message = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if message.is_empty() {
                message = String::from_utf8_lossy(&output.stdout).trim().to_string();
            }
            return Err(MesherError::tetgen(format!(
                "`-{switches}` exited with {}: {message}",
                output.status
            )));
        }

        let out = load_tetmesh(scratch.path().join("input.1"))?;
        debug!(
            points = out.number_of_points(),
            tetrahedra = out.number_of_tetrahedra(),
            "TetGen finished"
        );
        Ok(out)
    }
}

/// `.node` body: `<index> <x> <y> <z>` rows numbered from zero.
fn write_nodes(s: &mut String, input: &TetgenIo) {
    let _ = writeln!(s, "{} 3 0 0", input.number_of_points());
    for (i, c) in input.points.chunks_exact(3).enumerate() {
        let _ = writeln!(s, "{i} {} {} {}", c[0], c[1], c[2]);
    }
}

fn node_text(input: &TetgenIo) -> String {
    let mut s = String::new();
    write_nodes(&mut s, input);
    s
}

/// `.poly` file: nodes, one single-polygon facet per input facet, no holes
/// and no regions.
fn poly_text(input: &TetgenIo) -> String {
    let mut s = String::new();
    write_nodes(&mut s, input);
    let _ = writeln!(s, "{} 0", input.facets.len());
    for facet in &input.facets {
        s.push_str("1\n");
        let _ = write!(s, "{}", facet.len());
        for p in facet {
            let _ = write!(s, " {p}");
        }
        s.push('\n');
    }
    s.push_str("0\n0\n");
    s
}
