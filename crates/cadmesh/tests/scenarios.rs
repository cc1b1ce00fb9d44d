//! End-to-end loading of real files through the public API.

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use cadmesh::{
    Behavior, CadMeshError, Material, MeshDescriptor, MeshSelector, MesherResult, Point3, Solid,
    TetgenIo, Tetrahedralizer, Transform, Vec3,
};

const TRIANGLE_STL: &str = "solid triangle
  facet normal 0 0 1
    outer loop
      vertex 1.5 -2 0.25
      vertex 4 0 0.25
      vertex 1.5 3 0.25
    endloop
  endfacet
endsolid triangle
";

const CUBE_CORNERS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

const CUBE_TRIANGLES: [[usize; 3]; 12] = [
    [0, 2, 1],
    [0, 3, 2],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [1, 2, 6],
    [1, 6, 5],
    [2, 3, 7],
    [2, 7, 6],
    [3, 0, 4],
    [3, 4, 7],
];

fn cube_stl() -> String {
    let mut s = String::from("solid cube\n");
    for tri in CUBE_TRIANGLES {
        s.push_str("facet normal 0 0 0\nouter loop\n");
        for i in tri {
            let [x, y, z] = CUBE_CORNERS[i];
            s.push_str(&format!("vertex {x} {y} {z}\n"));
        }
        s.push_str("endloop\nendfacet\n");
    }
    s.push_str("endsolid cube\n");
    s
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn lossy(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn lead() -> Arc<Material> {
    Arc::new(Material::new("G4_Pb", 11.35))
}

/// Splits the unit cube into a fixed number of tetrahedra and counts calls.
struct CannedMesher {
    tets: usize,
    calls: Cell<usize>,
    last_quality: Cell<f64>,
}

impl CannedMesher {
    fn new(tets: usize) -> Self {
        Self {
            tets,
            calls: Cell::new(0),
            last_quality: Cell::new(f64::NAN),
        }
    }
}

impl Tetrahedralizer for CannedMesher {
    fn tetrahedralize(&self, behavior: &Behavior, input: &TetgenIo) -> MesherResult<TetgenIo> {
        self.calls.set(self.calls.get() + 1);
        self.last_quality.set(behavior.quality);
        assert!(behavior.no_bisect && behavior.plc);
        let mut out = TetgenIo {
            points: input.points.clone(),
            ..TetgenIo::default()
        };
        for i in 0..self.tets {
            out.tetrahedra.extend_from_slice(&[0, 1 + i % 6, 2 + i % 6, 7]);
        }
        Ok(out)
    }
}

// =============================================================================
// Scenario A / B: single triangle
// =============================================================================

#[test]
fn test_single_triangle_keeps_file_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "triangle.stl", TRIANGLE_STL);
    let mut d = MeshDescriptor::builder(lossy(&path)).build().unwrap();

    let solid = d.tessellated_mesh(MeshSelector::Default).unwrap();

    assert_eq!(solid.number_of_facets(), 1);
    assert!(solid.is_closed());
    assert_eq!(solid.name(), lossy(&path));
    assert_eq!(
        solid.facets()[0].vertices(),
        &[
            Point3::new(1.5, -2.0, 0.25),
            Point3::new(4.0, 0.0, 0.25),
            Point3::new(1.5, 3.0, 0.25),
        ]
    );
}

#[test]
fn test_single_triangle_reversed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "triangle.stl", TRIANGLE_STL);
    let mut d = MeshDescriptor::builder(lossy(&path))
        .reverse(true)
        .build()
        .unwrap();

    let solid = d.tessellated_mesh(MeshSelector::Default).unwrap();

    assert_eq!(
        solid.facets()[0].vertices(),
        &[
            Point3::new(4.0, 0.0, 0.25),
            Point3::new(1.5, -2.0, 0.25),
            Point3::new(1.5, 3.0, 0.25),
        ]
    );
    assert_abs_diff_eq!(solid.facets()[0].normal(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
}

#[test]
fn test_surface_scale_and_offset() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "triangle.stl", TRIANGLE_STL);
    let offset = Vec3::new(10.0, -20.0, 0.5);
    let mut d = MeshDescriptor::builder(lossy(&path))
        .units(cadmesh::units::CM)
        .offset(offset)
        .build()
        .unwrap();

    let solid = d.tessellated_mesh(0usize).unwrap();

    let v = solid.facets()[0].vertices();
    assert_abs_diff_eq!(v[0], Point3::new(25.0, -40.0, 3.0), epsilon = 1e-9);
    assert_abs_diff_eq!(v[2], Point3::new(25.0, 10.0, 3.0), epsilon = 1e-9);
}

#[test]
fn test_cube_surface_facet_count_and_volume() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "cube.stl", &cube_stl());
    let mut d = MeshDescriptor::builder(lossy(&path)).build().unwrap();

    let solid = d.tessellated_mesh(MeshSelector::Default).unwrap();

    assert_eq!(solid.number_of_facets(), 12);
    assert_abs_diff_eq!(solid.volume(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(solid.surface_area(), 6.0, epsilon = 1e-12);
}

#[test]
fn test_missing_file_reports_empty_geometry() {
    let mut d = MeshDescriptor::builder("/definitely/not/here.stl").build().unwrap();
    let err = d.tessellated_mesh(MeshSelector::Default).unwrap_err();
    assert!(matches!(err, CadMeshError::EmptyGeometry { .. }));
    assert!(err.to_string().contains("/definitely/not/here.stl"));
    assert!(d.solid().is_none());
}

// =============================================================================
// Scenario C / D / E: tetrahedral assemblies
// =============================================================================

#[test]
fn test_cube_stl_assembly_matches_mesher_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "cube.stl", &cube_stl());
    let mesher = CannedMesher::new(6);
    let mut d = MeshDescriptor::builder(lossy(&path))
        .material(lead())
        .quality(1.0)
        .build()
        .unwrap();

    let assembly = d.tetrahedral_mesh_with(&mesher).unwrap();

    assert_eq!(mesher.calls.get(), 1);
    assert_eq!(mesher.last_quality.get(), 1.0);
    assert_eq!(d.input_point_count(), 8);
    assert_eq!(assembly.len(), d.tetrahedron_count());
    assert_eq!(assembly.len(), 6);
    assert!(assembly
        .placed_volumes()
        .iter()
        .all(|p| p.logical.material().name == "G4_Pb"));
}

#[test]
fn test_tet_file_skips_tetrahedralization() {
    let dir = tempfile::tempdir().unwrap();
    let mut node = String::from("8 3 0 0\n");
    for (i, [x, y, z]) in CUBE_CORNERS.iter().enumerate() {
        node.push_str(&format!("{} {x} {y} {z}\n", i + 1));
    }
    let ele = "5 4 0
1 1 2 4 5
2 2 3 4 7
3 2 5 6 7
4 4 5 7 8
5 2 4 5 7
";
    write(dir.path(), "cube.node", &node);
    write(dir.path(), "cube.ele", ele);
    let path = dir.path().join("cube.tet");

    let mesher = CannedMesher::new(99);
    let mut d = MeshDescriptor::builder(lossy(&path))
        .material(lead())
        .build()
        .unwrap();
    let assembly = d.tetrahedral_mesh_with(&mesher).unwrap();

    assert_eq!(mesher.calls.get(), 0);
    assert_eq!(assembly.len(), 5);
    assert_eq!(d.tetrahedron_count(), 5);
    assert_eq!(d.output_point_count(), 8);
    assert_eq!(d.input_point_count(), 0);

    let total: f64 = assembly
        .placed_volumes()
        .iter()
        .map(|p| p.logical.solid().volume())
        .sum();
    assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
}

#[test]
fn test_tet_corners_are_scaled_and_shifted() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "one.node", "4 3 0 0\n0 0 0 0\n1 1 0 0\n2 0 1 0\n3 0 0 1\n");
    write(dir.path(), "one.ele", "1 4 0\n0 0 1 2 3\n");
    let mut d = MeshDescriptor::builder(lossy(&dir.path().join("one")))
        .file_type("TET")
        .material(lead())
        .units(2.0)
        .offset(Vec3::new(0.5, 0.5, 0.5))
        .build()
        .unwrap();

    let assembly = d.tetrahedral_mesh_with(&CannedMesher::new(0)).unwrap();

    let Solid::Tet(tet) = assembly.placed_volumes()[0].logical.solid() else {
        panic!("expected a tetrahedron");
    };
    assert_eq!(
        tet.vertices(),
        &[
            Point3::new(-0.5, -0.5, -0.5),
            Point3::new(1.5, -0.5, -0.5),
            Point3::new(-0.5, 1.5, -0.5),
            Point3::new(-0.5, -0.5, 1.5),
        ]
    );
}

#[test]
fn test_off_file_yields_empty_assembly() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "tetra.off",
        "OFF\n4 4 6\n0 0 0\n1 0 0\n0 1 0\n0 0 1\n3 0 2 1\n3 0 1 3\n3 0 3 2\n3 1 2 3\n",
    );
    let mesher = CannedMesher::new(4);
    let mut d = MeshDescriptor::builder(lossy(&path))
        .material(lead())
        .build()
        .unwrap();

    let assembly = d.tetrahedral_mesh_with(&mesher).unwrap();

    assert_eq!(mesher.calls.get(), 0);
    assert!(assembly.is_empty());
    assert_eq!(d.output_point_count(), 4);
}

#[test]
fn test_volumetric_without_material_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "cube.stl", &cube_stl());
    let mesher = CannedMesher::new(6);
    let mut d = MeshDescriptor::builder(lossy(&path)).build().unwrap();

    let err = d.tetrahedral_mesh_with(&mesher).unwrap_err();

    assert!(matches!(err, CadMeshError::MissingMaterial { .. }));
    assert_eq!(mesher.calls.get(), 0);
    assert!(d.assembly().is_none());
    assert_eq!(d.tetrahedron_count(), 0);
}

#[test]
fn test_assembly_imprints_into_parent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "cube.stl", &cube_stl());
    let mut d = MeshDescriptor::builder(lossy(&path))
        .material(lead())
        .build()
        .unwrap();
    let assembly = d.tetrahedral_mesh_with(&CannedMesher::new(3)).unwrap();

    let world_solid = cadmesh::Tet::new(
        "world",
        Point3::new(-100.0, -100.0, -100.0),
        Point3::new(100.0, -100.0, -100.0),
        Point3::new(0.0, 100.0, -100.0),
        Point3::new(0.0, 0.0, 100.0),
        0.0,
    );
    let mut world = cadmesh::LogicalVolume::new(world_solid, Some(lead()), "world").unwrap();
    let mut placed = (*assembly).clone();
    placed.make_imprint(&mut world, &Transform::translation(0.0, 0.0, 10.0), 0);

    assert_eq!(world.daughters().len(), 3);
    assert_eq!(placed.total_imprinted_volumes(), 3);
    assert!(world.daughters()[2]
        .name
        .ends_with(&format!("{}_tet_2_logical_pv_2", lossy(&path))));
    assert_eq!(
        world.daughters()[0].transform.translation_part(),
        Vec3::new(0.0, 0.0, 10.0)
    );
}

// =============================================================================
// Scenario F: named sub-meshes
// =============================================================================

const TWO_PARTS_OBJ: &str = "v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
o lid
f 1 2 3 4
o wall
f 1 2 5
";

#[test]
fn test_named_mesh_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "parts.obj", TWO_PARTS_OBJ);
    let mut d = MeshDescriptor::builder(lossy(&path)).build().unwrap();

    assert_eq!(d.tessellated_mesh("lid").unwrap().number_of_facets(), 2);
    assert_eq!(d.tessellated_mesh("wall").unwrap().number_of_facets(), 1);
    assert_eq!(d.tessellated_mesh(1usize).unwrap().number_of_facets(), 1);
}

#[test]
fn test_absent_mesh_name_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "parts.obj", TWO_PARTS_OBJ);
    let mut d = MeshDescriptor::builder(lossy(&path)).build().unwrap();

    let err = d.tessellated_mesh("door").unwrap_err();

    match &err {
        CadMeshError::NotFound { name, .. } => assert_eq!(name, "door"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(err.to_string().contains("door"));
    assert!(d.solid().is_none());
}

#[test]
fn test_obj_is_surface_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "parts.obj", TWO_PARTS_OBJ);
    let mut d = MeshDescriptor::builder(lossy(&path))
        .material(lead())
        .build()
        .unwrap();
    assert!(matches!(
        d.tetrahedral_mesh_with(&CannedMesher::new(1)),
        Err(CadMeshError::UnsupportedType { .. })
    ));
}

// =============================================================================
// Real TetGen backend
// =============================================================================

#[test]
fn test_tetgen_fills_cube_stl() {
    if !cadmesh::Tetgen::from_env().is_available() {
        eprintln!("skipping: TetGen executable not found");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "cube.stl", &cube_stl());
    let mut d = MeshDescriptor::builder(lossy(&path))
        .material(lead())
        .build()
        .unwrap();

    let assembly = d.tetrahedral_mesh().unwrap();

    assert!(!assembly.is_empty());
    assert_eq!(assembly.len(), d.tetrahedron_count());
    assert_eq!(d.input_point_count(), 8);
    assert_eq!(d.output_point_count(), 8);
    let total: f64 = assembly
        .placed_volumes()
        .iter()
        .map(|p| p.logical.solid().volume())
        .sum();
    assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
}
