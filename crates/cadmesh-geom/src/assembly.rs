//! Assemblies of placed logical volumes.
//!
//! An assembly is a flat list of logical volumes, each with its own
//! placement. It has no mother volume of its own; callers imprint it into a
//! parent logical volume, which creates one named daughter per member.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cadmesh_math::{Transform, Vec3};
use tracing::debug;

use crate::volume::{LogicalVolume, PhysicalVolume};

static NEXT_ASSEMBLY_ID: AtomicUsize = AtomicUsize::new(1);

/// One member of an assembly.
#[derive(Debug, Clone)]
pub struct PlacedVolume {
    /// The member volume.
    pub logical: Arc<LogicalVolume>,
    /// Placement relative to the assembly frame.
    pub transform: Transform,
}

/// A group of placed logical volumes handled as one unit.
#[derive(Debug, Clone)]
pub struct AssemblyVolume {
    id: usize,
    placed: Vec<PlacedVolume>,
    imprints: usize,
    imprinted: usize,
}

impl AssemblyVolume {
    /// Create an empty assembly with a process-unique id.
    pub fn new() -> Self {
        Self {
            id: NEXT_ASSEMBLY_ID.fetch_add(1, Ordering::Relaxed),
            placed: Vec::new(),
            imprints: 0,
            imprinted: 0,
        }
    }

    /// Assembly id, used in imprinted daughter names.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Add a member at `position` with `rotation` (rotation applied first).
    pub fn add_placed_volume(
        &mut self,
        logical: Arc<LogicalVolume>,
        position: Vec3,
        rotation: &Transform,
    ) {
        self.placed.push(PlacedVolume {
            logical,
            transform: Transform::from_parts(&position, rotation),
        });
    }

    /// Members in insertion order.
    pub fn placed_volumes(&self) -> &[PlacedVolume] {
        &self.placed
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    /// True when the assembly has no members.
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Number of imprints made so far.
    pub fn imprint_count(&self) -> usize {
        self.imprints
    }

    /// Total number of daughters created by all imprints.
    pub fn total_imprinted_volumes(&self) -> usize {
        self.imprinted
    }

    /// Place every member into `parent`, composed with `placement`.
    ///
    /// Daughters are named `av_<id>_impr_<imprint>_<logical>_pv_<k>`, with
    /// `imprint` starting at 1 and `k` the member index.
    pub fn make_imprint(
        &mut self,
        parent: &mut LogicalVolume,
        placement: &Transform,
        copy_no: i32,
    ) {
        self.imprints += 1;
        for (k, member) in self.placed.iter().enumerate() {
            let name = format!(
                "av_{}_impr_{}_{}_pv_{}",
                self.id,
                self.imprints,
                member.logical.name(),
                k
            );
            parent.add_daughter(PhysicalVolume {
                name,
                logical: Arc::clone(&member.logical),
                transform: placement.then(&member.transform),
                copy_no,
            });
        }
        self.imprinted += self.placed.len();
        debug!(
            assembly = self.id,
            imprint = self.imprints,
            parent = parent.name(),
            daughters = self.placed.len(),
            "imprinted assembly"
        );
    }
}

impl Default for AssemblyVolume {
    fn default() -> Self {
        Self::new()
    }
}
