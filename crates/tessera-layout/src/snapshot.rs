//! Point-in-time copies of a grid's placements.
//!
//! Snapshots back the rollback of split and remove and show up in failure
//! diagnostics. They serialize with serde for dumps, but nothing here reads
//! them back from disk.

use serde::{Deserialize, Serialize};
use tessera_core::{GridSurface, PaneId, Position};

/// One pane and where it sat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub pane: PaneId,
    pub position: Position,
}

/// Placements of every pane, oldest placement first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    max_span: usize,
    entries: Vec<SnapshotEntry>,
}

impl LayoutSnapshot {
    /// Copy the placements of `surface`.
    #[must_use]
    pub fn capture<S: GridSurface + ?Sized>(surface: &S) -> Self {
        Self {
            max_span: surface.max_span(),
            entries: surface
                .placements()
                .into_iter()
                .map(|(pane, position)| SnapshotEntry { pane, position })
                .collect(),
        }
    }

    #[must_use]
    pub const fn max_span(&self) -> usize {
        self.max_span
    }

    #[must_use]
    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (PaneId, Position)> + '_ {
        self.entries.iter().map(|entry| (entry.pane, entry.position))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn position_of(&self, pane: PaneId) -> Option<Position> {
        self.entries
            .iter()
            .find(|entry| entry.pane == pane)
            .map(|entry| entry.position)
    }

    /// Positions in placement order.
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        self.entries.iter().map(|entry| entry.position).collect()
    }

    /// Deterministic hash for diagnostics over the grid size and entries.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        snapshot_state_hash(self)
    }
}

fn snapshot_state_hash(snapshot: &LayoutSnapshot) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0001_0000_01b3;

    fn mix(hash: &mut u64, byte: u8) {
        *hash ^= u64::from(byte);
        *hash = hash.wrapping_mul(PRIME);
    }

    fn mix_bytes(hash: &mut u64, bytes: &[u8]) {
        for byte in bytes {
            mix(hash, *byte);
        }
    }

    fn mix_u64(hash: &mut u64, value: u64) {
        mix_bytes(hash, &value.to_le_bytes());
    }

    fn mix_usize(hash: &mut u64, value: usize) {
        mix_u64(hash, value as u64);
    }

    fn mix_position(hash: &mut u64, position: Position) {
        mix_usize(hash, position.row);
        mix_usize(hash, position.col);
        mix_usize(hash, position.rowspan);
        mix_usize(hash, position.colspan);
    }

    let mut hash = OFFSET_BASIS;
    mix_usize(&mut hash, snapshot.max_span);
    mix_usize(&mut hash, snapshot.entries.len());
    for entry in &snapshot.entries {
        mix_u64(&mut hash, entry.pane.get());
        mix_position(&mut hash, entry.position);
    }
    hash
}
