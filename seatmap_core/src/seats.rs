use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::Cell;

/// An unordered set of cells. Serializes as `[[x,y],...]` sorted by x, then y.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatSet {
    cells: BTreeSet<Cell>,
}

impl SeatSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Returns false if the cell was already present.
    pub fn insert(&mut self, cell: Cell) -> bool {
        self.cells.insert(cell)
    }

    /// Returns false if the cell was not present.
    pub fn remove(&mut self, cell: Cell) -> bool {
        self.cells.remove(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn is_disjoint(&self, other: &SeatSet) -> bool {
        self.cells.is_disjoint(&other.cells)
    }

    pub fn to_pairs(&self) -> Vec<[u32; 2]> {
        self.iter().map(<[u32; 2]>::from).collect()
    }
}

impl FromIterator<Cell> for SeatSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SeatSet {
    type Item = Cell;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, Cell>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter().copied()
    }
}
