//! Spatial decomposition of the periodic unit box.
//!
//! The energy kernel only depends on the [`SpatialIndex`] interface: a regular grid of cells,
//! each holding a singly-linked chain of particle indices. [`cell_list::CellList`] is the
//! implementation used by default.

pub mod cell_list;

use nalgebra::Vector3;

/// Integer cell coordinate `[cx, cy, cz]`, each in `0..cells_per_side`.
pub type CellCoord = [usize; 3];

/// Interface the energy kernel requires from a link-list spatial index.
///
/// Particle indices refer to slots of the particle store. Every live particle belongs to exactly
/// one chain; implementations keep per-particle storage for at least the store capacity.
pub trait SpatialIndex {
    /// Ensures per-particle storage for at least `capacity` particles.
    fn reserve(&mut self, capacity: usize);

    /// Discards every chain and indexes `positions` (box units, wrapped) from scratch.
    fn build(&mut self, positions: &[Vector3<f64>]);

    /// Cell containing a wrapped position.
    fn cell_of(&self, position: &Vector3<f64>) -> CellCoord;

    /// Moves particle `index` from its current chain to the chain of `cell`.
    fn relocate(&mut self, index: usize, cell: CellCoord);

    /// Adds particle `index`, not currently indexed, to the chain of `cell`.
    fn insert(&mut self, index: usize, cell: CellCoord);

    /// Unlinks particle `index` from the chain of `cell`.
    fn remove(&mut self, index: usize, cell: CellCoord);

    fn cells_per_side(&self) -> usize;

    /// First particle of the chain of `cell`.
    fn head(&self, cell: CellCoord) -> Option<usize>;

    /// Particle following `index` in its chain.
    fn next(&self, index: usize) -> Option<usize>;

    /// Cell particle `index` is currently chained in.
    fn cell(&self, index: usize) -> CellCoord;
}

/// Iterator over a cell chain, starting at `start` and following `next` links.
pub struct Chain<'a, I: ?Sized> {
    index: &'a I,
    cursor: Option<usize>,
}

impl<'a, I: SpatialIndex + ?Sized> Chain<'a, I> {
    pub fn new(index: &'a I, start: Option<usize>) -> Self {
        Self {
            index,
            cursor: start,
        }
    }

    /// Every particle chained in `cell`.
    pub fn of_cell(index: &'a I, cell: CellCoord) -> Self {
        Self::new(index, index.head(cell))
    }
}

impl<I: SpatialIndex + ?Sized> Iterator for Chain<'_, I> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.cursor?;
        self.cursor = self.index.next(current);
        Some(current)
    }
}
