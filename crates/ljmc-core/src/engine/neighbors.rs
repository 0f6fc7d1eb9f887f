use crate::core::spatial::cell_list::MIN_CELLS_PER_SIDE;
use crate::core::spatial::{CellCoord, Chain, SpatialIndex};
use itertools::iproduct;

/// Which neighbor cells are scanned for a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// The particle's own chain after it plus 13 forward cells: every pair is seen once when all
    /// particles are scanned.
    Half,
    /// All 27 cells around the particle: every pair is seen from both sides.
    Full,
}

/// Offsets `(dx, dy, dz)` with `dz > 0`, or `dz = 0 ∧ dy > 0`, or `dz = dy = 0 ∧ dx > 0`.
const HALF_STENCIL: [[isize; 3]; 13] = [
    [1, 0, 0],
    [-1, 1, 0],
    [0, 1, 0],
    [1, 1, 0],
    [-1, -1, 1],
    [0, -1, 1],
    [1, -1, 1],
    [-1, 0, 1],
    [0, 0, 1],
    [1, 0, 1],
    [-1, 1, 1],
    [0, 1, 1],
    [1, 1, 1],
];

#[inline]
fn offset_cell(cell: CellCoord, offset: [isize; 3], cells_per_side: usize) -> CellCoord {
    let sc = cells_per_side as isize;
    let wrap = |c: usize, d: isize| (c as isize + d).rem_euclid(sc) as usize;
    [
        wrap(cell[0], offset[0]),
        wrap(cell[1], offset[1]),
        wrap(cell[2], offset[2]),
    ]
}

/// Produces candidate partner lists from a spatial index.
pub struct NeighborEnumerator<'a, I: SpatialIndex + ?Sized> {
    index: &'a I,
}

impl<'a, I: SpatialIndex + ?Sized> NeighborEnumerator<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }

    /// Fills `out` with the candidates for `particle`.
    ///
    /// `origin` is the cell the search is centred on in full mode. Half mode always searches from
    /// the particle's indexed cell, since the down-list is only defined for an indexed particle.
    /// Full mode does not drop `particle` itself from `out`.
    pub fn enumerate(
        &self,
        particle: usize,
        origin: CellCoord,
        mode: SearchMode,
        out: &mut Vec<usize>,
    ) {
        out.clear();
        match mode {
            SearchMode::Full => self.full(origin, out),
            SearchMode::Half => self.half(particle, out),
        }
    }

    fn full(&self, origin: CellCoord, out: &mut Vec<usize>) {
        let sc = self.index.cells_per_side();
        if sc < MIN_CELLS_PER_SIDE {
            out.extend(Chain::of_cell(self.index, origin));
            return;
        }
        for (dz, dy, dx) in iproduct!(-1..=1, -1..=1, -1..=1) {
            let cell = offset_cell(origin, [dx, dy, dz], sc);
            out.extend(Chain::of_cell(self.index, cell));
        }
    }

    fn half(&self, particle: usize, out: &mut Vec<usize>) {
        out.extend(Chain::new(self.index, self.index.next(particle)));

        let sc = self.index.cells_per_side();
        if sc < MIN_CELLS_PER_SIDE {
            return;
        }
        let origin = self.index.cell(particle);
        for offset in HALF_STENCIL {
            let cell = offset_cell(origin, offset, sc);
            out.extend(Chain::of_cell(self.index, cell));
        }
    }
}
