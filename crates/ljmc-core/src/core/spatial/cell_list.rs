use super::{CellCoord, Chain, SpatialIndex};
use nalgebra::Vector3;
use tracing::{debug, warn};

/// Fewest cells per side for which the 27-cell stencil visits 27 distinct cells.
pub const MIN_CELLS_PER_SIDE: usize = 3;

/// Upper bound on cells per side (2M cells). Larger boxes get cells wider than the cutoff.
pub const MAX_CELLS_PER_SIDE: usize = 128;

/// Link-list cell index over the periodic unit box.
///
/// The box is divided into `cells_per_side³` cubic cells at least one cutoff wide. Each cell keeps
/// the head of a singly-linked chain and each particle the link to the next particle of its chain.
/// New particles are linked in at the head of a chain.
#[derive(Debug, Clone)]
pub struct CellList {
    cells_per_side: usize,
    head: Vec<Option<usize>>,
    next: Vec<Option<usize>>,
    cells: Vec<CellCoord>,
}

impl CellList {
    /// Creates an empty index for `capacity` particles and a cutoff given in box units.
    ///
    /// If fewer than [`MIN_CELLS_PER_SIDE`] cells fit along a side the grid collapses to a single
    /// cell, which turns every neighbor search into an all-pairs scan. The grid never exceeds
    /// [`MAX_CELLS_PER_SIDE`] cells per side.
    pub fn new(capacity: usize, reduced_cutoff: f64) -> Self {
        let fitted = (1.0 / reduced_cutoff).floor() as usize;
        let cells_per_side = if fitted > MAX_CELLS_PER_SIDE {
            debug!(fitted, "Capping cell grid at {} cells per side.", MAX_CELLS_PER_SIDE);
            MAX_CELLS_PER_SIDE
        } else if fitted < MIN_CELLS_PER_SIDE {
            warn!(
                fitted,
                "Box too small for a {}-cell stencil; falling back to a single cell.",
                MIN_CELLS_PER_SIDE
            );
            1
        } else {
            fitted
        };
        debug!(cells_per_side, capacity, "Initializing cell list.");

        Self {
            cells_per_side,
            head: vec![None; cells_per_side.pow(3)],
            next: vec![None; capacity],
            cells: vec![[0; 3]; capacity],
        }
    }

    #[inline]
    fn flat(&self, cell: CellCoord) -> usize {
        (cell[2] * self.cells_per_side + cell[1]) * self.cells_per_side + cell[0]
    }

    /// Number of per-particle slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.next.len()
    }

    /// Particles chained in `cell`, in chain order.
    pub fn chain(&self, cell: CellCoord) -> Chain<'_, Self> {
        Chain::of_cell(self, cell)
    }
}

impl SpatialIndex for CellList {
    fn reserve(&mut self, capacity: usize) {
        if capacity > self.next.len() {
            self.next.resize(capacity, None);
            self.cells.resize(capacity, [0; 3]);
        }
    }

    fn build(&mut self, positions: &[Vector3<f64>]) {
        self.reserve(positions.len());
        self.head.fill(None);
        self.next.fill(None);
        for (i, r) in positions.iter().enumerate() {
            let cell = self.cell_of(r);
            self.insert(i, cell);
        }
    }

    fn cell_of(&self, position: &Vector3<f64>) -> CellCoord {
        let sc = self.cells_per_side;
        let coord = |x: f64| (((x + 0.5) * sc as f64).floor().max(0.0) as usize).min(sc - 1);
        [coord(position.x), coord(position.y), coord(position.z)]
    }

    fn relocate(&mut self, index: usize, cell: CellCoord) {
        let current = self.cells[index];
        if current == cell {
            return;
        }
        self.remove(index, current);
        self.insert(index, cell);
    }

    fn insert(&mut self, index: usize, cell: CellCoord) {
        let flat = self.flat(cell);
        self.next[index] = self.head[flat];
        self.head[flat] = Some(index);
        self.cells[index] = cell;
    }

    fn remove(&mut self, index: usize, cell: CellCoord) {
        let flat = self.flat(cell);
        let mut previous: Option<usize> = None;
        let mut cursor = self.head[flat];

        while let Some(current) = cursor {
            if current == index {
                let following = self.next[index];
                match previous {
                    None => self.head[flat] = following,
                    Some(p) => self.next[p] = following,
                }
                self.next[index] = None;
                return;
            }
            previous = Some(current);
            cursor = self.next[current];
        }

        debug_assert!(false, "particle {index} is not chained in cell {cell:?}");
    }

    fn cells_per_side(&self) -> usize {
        self.cells_per_side
    }

    fn head(&self, cell: CellCoord) -> Option<usize> {
        self.head[self.flat(cell)]
    }

    fn next(&self, index: usize) -> Option<usize> {
        self.next[index]
    }

    fn cell(&self, index: usize) -> CellCoord {
        self.cells[index]
    }
}
