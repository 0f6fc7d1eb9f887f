use crate::core::utils::geometry::wrap_into_box;
use nalgebra::Vector3;

/// Ordered positions of the live particles, in box units, with an explicit capacity ceiling.
///
/// Indices `0..len()` are the live particles. The capacity is the number of particles the store
/// (and the spatial index sized alongside it) can hold before [`ParticleStore::grow`] is needed.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    positions: Vec<Vector3<f64>>,
    capacity: usize,
}

impl ParticleStore {
    /// Creates an empty store able to hold `capacity` particles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Creates a store holding `positions`, with a capacity of at least their number.
    pub fn from_positions(positions: Vec<Vector3<f64>>, capacity: usize) -> Self {
        let capacity = capacity.max(positions.len());
        let mut store = Self::with_capacity(capacity);
        store.positions.extend(positions);
        store
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.positions.len() >= self.capacity
    }

    pub fn positions(&self) -> &[Vector3<f64>] {
        &self.positions
    }

    pub fn position(&self, index: usize) -> Option<&Vector3<f64>> {
        self.positions.get(index)
    }

    /// Overwrites the position of a live particle. Returns `false` if `index` is not live.
    pub(crate) fn set(&mut self, index: usize, position: Vector3<f64>) -> bool {
        match self.positions.get_mut(index) {
            Some(slot) => {
                *slot = position;
                true
            }
            None => false,
        }
    }

    /// Appends a particle and returns its index, or `None` when the store is full.
    pub(crate) fn push(&mut self, position: Vector3<f64>) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        self.positions.push(position);
        Some(self.positions.len() - 1)
    }

    /// Removes particle `index` by moving the last particle into its slot.
    ///
    /// The particle formerly stored last is renumbered to `index`.
    pub(crate) fn swap_remove(&mut self, index: usize) -> Option<Vector3<f64>> {
        if index >= self.positions.len() {
            return None;
        }
        Some(self.positions.swap_remove(index))
    }

    /// Doubles the capacity, keeping every stored position. Returns the new capacity.
    pub(crate) fn grow(&mut self) -> usize {
        self.capacity = (self.capacity * 2).max(1);
        self.positions
            .reserve_exact(self.capacity - self.positions.len());
        self.capacity
    }

    /// Applies the periodic wrap to every stored position.
    pub(crate) fn wrap_all(&mut self) {
        for r in self.positions.iter_mut() {
            *r = wrap_into_box(r);
        }
    }
}
