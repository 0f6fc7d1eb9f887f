use super::config::SimulationConfig;
use super::error::EngineError;
use super::neighbors::{NeighborEnumerator, SearchMode};
use super::tasks::pair_energy::PairKernel;
use super::tasks::system_energy;
use crate::core::forcefield::potentials::{LongRangeCorrection, long_range_correction};
use crate::core::forcefield::term::EnergyResult;
use crate::core::models::particles::ParticleStore;
use crate::core::spatial::SpatialIndex;
use crate::core::spatial::cell_list::CellList;
use crate::core::utils::geometry::wrap_into_box;
use nalgebra::Vector3;
use tracing::{debug, info, trace};

/// A Lennard-Jones system in a periodic cubic box together with its spatial index.
///
/// Positions are stored in box units. The index is built explicitly with
/// [`Simulation::build_index`]; energies require it, and from then on every mutation keeps the
/// index synchronized with the store. Mutations made before the first build only touch the store.
#[derive(Debug, Clone)]
pub struct Simulation<I: SpatialIndex = CellList> {
    config: SimulationConfig,
    store: ParticleStore,
    index: I,
    kernel: PairKernel,
    scratch: Vec<usize>,
    indexed: bool,
}

impl Simulation<CellList> {
    /// Creates an empty simulation sized for `config.initial_capacity` particles.
    pub fn new(config: SimulationConfig) -> Result<Self, EngineError> {
        Self::with_positions(config, Vec::new())
    }

    /// Creates a simulation holding `positions` (box units).
    ///
    /// The capacity is the larger of `config.initial_capacity` and the number of positions.
    pub fn with_positions(
        config: SimulationConfig,
        positions: Vec<Vector3<f64>>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let capacity = config.initial_capacity.max(positions.len());
        let index = CellList::new(capacity, config.reduced_cutoff());
        Self::with_index(config, positions, index)
    }
}

impl<I: SpatialIndex> Simulation<I> {
    /// Creates a simulation around a caller-supplied spatial index.
    pub fn with_index(
        config: SimulationConfig,
        positions: Vec<Vector3<f64>>,
        mut index: I,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let store = ParticleStore::from_positions(positions, config.initial_capacity);
        index.reserve(store.capacity());
        debug!(
            n = store.len(),
            capacity = store.capacity(),
            "Allocated particle store."
        );

        Ok(Self {
            kernel: PairKernel::new(config.box_length, config.cutoff_radius),
            scratch: Vec::with_capacity(store.capacity()),
            config,
            store,
            index,
            indexed: false,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub fn positions(&self) -> &[Vector3<f64>] {
        self.store.positions()
    }

    pub fn position(&self, index: usize) -> Result<Vector3<f64>, EngineError> {
        self.store
            .position(index)
            .copied()
            .ok_or_else(|| self.out_of_range(index))
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    /// Number density in reduced units.
    pub fn density(&self) -> f64 {
        self.len() as f64 / self.config.volume()
    }

    /// Wraps every position into the unit box and rebuilds the spatial index from scratch.
    ///
    /// Call once before the first energy evaluation; calling again resets the index.
    pub fn build_index(&mut self) -> Result<(), EngineError> {
        if self.store.len() > self.store.capacity() {
            return Err(EngineError::Internal(format!(
                "live count {} exceeds capacity {}",
                self.store.len(),
                self.store.capacity()
            )));
        }
        self.store.wrap_all();
        self.index.reserve(self.store.capacity());
        self.index.build(self.store.positions());
        self.indexed = true;
        info!(
            n = self.store.len(),
            cells_per_side = self.index.cells_per_side(),
            "Spatial index built."
        );
        Ok(())
    }

    /// Energy and virial of `position` interacting with the particles found by `mode`.
    ///
    /// In full mode `particle` is only excluded from its own partner list, so `particle == len()`
    /// evaluates a trial insertion. Half mode requires `particle` to be a live, indexed particle at
    /// its stored position.
    pub fn pair_energy(
        &mut self,
        position: &Vector3<f64>,
        particle: usize,
        mode: SearchMode,
    ) -> Result<EnergyResult, EngineError> {
        self.ensure_indexed()?;
        let limit = match mode {
            SearchMode::Half => self.store.len(),
            SearchMode::Full => self.store.len() + 1,
        };
        if particle >= limit {
            return Err(self.out_of_range(particle));
        }

        let origin = match mode {
            SearchMode::Half => self.index.cell(particle),
            SearchMode::Full => self.index.cell_of(&wrap_into_box(position)),
        };

        let mut candidates = std::mem::take(&mut self.scratch);
        NeighborEnumerator::new(&self.index).enumerate(particle, origin, mode, &mut candidates);
        let result = self
            .kernel
            .evaluate(position, particle, &candidates, self.store.positions());
        self.scratch = candidates;

        Ok(result)
    }

    /// Full-mode energy of a stored particle against every other particle.
    pub fn particle_energy(&mut self, particle: usize) -> Result<EnergyResult, EngineError> {
        let position = self.position(particle)?;
        self.pair_energy(&position, particle, SearchMode::Full)
    }

    /// Total potential energy and virial, counting each pair once.
    pub fn system_energy(&mut self) -> Result<EnergyResult, EngineError> {
        self.ensure_indexed()?;
        let count = self.store.len();
        system_energy::accumulate(count, |i| {
            let position = self.store.positions()[i];
            self.pair_energy(&position, i, SearchMode::Half)
        })
    }

    /// Tail corrections for the current particle count.
    pub fn long_range_correction(&self) -> LongRangeCorrection {
        long_range_correction(
            self.len(),
            self.config.box_length,
            self.config.cutoff_radius,
        )
    }

    /// Moves particle `particle` to `new_position` (box units) and relocates it in the index.
    ///
    /// No energy is computed; call after the move has been accepted.
    pub fn move_particle(
        &mut self,
        particle: usize,
        new_position: Vector3<f64>,
    ) -> Result<(), EngineError> {
        let wrapped = wrap_into_box(&new_position);
        if !self.store.set(particle, wrapped) {
            return Err(self.out_of_range(particle));
        }
        if self.indexed {
            let cell = self.index.cell_of(&wrapped);
            self.index.relocate(particle, cell);
        }
        trace!(particle, "Particle moved.");
        Ok(())
    }

    /// Appends a particle at `new_position` (box units) and returns its index.
    ///
    /// Fails with [`EngineError::CapacityExceeded`] when the store is full; [`Simulation::grow`]
    /// first.
    pub fn create(&mut self, new_position: Vector3<f64>) -> Result<usize, EngineError> {
        let wrapped = wrap_into_box(&new_position);
        let particle = self
            .store
            .push(wrapped)
            .ok_or(EngineError::CapacityExceeded {
                capacity: self.store.capacity(),
            })?;
        if self.indexed {
            let cell = self.index.cell_of(&wrapped);
            self.index.insert(particle, cell);
        }
        trace!(particle, "Particle created.");
        Ok(particle)
    }

    /// Removes particle `particle` by moving the last particle into its slot.
    ///
    /// This renumbers the particle previously stored last to `particle`; callers keeping
    /// per-particle data alongside the store must apply the same swap.
    pub fn destroy(&mut self, particle: usize) -> Result<(), EngineError> {
        let count = self.store.len();
        if particle >= count {
            return Err(self.out_of_range(particle));
        }
        let last = count - 1;

        if self.indexed {
            let last_cell = self.index.cell(last);
            self.index.remove(last, last_cell);
            if particle != last {
                self.index.relocate(particle, last_cell);
            }
        }
        self.store
            .swap_remove(particle)
            .ok_or_else(|| self.out_of_range(particle))?;

        trace!(particle, renumbered = last, "Particle destroyed.");
        Ok(())
    }

    /// Doubles the particle capacity of the store and of the spatial index.
    ///
    /// Existing positions and chains are kept; no index rebuild is needed.
    pub fn grow(&mut self) -> usize {
        let capacity = self.store.grow();
        self.index.reserve(capacity);
        self.scratch.reserve(capacity.saturating_sub(self.scratch.capacity()));
        debug!(capacity, "Grew particle capacity.");
        capacity
    }

    fn ensure_indexed(&self) -> Result<(), EngineError> {
        if self.indexed {
            Ok(())
        } else {
            Err(EngineError::IndexNotBuilt)
        }
    }

    fn out_of_range(&self, index: usize) -> EngineError {
        EngineError::ParticleOutOfRange {
            index,
            count: self.store.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::potentials::lennard_jones_12_6_terms;
    use crate::core::models::lattice::fcc_lattice;
    use crate::core::spatial::CellCoord;
    use crate::core::utils::geometry::minimum_image;
    use crate::engine::config::SimulationConfigBuilder;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE * a.abs().max(b.abs()).max(1.0)
    }

    fn config(box_length: f64, cutoff: f64, capacity: usize) -> SimulationConfig {
        SimulationConfigBuilder::new()
            .box_length(box_length)
            .cutoff_radius(cutoff)
            .initial_capacity(capacity)
            .build()
            .unwrap()
    }

    fn indexed(config: SimulationConfig, positions: Vec<Vector3<f64>>) -> Simulation {
        let mut sim = Simulation::with_positions(config, positions).unwrap();
        sim.build_index().unwrap();
        sim
    }

    /// Random non-overlapping configuration: no pair closer than 0.9σ.
    fn random_fluid(n: usize, box_length: f64, seed: u64) -> Vec<Vector3<f64>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let min_sq = (0.9 / box_length).powi(2);
        let mut positions: Vec<Vector3<f64>> = Vec::with_capacity(n);
        while positions.len() < n {
            let trial = Vector3::new(
                rng.gen_range(-0.5..0.5),
                rng.gen_range(-0.5..0.5),
                rng.gen_range(-0.5..0.5),
            );
            let clear = positions
                .iter()
                .all(|r| minimum_image(&(trial - r)).norm_squared() >= min_sq);
            if clear {
                positions.push(trial);
            }
        }
        positions
    }

    fn brute_force(positions: &[Vector3<f64>], box_length: f64, cutoff: f64) -> EnergyResult {
        let rc_sq = (cutoff / box_length).powi(2);
        let mut total = EnergyResult::default();
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let d_sq = minimum_image(&(positions[i] - positions[j])).norm_squared();
                if d_sq >= rc_sq {
                    continue;
                }
                match lennard_jones_12_6_terms(d_sq * box_length * box_length) {
                    Some((pot, vir)) => total += EnergyResult::new(4.0 * pot, 8.0 * vir),
                    None => return EnergyResult::overlapping(),
                }
            }
        }
        total
    }

    fn chained_particles(sim: &Simulation) -> Vec<usize> {
        let index = sim.index();
        let sc = index.cells_per_side();
        let mut all = Vec::new();
        for cz in 0..sc {
            for cy in 0..sc {
                for cx in 0..sc {
                    all.extend(index.chain([cx, cy, cz]));
                }
            }
        }
        all.sort_unstable();
        all
    }

    fn assert_index_consistent(sim: &Simulation) {
        assert_eq!(chained_particles(sim), (0..sim.len()).collect::<Vec<_>>());
        for (i, r) in sim.positions().iter().enumerate() {
            assert_eq!(sim.index().cell(i), sim.index().cell_of(r), "particle {i}");
        }
    }

    #[test]
    fn with_positions_rejects_cutoff_larger_than_half_box() {
        let bad = SimulationConfig {
            box_length: 4.0,
            cutoff_radius: 2.5,
            initial_capacity: 8,
        };
        let result = Simulation::with_positions(bad, Vec::new());
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn energies_require_built_index() {
        let mut sim = Simulation::with_positions(config(10.0, 2.5, 4), fcc_lattice(4)).unwrap();
        assert!(matches!(sim.system_energy(), Err(EngineError::IndexNotBuilt)));
        assert!(matches!(
            sim.particle_energy(0),
            Err(EngineError::IndexNotBuilt)
        ));
    }

    #[test]
    fn build_index_wraps_positions_into_unit_box() {
        let positions = vec![Vector3::new(0.7, -1.2, 0.1), Vector3::new(0.0, 0.0, 2.4)];
        let sim = indexed(config(10.0, 2.5, 4), positions);
        for r in sim.positions() {
            assert!(r.iter().all(|c| (-0.5..0.5).contains(c)));
        }
        assert_index_consistent(&sim);
    }

    #[test]
    fn positions_on_box_faces_are_stored_at_lower_edge() {
        let mut sim = indexed(config(10.0, 2.5, 4), vec![Vector3::new(0.5, 0.0, 0.0)]);
        assert_eq!(sim.position(0).unwrap(), Vector3::new(-0.5, 0.0, 0.0));

        sim.move_particle(0, Vector3::new(-0.5, -1.5, 0.0)).unwrap();
        assert_eq!(sim.position(0).unwrap(), Vector3::new(-0.5, -0.5, 0.0));

        let created = sim.create(Vector3::new(0.0, 1.5, -0.5)).unwrap();
        assert_eq!(sim.position(created).unwrap(), Vector3::new(0.0, -0.5, -0.5));
        for r in sim.positions() {
            assert!(r.iter().all(|c| (-0.5..0.5).contains(c)));
        }
        assert_index_consistent(&sim);
    }

    #[test]
    fn two_particles_at_unit_separation_give_zero_energy_and_virial_eight() {
        let positions = vec![Vector3::zeros(), Vector3::new(0.1, 0.0, 0.0)];
        let mut sim = indexed(config(10.0, 2.5, 2), positions);

        let total = sim.system_energy().unwrap();
        assert!(!total.overlap);
        assert!(total.pot.abs() < TOLERANCE);
        assert!((total.vir - 8.0).abs() < TOLERANCE);

        let single = sim.particle_energy(0).unwrap();
        assert!(single.pot.abs() < TOLERANCE);
        assert!((single.vir - 8.0).abs() < TOLERANCE);
    }

    #[test]
    fn two_particles_at_half_sigma_overlap() {
        let positions = vec![Vector3::zeros(), Vector3::new(0.05, 0.0, 0.0)];
        let mut sim = indexed(config(10.0, 2.5, 2), positions);
        assert!(sim.system_energy().unwrap().overlap);
        assert!(sim.particle_energy(1).unwrap().overlap);
    }

    #[test]
    fn pair_exactly_at_cutoff_does_not_contribute() {
        let positions = vec![Vector3::zeros(), Vector3::new(0.25, 0.0, 0.0)];
        let mut sim = indexed(config(10.0, 2.5, 2), positions);
        assert_eq!(sim.system_energy().unwrap(), EnergyResult::new(0.0, 0.0));
    }

    #[test]
    fn system_energy_matches_brute_force_on_multi_cell_grid() {
        let positions = random_fluid(150, 10.0, 7);
        let expected = brute_force(&positions, 10.0, 2.5);
        let mut sim = indexed(config(10.0, 2.5, 150), positions);
        assert_eq!(sim.index().cells_per_side(), 4);

        let total = sim.system_energy().unwrap();
        assert!(!total.overlap);
        assert!(f64_approx_equal(total.pot, expected.pot));
        assert!(f64_approx_equal(total.vir, expected.vir));
    }

    #[test]
    fn system_energy_matches_brute_force_on_single_cell_grid() {
        let positions = random_fluid(30, 5.0, 11);
        let expected = brute_force(&positions, 5.0, 2.4);
        let mut sim = indexed(config(5.0, 2.4, 30), positions);
        assert_eq!(sim.index().cells_per_side(), 1);

        let total = sim.system_energy().unwrap();
        assert!(f64_approx_equal(total.pot, expected.pot));
        assert!(f64_approx_equal(total.vir, expected.vir));
    }

    #[test]
    fn dilute_large_box_uses_capped_grid_and_matches_brute_force() {
        let box_length: f64 = 1.0e4;
        let mut rng = StdRng::seed_from_u64(53);
        let min_sq = (0.9 / box_length).powi(2);
        let mut positions: Vec<Vector3<f64>> = Vec::new();
        // Two clusters a few sigma wide: one on an interior cell boundary, one across the periodic face.
        for centre in [Vector3::zeros(), Vector3::new(-0.5, -0.5, 0.0)] {
            let mut placed = 0;
            while placed < 8 {
                let offset = Vector3::new(
                    rng.gen_range(-1.5..1.5),
                    rng.gen_range(-1.5..1.5),
                    rng.gen_range(-1.5..1.5),
                ) / box_length;
                let trial = wrap_into_box(&(centre + offset));
                if positions
                    .iter()
                    .all(|r| minimum_image(&(trial - r)).norm_squared() >= min_sq)
                {
                    positions.push(trial);
                    placed += 1;
                }
            }
        }

        let expected = brute_force(&positions, box_length, 2.5);
        let mut sim = indexed(config(box_length, 2.5, 16), positions);
        assert_eq!(sim.index().cells_per_side(), 128);

        let total = sim.system_energy().unwrap();
        assert!(!total.overlap);
        assert!(f64_approx_equal(total.pot, expected.pot));
        assert!(f64_approx_equal(total.vir, expected.vir));
    }

    #[test]
    fn huge_box_builds_without_overflowing_the_grid() {
        let mut sim = indexed(config(1.0e7, 1.0, 4), fcc_lattice(4));
        assert_eq!(sim.system_energy().unwrap(), EnergyResult::default());
    }

    #[test]
    fn full_mode_sum_double_counts_half_mode_sum() {
        let positions = random_fluid(120, 9.0, 3);
        let mut sim = indexed(config(9.0, 2.5, 120), positions);

        let half = sim.system_energy().unwrap();
        let mut full = EnergyResult::default();
        for i in 0..sim.len() {
            full += sim.particle_energy(i).unwrap();
        }

        assert!(!full.overlap);
        assert!(f64_approx_equal(full.pot, 2.0 * half.pot));
        assert!(f64_approx_equal(full.vir, 2.0 * half.vir));
    }

    #[test]
    fn trial_move_energy_difference_matches_system_energy_difference() {
        let positions = random_fluid(100, 9.0, 21);
        let mut sim = indexed(config(9.0, 2.5, 100), positions);
        let mut rng = StdRng::seed_from_u64(99);
        let before = sim.system_energy().unwrap();

        let (particle, trial, old, new) = loop {
            let particle = rng.gen_range(0..sim.len());
            let displacement = Vector3::new(
                rng.gen_range(-0.03..0.03),
                rng.gen_range(-0.03..0.03),
                rng.gen_range(-0.03..0.03),
            );
            let trial = wrap_into_box(&(sim.position(particle).unwrap() + displacement));
            let old = sim.particle_energy(particle).unwrap();
            let new = sim.pair_energy(&trial, particle, SearchMode::Full).unwrap();
            if !new.overlap {
                break (particle, trial, old, new);
            }
        };

        sim.move_particle(particle, trial).unwrap();
        assert_index_consistent(&sim);
        let after = sim.system_energy().unwrap();
        assert!(f64_approx_equal(after.pot - before.pot, new.pot - old.pot));
        assert!(f64_approx_equal(after.vir - before.vir, new.vir - old.vir));
    }

    #[test]
    fn trial_insertion_energy_matches_energy_after_create() {
        let positions = random_fluid(60, 8.0, 5);
        let mut sim = indexed(config(8.0, 2.5, 128), positions);
        let before = sim.system_energy().unwrap();
        let trial = Vector3::new(0.013, -0.21, 0.37);

        let insertion = sim
            .pair_energy(&trial, sim.len(), SearchMode::Full)
            .unwrap();
        if insertion.overlap {
            return;
        }
        let particle = sim.create(trial).unwrap();
        assert_eq!(particle, 60);
        assert_index_consistent(&sim);

        let after = sim.system_energy().unwrap();
        assert!(f64_approx_equal(after.pot - before.pot, insertion.pot));
        assert!(f64_approx_equal(after.vir - before.vir, insertion.vir));
    }

    #[test]
    fn create_then_destroy_restores_original_state() {
        let positions = random_fluid(40, 8.0, 13);
        let mut sim = indexed(config(8.0, 2.5, 64), positions);
        let original = sim.positions().to_vec();
        let original_cells: Vec<_> = (0..sim.len()).map(|i| sim.index().cell(i)).collect();
        let original_energy = sim.system_energy().unwrap();

        let particle = sim.create(Vector3::new(0.31, 0.31, -0.31)).unwrap();
        sim.destroy(particle).unwrap();

        assert_eq!(sim.len(), 40);
        assert_eq!(sim.positions(), original.as_slice());
        for (i, cell) in original_cells.iter().enumerate() {
            assert_eq!(sim.index().cell(i), *cell);
        }
        assert_index_consistent(&sim);
        assert_eq!(sim.system_energy().unwrap(), original_energy);
    }

    #[test]
    fn destroy_matches_system_built_without_the_particle() {
        let positions = random_fluid(80, 9.0, 17);
        let victim = 23;
        let mut reduced = positions.clone();
        reduced.remove(victim);

        let mut sim = indexed(config(9.0, 2.5, 80), positions);
        sim.destroy(victim).unwrap();
        assert_eq!(sim.len(), 79);
        assert_index_consistent(&sim);

        let mut reference = indexed(config(9.0, 2.5, 80), reduced);
        let expected = reference.system_energy().unwrap();
        let actual = sim.system_energy().unwrap();
        assert!(f64_approx_equal(actual.pot, expected.pot));
        assert!(f64_approx_equal(actual.vir, expected.vir));
    }

    #[test]
    fn destroy_renumbers_last_particle_into_removed_slot() {
        let positions = random_fluid(10, 8.0, 29);
        let last = positions[9];
        let mut sim = indexed(config(8.0, 2.5, 10), positions);

        sim.destroy(2).unwrap();
        assert_eq!(sim.position(2).unwrap(), last);
        assert_index_consistent(&sim);
    }

    #[test]
    fn destroy_last_particle_only_shrinks() {
        let positions = random_fluid(5, 8.0, 31);
        let mut sim = indexed(config(8.0, 2.5, 5), positions.clone());
        sim.destroy(4).unwrap();
        assert_eq!(sim.positions(), &positions[..4]);
        assert_index_consistent(&sim);
    }

    #[test]
    fn destroying_every_particle_empties_index() {
        let mut sim = indexed(config(8.0, 2.5, 32), fcc_lattice(32));
        while !sim.is_empty() {
            sim.destroy(0).unwrap();
        }
        assert!(chained_particles(&sim).is_empty());
        assert_eq!(sim.system_energy().unwrap(), EnergyResult::default());
    }

    #[test]
    fn mutations_reject_out_of_range_indices() {
        let mut sim = indexed(config(8.0, 2.5, 4), fcc_lattice(4));
        assert!(matches!(
            sim.move_particle(4, Vector3::zeros()),
            Err(EngineError::ParticleOutOfRange { index: 4, count: 4 })
        ));
        assert!(matches!(
            sim.destroy(7),
            Err(EngineError::ParticleOutOfRange { .. })
        ));
        assert!(matches!(
            sim.pair_energy(&Vector3::zeros(), 4, SearchMode::Half),
            Err(EngineError::ParticleOutOfRange { .. })
        ));
        assert!(matches!(
            sim.pair_energy(&Vector3::zeros(), 5, SearchMode::Full),
            Err(EngineError::ParticleOutOfRange { .. })
        ));
    }

    #[test]
    fn create_beyond_capacity_fails_until_grown() {
        let mut sim = indexed(config(8.0, 2.5, 4), fcc_lattice(4));
        assert_eq!(sim.capacity(), 4);
        assert!(matches!(
            sim.create(Vector3::new(0.1, 0.1, 0.1)),
            Err(EngineError::CapacityExceeded { capacity: 4 })
        ));

        assert_eq!(sim.grow(), 8);
        assert_eq!(sim.create(Vector3::new(0.1, 0.1, 0.1)).unwrap(), 4);
        assert_index_consistent(&sim);
    }

    #[test]
    fn energies_stay_correct_after_repeated_growth_without_rebuild() {
        let positions = random_fluid(64, 9.0, 41);
        let mut sim = indexed(config(9.0, 2.5, 2), positions[..2].to_vec());

        for r in &positions[2..] {
            if sim.store().is_full() {
                sim.grow();
            }
            sim.create(*r).unwrap();
        }

        assert_eq!(sim.len(), 64);
        assert_eq!(sim.capacity(), 64);
        assert_index_consistent(&sim);
        let expected = brute_force(&positions, 9.0, 2.5);
        let total = sim.system_energy().unwrap();
        assert!(f64_approx_equal(total.pot, expected.pot));
        assert!(f64_approx_equal(total.vir, expected.vir));
    }

    #[test]
    fn move_particle_wraps_and_relocates_in_index() {
        let mut sim = indexed(config(10.0, 2.5, 4), fcc_lattice(4));
        sim.move_particle(1, Vector3::new(0.8, 0.0, -0.7)).unwrap();

        let r = sim.position(1).unwrap();
        assert!((r - Vector3::new(-0.2, 0.0, 0.3)).norm() < 1e-12);
        assert_index_consistent(&sim);
    }

    #[test]
    fn mutations_before_indexing_only_touch_store() {
        let mut sim = Simulation::with_positions(config(10.0, 2.5, 8), fcc_lattice(4)).unwrap();
        sim.create(Vector3::new(0.2, 0.2, 0.2)).unwrap();
        sim.move_particle(0, Vector3::new(-0.3, 0.1, 0.0)).unwrap();
        sim.destroy(1).unwrap();
        assert_eq!(sim.len(), 4);

        sim.build_index().unwrap();
        assert_index_consistent(&sim);
        let expected = brute_force(sim.positions(), 10.0, 2.5);
        let total = sim.system_energy().unwrap();
        assert!(f64_approx_equal(total.pot, expected.pot));
    }

    #[test]
    fn system_energy_reports_overlap_from_one_close_pair() {
        let mut positions = random_fluid(50, 9.0, 43);
        positions[10] = positions[30] + Vector3::new(0.02, 0.0, 0.0);
        let mut sim = indexed(config(9.0, 2.5, 50), positions);
        assert!(sim.system_energy().unwrap().overlap);
    }

    /// Cell list that counts `cell()` lookups. Each half-mode pair energy on a grid of at least
    /// three cells per side performs exactly two: the search origin and the forward stencil.
    #[derive(Debug)]
    struct CountingIndex {
        inner: CellList,
        cell_lookups: std::cell::Cell<usize>,
    }

    impl SpatialIndex for CountingIndex {
        fn reserve(&mut self, capacity: usize) {
            self.inner.reserve(capacity)
        }
        fn build(&mut self, positions: &[Vector3<f64>]) {
            self.inner.build(positions)
        }
        fn cell_of(&self, position: &Vector3<f64>) -> CellCoord {
            self.inner.cell_of(position)
        }
        fn relocate(&mut self, index: usize, cell: CellCoord) {
            self.inner.relocate(index, cell)
        }
        fn insert(&mut self, index: usize, cell: CellCoord) {
            self.inner.insert(index, cell)
        }
        fn remove(&mut self, index: usize, cell: CellCoord) {
            self.inner.remove(index, cell)
        }
        fn cells_per_side(&self) -> usize {
            self.inner.cells_per_side()
        }
        fn head(&self, cell: CellCoord) -> Option<usize> {
            self.inner.head(cell)
        }
        fn next(&self, index: usize) -> Option<usize> {
            self.inner.next(index)
        }
        fn cell(&self, index: usize) -> CellCoord {
            self.cell_lookups.set(self.cell_lookups.get() + 1);
            self.inner.cell(index)
        }
    }

    fn counting_simulation(positions: Vec<Vector3<f64>>) -> Simulation<CountingIndex> {
        let config = config(9.0, 2.5, positions.len());
        let index = CountingIndex {
            inner: CellList::new(positions.len(), config.reduced_cutoff()),
            cell_lookups: std::cell::Cell::new(0),
        };
        let mut sim = Simulation::with_index(config, positions, index).unwrap();
        sim.build_index().unwrap();
        sim
    }

    fn particles_evaluated(sim: &mut Simulation<CountingIndex>) -> (EnergyResult, usize) {
        assert_eq!(sim.index().cells_per_side(), 3);
        sim.index().cell_lookups.set(0);
        let total = sim.system_energy().unwrap();
        (total, sim.index().cell_lookups.get() / 2)
    }

    #[test]
    fn system_energy_stops_evaluating_particles_after_first_overlap() {
        let mut positions = random_fluid(50, 9.0, 61);
        positions[1] = wrap_into_box(&(positions[0] + Vector3::new(0.02, 0.0, 0.0)));

        let mut clean = counting_simulation(random_fluid(50, 9.0, 61));
        let (clean_total, clean_evaluated) = particles_evaluated(&mut clean);
        assert!(!clean_total.overlap);
        assert_eq!(clean_evaluated, 50);

        let mut clashing = counting_simulation(positions);
        let (total, evaluated) = particles_evaluated(&mut clashing);
        assert!(total.overlap);
        assert!(evaluated <= 2, "evaluated {evaluated} particles");
    }

    #[test]
    fn fcc_lattice_energy_is_negative_at_liquid_density() {
        let n = 256;
        let box_length = (n as f64 / 0.8).cbrt();
        let mut sim = indexed(config(box_length, 2.5, n), fcc_lattice(n));
        let total = sim.system_energy().unwrap();

        assert!(!total.overlap);
        assert!(total.pot / (n as f64) < -5.0);
        assert!(sim.long_range_correction().pot < 0.0);
        assert!(f64_approx_equal(sim.density(), 0.8));
    }

    #[test]
    fn independent_simulations_do_not_share_state() {
        let mut a = indexed(config(10.0, 2.5, 8), fcc_lattice(4));
        let mut b = indexed(config(10.0, 2.5, 8), fcc_lattice(4));
        a.destroy(0).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 4);
        assert!(!b.system_energy().unwrap().overlap);
    }

    #[test]
    fn full_mode_candidates_include_every_partner_within_cutoff() {
        let positions = random_fluid(100, 10.0, 47);
        let sim = indexed(config(10.0, 2.5, 100), positions);
        let enumerator = NeighborEnumerator::new(sim.index());
        let rc_sq = 0.25f64.powi(2);

        let mut out = Vec::new();
        for i in 0..sim.len() {
            enumerator.enumerate(i, sim.index().cell(i), SearchMode::Full, &mut out);
            let found: HashSet<usize> = out.iter().copied().collect();
            for j in 0..sim.len() {
                let d_sq = minimum_image(&(sim.positions()[i] - sim.positions()[j])).norm_squared();
                if j != i && d_sq < rc_sq {
                    assert!(found.contains(&j), "pair ({i}, {j}) within cutoff was missed");
                }
            }
        }
    }
}
