use crate::core::forcefield::potentials::{POT_PREFACTOR, VIR_PREFACTOR, lennard_jones_12_6_terms};
use crate::core::forcefield::term::EnergyResult;
use crate::core::utils::geometry::minimum_image;
use nalgebra::Vector3;

/// Truncated, minimum-image Lennard-Jones energy of one position against a candidate list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairKernel {
    box_length_sq: f64,
    reduced_cutoff_sq: f64,
}

impl PairKernel {
    pub fn new(box_length: f64, cutoff_radius: f64) -> Self {
        Self {
            box_length_sq: box_length * box_length,
            reduced_cutoff_sq: (cutoff_radius / box_length).powi(2),
        }
    }

    /// Sums the pair terms of `position` with every candidate `j != particle`.
    ///
    /// Stops at the first overlapping pair and returns the partial sums with `overlap` set.
    pub fn evaluate(
        &self,
        position: &Vector3<f64>,
        particle: usize,
        candidates: &[usize],
        positions: &[Vector3<f64>],
    ) -> EnergyResult {
        let mut pot = 0.0;
        let mut vir = 0.0;

        for &j in candidates {
            if j == particle {
                continue;
            }
            let d = minimum_image(&(position - positions[j]));
            let d_sq = d.norm_squared();
            if d_sq >= self.reduced_cutoff_sq {
                continue;
            }
            match lennard_jones_12_6_terms(d_sq * self.box_length_sq) {
                Some((pot_term, vir_term)) => {
                    pot += pot_term;
                    vir += vir_term;
                }
                None => {
                    return EnergyResult {
                        pot,
                        vir,
                        overlap: true,
                    };
                }
            }
        }

        EnergyResult::new(POT_PREFACTOR * pot, VIR_PREFACTOR * vir)
    }
}
