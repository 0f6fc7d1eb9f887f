use std::f64::consts::PI;

/// Largest `1/r²` accepted before a pair is treated as a hard-core overlap (r ≈ 0.745σ).
pub const OVERLAP_INV_SQ: f64 = 1.8;

/// Energy prefactor 4ε.
pub const POT_PREFACTOR: f64 = 4.0;

/// Virial prefactor 24ε/3.
pub const VIR_PREFACTOR: f64 = 24.0 / 3.0;

/// Unscaled 12-6 pair terms `(sr12 - sr6, 2 sr12 - sr6)` for a squared separation in σ units.
///
/// Returns `None` for an overlapping pair so that `sr12` is never evaluated for near-coincident
/// particles.
#[inline]
pub fn lennard_jones_12_6_terms(r_sq: f64) -> Option<(f64, f64)> {
    let inv_sq = 1.0 / r_sq;
    if inv_sq > OVERLAP_INV_SQ {
        return None;
    }
    let sr6 = inv_sq * inv_sq * inv_sq;
    let sr12 = sr6 * sr6;
    Some((sr12 - sr6, 2.0 * sr12 - sr6))
}

/// Analytic tail corrections for the potential truncated at `cutoff`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LongRangeCorrection {
    pub pot: f64,
    pub vir: f64,
}

/// Tail corrections to the total potential energy and virial of `n` particles in a cubic box.
///
/// Assumes a uniform pair distribution beyond the cutoff.
pub fn long_range_correction(n: usize, box_length: f64, cutoff: f64) -> LongRangeCorrection {
    let sr3 = (1.0 / cutoff).powi(3);
    let n = n as f64;
    let density = n / box_length.powi(3);
    let scale = PI * density * n;
    LongRangeCorrection {
        pot: scale * ((8.0 / 9.0) * sr3.powi(3) - (8.0 / 3.0) * sr3),
        vir: scale * ((32.0 / 9.0) * sr3.powi(3) - (32.0 / 6.0) * sr3),
    }
}

/// Impulsive pressure correction for the discontinuity of the cut (unshifted) potential.
pub fn pressure_delta(density: f64, cutoff: f64) -> f64 {
    let sr3 = (1.0 / cutoff).powi(3);
    PI * (8.0 / 3.0) * (sr3.powi(3) - sr3) * density.powi(2)
}
