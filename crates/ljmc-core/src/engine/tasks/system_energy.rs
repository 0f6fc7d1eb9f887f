use crate::core::forcefield::term::EnergyResult;
use crate::engine::error::EngineError;
use tracing::{debug, instrument};

/// Sums the single-particle energies of particles `0..count`.
///
/// Stops at the first overlapping particle and returns an overlapping result; the remaining
/// particles are never evaluated.
#[instrument(skip_all, name = "system_energy_task")]
pub fn accumulate<F>(count: usize, mut single: F) -> Result<EnergyResult, EngineError>
where
    F: FnMut(usize) -> Result<EnergyResult, EngineError>,
{
    let mut total = EnergyResult::default();
    for i in 0..count {
        let partial = single(i)?;
        if partial.overlap {
            debug!(particle = i, "Overlap detected; aborting system energy.");
            return Ok(EnergyResult::overlapping());
        }
        total += partial;
    }
    debug!(pot = total.pot, vir = total.vir, "System energy accumulated.");
    Ok(total)
}
