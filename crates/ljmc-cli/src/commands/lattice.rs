use crate::cli::LatticeArgs;
use crate::error::{CliError, Result};
use ljmc::core::io::{snapshot::CsvFile, traits::ConfigurationFile};
use ljmc::core::models::lattice::fcc_lattice;
use tracing::info;

pub fn run(args: LatticeArgs) -> Result<()> {
    if args.particles == 0 {
        return Err(CliError::Argument(
            "--particles must be at least 1.".to_string(),
        ));
    }
    if !(args.box_length.is_finite() && args.box_length > 0.0) {
        return Err(CliError::Argument(format!(
            "--box-length must be positive, got {}",
            args.box_length
        )));
    }

    let positions = fcc_lattice(args.particles);
    info!(
        n = positions.len(),
        density = positions.len() as f64 / args.box_length.powi(3),
        "Writing FCC lattice to {:?}",
        &args.output
    );
    CsvFile::write_to_path(&positions, args.box_length, &args.output)?;
    println!(
        "Wrote {} particles to {}",
        positions.len(),
        args.output.display()
    );
    Ok(())
}
