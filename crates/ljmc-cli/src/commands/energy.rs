use crate::cli::EnergyArgs;
use crate::config::{PartialRunConfig, RunSettings};
use crate::error::{CliError, Result};
use ljmc::{
    core::io::{snapshot::CsvFile, traits::ConfigurationFile},
    core::models::lattice::fcc_lattice,
    workflows::{self, evaluate::EnergyReport},
};
use nalgebra::Vector3;
use tracing::{info, warn};

pub fn run(args: EnergyArgs) -> Result<()> {
    let partial_config = PartialRunConfig::from_file(&args.config)?;
    info!("Merging configuration from file and CLI arguments...");
    let settings = partial_config.merge_with_cli(&args)?;

    let positions = load_positions(&args, &settings)?;
    let config = settings.simulation_config(positions.len())?;

    info!("Invoking the energy evaluation workflow...");
    let report = workflows::evaluate::run(positions, &config, settings.temperature)?;
    if report.energy.overlap {
        warn!("Evaluated configuration contains overlapping particles.");
    }

    print!("{}", format_report(&report));
    Ok(())
}

fn load_positions(args: &EnergyArgs, settings: &RunSettings) -> Result<Vec<Vector3<f64>>> {
    match (&args.input, settings.lattice_particles) {
        (Some(path), _) => {
            info!("Loading snapshot from {:?}", path);
            CsvFile::read_from_path(path, settings.box_length).map_err(|e| {
                CliError::FileParsing {
                    path: path.clone(),
                    source: e.into(),
                }
            })
        }
        (None, Some(n)) => {
            info!(n, "No snapshot given, generating an FCC lattice.");
            Ok(fcc_lattice(n))
        }
        (None, None) => Err(CliError::Argument(
            "Either --input or `lattice.particles` is required.".to_string(),
        )),
    }
}

fn format_report(report: &EnergyReport) -> String {
    let na = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{:.6}", v));
    let energy = if report.energy.overlap {
        "Overlap              yes\n".to_string()
    } else {
        format!(
            "Potential (cut)      {:.6}\nVirial (cut)         {:.6}\n",
            report.energy.pot, report.energy.vir
        )
    };

    format!(
        "Particles            {}\n\
         Box length           {:.6}\n\
         Cutoff               {:.6}\n\
         Density              {:.6}\n\
         Cells per side       {}\n\
         {}\
         LRC potential        {:.6}\n\
         LRC virial           {:.6}\n\
         Potential/particle   {}\n\
         Virial pressure      {}\n\
         Pressure             {}\n\
         Pressure delta       {:.6}\n",
        report.n_particles,
        report.box_length,
        report.cutoff_radius,
        report.density,
        report.cells_per_side,
        energy,
        report.long_range.pot,
        report.long_range.vir,
        na(report.potential_per_particle()),
        na(report.virial_pressure()),
        na(report.pressure()),
        report.pressure_delta,
    )
}
