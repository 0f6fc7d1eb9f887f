use super::traits::ConfigurationFile;
use crate::core::utils::geometry::{to_box_units, to_physical_units, wrap_into_box};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid record on row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
    #[error("Box length must be positive and finite, got {0}")]
    InvalidBoxLength(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct PositionRecord {
    x: f64,
    y: f64,
    z: f64,
}

fn check_box_length(box_length: f64) -> Result<(), SnapshotError> {
    if box_length.is_finite() && box_length > 0.0 {
        Ok(())
    } else {
        Err(SnapshotError::InvalidBoxLength(box_length))
    }
}

/// Snapshot stored as CSV with an `x,y,z` header and one particle per row.
pub struct CsvFile;

impl ConfigurationFile for CsvFile {
    type Error = SnapshotError;

    fn read_from(
        reader: &mut impl Read,
        box_length: f64,
    ) -> Result<Vec<Vector3<f64>>, Self::Error> {
        check_box_length(box_length)?;
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut positions = Vec::new();
        for (row, record) in csv_reader.deserialize::<PositionRecord>().enumerate() {
            let record = record?;
            let r = Vector3::new(record.x, record.y, record.z);
            if !r.iter().all(|c| c.is_finite()) {
                return Err(SnapshotError::InvalidRecord {
                    row: row + 1,
                    reason: "coordinates must be finite".to_string(),
                });
            }
            positions.push(wrap_into_box(&to_box_units(&r, box_length)));
        }
        Ok(positions)
    }

    fn write_to(
        positions: &[Vector3<f64>],
        box_length: f64,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        check_box_length(box_length)?;
        let mut csv_writer = csv::Writer::from_writer(writer);
        for r in positions {
            let physical = to_physical_units(r, box_length);
            csv_writer.serialize(PositionRecord {
                x: physical.x,
                y: physical.y,
                z: physical.z,
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
