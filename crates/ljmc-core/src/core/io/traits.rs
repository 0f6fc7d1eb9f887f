use nalgebra::Vector3;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Defines the interface for reading and writing configuration snapshot formats.
///
/// Implementors convert between physical coordinates on disk and box-unit positions in memory.
pub trait ConfigurationFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads positions from a reader and converts them to wrapped box units.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or a record is not a valid position.
    fn read_from(reader: &mut impl Read, box_length: f64)
    -> Result<Vec<Vector3<f64>>, Self::Error>;

    /// Writes box-unit positions to a writer in physical units.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(
        positions: &[Vector3<f64>],
        box_length: f64,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Reads positions from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
        box_length: f64,
    ) -> Result<Vec<Vector3<f64>>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, box_length)
    }

    /// Writes positions to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        positions: &[Vector3<f64>],
        box_length: f64,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(positions, box_length, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
