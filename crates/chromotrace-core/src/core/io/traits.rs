use crate::core::models::frame::Trajectory;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Femtoseconds between consecutive frames when the file does not say otherwise.
pub const DEFAULT_TIMESTEP_FS: f64 = 0.5;

/// Options that control how frames are turned into a `Trajectory`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadOptions {
    /// Time between consecutive frames; frame `i` is stamped `i * timestep_fs`.
    pub timestep_fs: f64,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            timestep_fs: DEFAULT_TIMESTEP_FS,
        }
    }
}

/// Defines the interface for reading and writing trajectory file formats.
///
/// Implementors handle format-specific parsing and serialization; the provided methods add
/// file-path convenience on top of the reader/writer based ones.
pub trait TrajectoryFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads every frame from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(
        reader: &mut impl BufRead,
        options: &ReadOptions,
    ) -> Result<Trajectory, Self::Error>;

    /// Writes every frame of a trajectory to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(trajectory: &Trajectory, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a trajectory from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
        options: &ReadOptions,
    ) -> Result<Trajectory, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, options)
    }

    /// Writes a trajectory to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        trajectory: &Trajectory,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(trajectory, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
