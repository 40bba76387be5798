use nalgebra::Point3;
use thiserror::Error;

/// Femtoseconds per picosecond.
pub const FS_PER_PS: f64 = 1000.0;

/// A single snapshot of the trajectory.
///
/// Atom `i` is the same physical atom in every frame of a trajectory, so indices into
/// `symbols` and `coords` are stable and can be stored once in a fragment mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryFrame {
    /// Element symbols in file order (e.g. "C", "N", "H").
    pub symbols: Vec<String>,
    /// Cartesian coordinates in Angstroms, parallel to `symbols`.
    pub coords: Vec<Point3<f64>>,
    /// Simulation time of this snapshot in femtoseconds.
    pub time_fs: f64,
}

impl TrajectoryFrame {
    pub fn new(symbols: Vec<String>, coords: Vec<Point3<f64>>, time_fs: f64) -> Self {
        Self {
            symbols,
            coords,
            time_fs,
        }
    }

    /// Number of atoms with both a symbol and a coordinate.
    pub fn atom_count(&self) -> usize {
        self.symbols.len().min(self.coords.len())
    }

    /// `true` when every symbol has exactly one coordinate.
    pub fn is_consistent(&self) -> bool {
        self.symbols.len() == self.coords.len()
    }

    pub fn time_ps(&self) -> f64 {
        self.time_fs / FS_PER_PS
    }

    pub fn position(&self, index: usize) -> Option<&Point3<f64>> {
        self.coords.get(index)
    }

    pub fn symbol(&self, index: usize) -> Option<&str> {
        self.symbols.get(index).map(String::as_str)
    }
}

/// A consistency problem found while checking a trajectory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrajectoryIssue {
    #[error("Trajectory contains no frames")]
    Empty,
    #[error("Frame {frame}: {symbols} symbols but {coords} coordinates")]
    LengthMismatch {
        frame: usize,
        symbols: usize,
        coords: usize,
    },
    #[error("Frame {frame}: expected {expected} atoms, found {found}")]
    AtomCountMismatch {
        frame: usize,
        expected: usize,
        found: usize,
    },
    #[error("Frame {frame}: atom {atom} changed element from '{expected}' to '{found}'")]
    SymbolMismatch {
        frame: usize,
        atom: usize,
        expected: String,
        found: String,
    },
}

/// An ordered sequence of frames read from one trajectory file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    frames: Vec<TrajectoryFrame>,
}

impl Trajectory {
    pub fn new(frames: Vec<TrajectoryFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[TrajectoryFrame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&TrajectoryFrame> {
        self.frames.get(index)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn into_frames(self) -> Vec<TrajectoryFrame> {
        self.frames
    }

    /// Checks the invariants every frame is expected to share with the first one.
    ///
    /// Problems are reported, not fixed: the analysis pass turns an inconsistent frame into
    /// a failed record instead of rejecting the whole trajectory.
    pub fn validate(&self) -> Vec<TrajectoryIssue> {
        let Some(reference) = self.frames.first() else {
            return vec![TrajectoryIssue::Empty];
        };

        let mut issues = Vec::new();
        for (index, frame) in self.frames.iter().enumerate() {
            if !frame.is_consistent() {
                issues.push(TrajectoryIssue::LengthMismatch {
                    frame: index,
                    symbols: frame.symbols.len(),
                    coords: frame.coords.len(),
                });
            }
            if frame.symbols.len() != reference.symbols.len() {
                issues.push(TrajectoryIssue::AtomCountMismatch {
                    frame: index,
                    expected: reference.symbols.len(),
                    found: frame.symbols.len(),
                });
                continue;
            }
            if let Some((atom, (expected, found))) = reference
                .symbols
                .iter()
                .zip(frame.symbols.iter())
                .enumerate()
                .find(|(_, (a, b))| a != b)
            {
                issues.push(TrajectoryIssue::SymbolMismatch {
                    frame: index,
                    atom,
                    expected: expected.clone(),
                    found: found.clone(),
                });
            }
        }
        issues
    }
}

impl From<Vec<TrajectoryFrame>> for Trajectory {
    fn from(frames: Vec<TrajectoryFrame>) -> Self {
        Self::new(frames)
    }
}
