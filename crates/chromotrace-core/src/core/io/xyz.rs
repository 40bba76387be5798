use super::traits::{ReadOptions, TrajectoryFile};
use crate::core::models::frame::{Trajectory, TrajectoryFrame};
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, warn};

// Upper bound on the per-frame pre-allocation; the count line is untrusted input.
const MAX_PRESIZED_ATOMS: usize = 4096;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("File contains no frames")]
    NoFrames,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum XyzParseErrorKind {
    #[error("Frame {frame} ends after {found} of {expected} atom lines")]
    TruncatedFrame {
        frame: usize,
        expected: usize,
        found: usize,
    },
    #[error("Frame {frame} is missing its comment line")]
    MissingComment { frame: usize },
    #[error("Atom line needs a symbol and three coordinates")]
    MissingField,
    #[error("Invalid coordinate '{value}'")]
    InvalidFloat { value: String },
}

/// Multi-frame XYZ: an atom-count line, a comment line, then one `symbol x y z` line per
/// atom, repeated for every frame.
pub struct XyzFile;

struct NumberedLines<R> {
    lines: io::Lines<R>,
    number: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn next_line(&mut self) -> Result<Option<(usize, String)>, io::Error> {
        match self.lines.next() {
            Some(line) => {
                self.number += 1;
                Ok(Some((self.number, line?)))
            }
            None => Ok(None),
        }
    }
}

fn parse_atom_line(line_num: usize, line: &str) -> Result<(String, Point3<f64>), XyzError> {
    let mut fields = line.split_whitespace();
    let parse_error = |kind| XyzError::Parse {
        line: line_num,
        kind,
    };

    let symbol = fields
        .next()
        .ok_or_else(|| parse_error(XyzParseErrorKind::MissingField))?;
    let mut xyz = [0.0; 3];
    for value in &mut xyz {
        let field = fields
            .next()
            .ok_or_else(|| parse_error(XyzParseErrorKind::MissingField))?;
        *value = field.parse().map_err(|_| {
            parse_error(XyzParseErrorKind::InvalidFloat {
                value: field.to_string(),
            })
        })?;
    }
    Ok((normalize_symbol(symbol), Point3::from(xyz)))
}

/// "c", "CL" and "Cl" all become the conventional capitalization.
fn normalize_symbol(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

impl TrajectoryFile for XyzFile {
    type Error = XyzError;

    fn read_from(
        reader: &mut impl BufRead,
        options: &ReadOptions,
    ) -> Result<Trajectory, Self::Error> {
        let mut lines = NumberedLines {
            lines: reader.lines(),
            number: 0,
        };
        let mut frames = Vec::new();

        while let Some((line_num, count_line)) = lines.next_line()? {
            let count_text = count_line.trim();
            if count_text.is_empty() {
                continue;
            }
            let Ok(atom_count) = count_text.parse::<usize>() else {
                warn!(
                    line = line_num,
                    "Stopping at non-numeric atom-count line; remaining content ignored."
                );
                break;
            };

            let frame_index = frames.len();
            if lines.next_line()?.is_none() {
                return Err(XyzError::Parse {
                    line: line_num + 1,
                    kind: XyzParseErrorKind::MissingComment { frame: frame_index },
                });
            }

            let presized = atom_count.min(MAX_PRESIZED_ATOMS);
            let mut symbols = Vec::with_capacity(presized);
            let mut coords = Vec::with_capacity(presized);
            for found in 0..atom_count {
                let Some((atom_line_num, atom_line)) = lines.next_line()? else {
                    return Err(XyzError::Parse {
                        line: lines.number,
                        kind: XyzParseErrorKind::TruncatedFrame {
                            frame: frame_index,
                            expected: atom_count,
                            found,
                        },
                    });
                };
                let (symbol, position) = parse_atom_line(atom_line_num, &atom_line)?;
                symbols.push(symbol);
                coords.push(position);
            }

            let time_fs = frame_index as f64 * options.timestep_fs;
            frames.push(TrajectoryFrame::new(symbols, coords, time_fs));
        }

        if frames.is_empty() {
            return Err(XyzError::NoFrames);
        }
        debug!(frames = frames.len(), "Read XYZ trajectory.");
        Ok(Trajectory::new(frames))
    }

    fn write_to(trajectory: &Trajectory, writer: &mut impl Write) -> Result<(), Self::Error> {
        for (index, frame) in trajectory.frames().iter().enumerate() {
            writeln!(writer, "{}", frame.atom_count())?;
            writeln!(writer, "frame={} time_fs={:.2}", index, frame.time_fs)?;
            for (symbol, p) in frame.symbols.iter().zip(frame.coords.iter()) {
                writeln!(
                    writer,
                    "{:<2} {:>14.8} {:>14.8} {:>14.8}",
                    symbol, p.x, p.y, p.z
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TWO_FRAMES: &str = "\
3
first frame
C 0.0 0.0 0.0
n 1.4 0.0 0.0
H -1.0 0.0 0.0
3
second frame
C 0.1 0.0 0.0
N 1.5 0.0 0.0
H -0.9 0.0 0.0
";

    fn read(text: &str) -> Result<Trajectory, XyzError> {
        XyzFile::read_from(&mut Cursor::new(text), &ReadOptions::default())
    }

    #[test]
    fn reads_frames_with_symbols_coordinates_and_times() {
        let trajectory = read(TWO_FRAMES).unwrap();
        assert_eq!(trajectory.len(), 2);

        let second = trajectory.frame(1).unwrap();
        assert_eq!(second.symbols, vec!["C", "N", "H"]);
        assert_eq!(second.coords[1], Point3::new(1.5, 0.0, 0.0));
        assert_eq!(second.time_fs, 0.5);
    }

    #[test]
    fn symbols_are_normalized() {
        let trajectory = read(TWO_FRAMES).unwrap();
        assert_eq!(trajectory.frame(0).unwrap().symbols[1], "N");
        assert_eq!(normalize_symbol("CL"), "Cl");
    }

    #[test]
    fn custom_timestep_is_applied() {
        let options = ReadOptions { timestep_fs: 2.0 };
        let trajectory = XyzFile::read_from(&mut Cursor::new(TWO_FRAMES), &options).unwrap();
        assert_eq!(trajectory.frame(1).unwrap().time_fs, 2.0);
    }

    #[test]
    fn trailing_blank_lines_and_garbage_are_ignored() {
        let text = format!("{}\n\nEND\n", TWO_FRAMES);
        assert_eq!(read(&text).unwrap().len(), 2);
    }

    #[test]
    fn truncated_frame_is_an_error() {
        let text = "3\ncomment\nC 0 0 0\nN 1 0 0\n";
        let err = read(text).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                kind: XyzParseErrorKind::TruncatedFrame {
                    frame: 0,
                    expected: 3,
                    found: 2
                },
                ..
            }
        ));
    }

    #[test]
    fn huge_atom_count_is_a_truncation_error_not_an_allocation() {
        let text = "1000000000000000000\ncomment\nC 0 0 0\n";
        let err = read(text).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Parse {
                line: 3,
                kind: XyzParseErrorKind::TruncatedFrame {
                    frame: 0,
                    expected: 1_000_000_000_000_000_000,
                    found: 1
                },
            }
        ));
    }

    #[test]
    fn invalid_coordinate_reports_line_number() {
        let text = "2\ncomment\nC 0 0 0\nN 1 abc 0\n";
        let err = read(text).unwrap_err();
        match err {
            XyzError::Parse { line, kind } => {
                assert_eq!(line, 4);
                assert_eq!(
                    kind,
                    XyzParseErrorKind::InvalidFloat {
                        value: "abc".to_string()
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_has_no_frames() {
        assert!(matches!(read("\n\n"), Err(XyzError::NoFrames)));
    }

    #[test]
    fn written_trajectory_reads_back() {
        let trajectory = read(TWO_FRAMES).unwrap();
        let mut buffer = Vec::new();
        XyzFile::write_to(&trajectory, &mut buffer).unwrap();

        let reread = read(std::str::from_utf8(&buffer).unwrap()).unwrap();
        assert_eq!(reread.len(), 2);
        assert_eq!(reread.frame(0).unwrap().symbols, vec!["C", "N", "H"]);
        let delta = reread.frame(1).unwrap().coords[2] - Point3::new(-0.9, 0.0, 0.0);
        assert!(delta.norm() < 1e-8);
    }

    #[test]
    fn path_helpers_round_trip_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traj.xyz");
        let trajectory = read(TWO_FRAMES).unwrap();
        XyzFile::write_to_path(&trajectory, &path).unwrap();
        let reread = XyzFile::read_from_path(&path, &ReadOptions::default()).unwrap();
        assert_eq!(reread.len(), trajectory.len());
    }
}
