use super::{read_trajectory, select_frame};
use crate::cli::DiagnoseArgs;
use crate::config::builder::{load_mapping, resolve_bond_thresholds};
use crate::error::Result;
use chromotrace::core::io::traits::ReadOptions;
use chromotrace::workflows;
use chromotrace::workflows::diagnose::TwistDiagnostics;
use std::fmt::Write;

pub fn run(args: DiagnoseArgs) -> Result<()> {
    let trajectory = read_trajectory(&args.input, &ReadOptions::default())?;
    let frame = select_frame(&trajectory, args.frame)?;

    let mapping = match &args.mapping {
        Some(path) => load_mapping(path)?,
        None => {
            let thresholds = resolve_bond_thresholds(args.bonds.as_deref(), None)?;
            workflows::detect::run(frame, &thresholds)?
        }
    };

    let diagnostics = workflows::diagnose::run(frame, &mapping)?;
    print!("{}", format_diagnostics(args.frame, &diagnostics));
    Ok(())
}

pub fn format_diagnostics(frame: usize, diagnostics: &TwistDiagnostics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Twist diagnostics for frame {}", frame);
    for (method, angle) in &diagnostics.twist_angles {
        let _ = writeln!(out, "  {:<10}{:>10.4}°", method.token(), angle);
    }
    let _ = writeln!(out, "  spread    {:>10.4}°", diagnostics.spread());

    let n = &diagnostics.ring_normal;
    let v = &diagnostics.substituent_vector;
    let _ = writeln!(out, "  ring normal        ({:.4}, {:.4}, {:.4})", n.x, n.y, n.z);
    let _ = writeln!(out, "  substituent vector ({:.4}, {:.4}, {:.4})", v.x, v.y, v.z);
    let _ = writeln!(out, "  ring planarity     {:.4} Å", diagnostics.ring_planarity);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::write_planar_trajectory;

    #[test]
    fn planar_frame_is_diagnosed_with_auto_detection() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_planar_trajectory(dir.path(), 2);
        run(DiagnoseArgs {
            input,
            frame: 1,
            mapping: None,
            bonds: None,
        })
        .unwrap();
    }

    #[test]
    fn report_lists_every_method() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_planar_trajectory(dir.path(), 1);
        let trajectory = read_trajectory(&input, &ReadOptions::default()).unwrap();
        let frame = select_frame(&trajectory, 0).unwrap();
        let mapping =
            workflows::detect::run(frame, &resolve_bond_thresholds(None, None).unwrap()).unwrap();
        let diagnostics = workflows::diagnose::run(frame, &mapping).unwrap();

        let report = format_diagnostics(0, &diagnostics);
        for token in ["default", "dihedral", "plane"] {
            assert!(report.contains(token), "missing {token}");
        }
        assert!(report.contains("spread"));
    }
}
