use super::{read_trajectory, select_frame};
use crate::cli::DetectArgs;
use crate::config::builder::resolve_bond_thresholds;
use crate::error::Result;
use chromotrace::core::io::traits::ReadOptions;
use chromotrace::workflows;
use tracing::info;

pub fn run(args: DetectArgs) -> Result<()> {
    let trajectory = read_trajectory(&args.input, &ReadOptions::default())?;
    let frame = select_frame(&trajectory, args.frame)?;
    let thresholds = resolve_bond_thresholds(args.bonds.as_deref(), None)?;

    let mapping = workflows::detect::run(frame, &thresholds)?;
    let rendered = toml::to_string_pretty(&mapping)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            info!("Wrote fragment mapping to {:?}", path);
            println!("✓ Fragment mapping written to: {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
