use crate::core::models::analysis::{KeyFrame, ParameterStatistics};
use crate::core::models::geometry::{GeometryParameter, GeometryRecord};
use crate::engine::config::OutlierConfig;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

pub type StatisticsTable = BTreeMap<GeometryParameter, ParameterStatistics>;

fn summarize(values: &[f64]) -> Option<ParameterStatistics> {
    if values.is_empty() {
        return None;
    }
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(ParameterStatistics {
        count,
        mean,
        std: variance.sqrt(),
        min,
        max,
        range: max - min,
    })
}

fn values_of(records: &[GeometryRecord], parameter: GeometryParameter) -> Vec<f64> {
    records.iter().filter_map(|r| r.value(parameter)).collect()
}

/// Mean, population standard deviation and extrema of every parameter over the successful
/// frames. Parameters with no successful value are absent from the table.
pub fn compute_statistics(records: &[GeometryRecord]) -> StatisticsTable {
    GeometryParameter::ALL
        .into_iter()
        .filter_map(|p| summarize(&values_of(records, p)).map(|stats| (p, stats)))
        .collect()
}

/// Frames whose z-score on any screened parameter exceeds the threshold, most extreme first.
#[instrument(skip_all, name = "outlier_detection_task")]
pub fn identify_key_frames(
    records: &[GeometryRecord],
    statistics: &StatisticsTable,
    config: &OutlierConfig,
) -> Vec<KeyFrame> {
    let mut key_frames: Vec<KeyFrame> = config
        .parameters
        .iter()
        .filter_map(|p| statistics.get(p).map(|stats| (*p, stats)))
        .filter(|(_, stats)| stats.std > 0.0)
        .flat_map(|(parameter, stats)| {
            records.iter().filter_map(move |record| {
                let value = record.value(parameter)?;
                let z = (value - stats.mean).abs() / stats.std;
                (z > config.threshold_sigma).then(|| {
                    KeyFrame::new(record.frame_index, record.time_fs, parameter, value, z)
                })
            })
        })
        .collect();

    let found = key_frames.len();
    key_frames.sort();
    key_frames.truncate(config.max_key_frames);
    debug!(found, kept = key_frames.len(), "Outlier screening complete.");
    key_frames
}
