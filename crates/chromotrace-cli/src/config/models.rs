use chromotrace::core::io::traits::ReadOptions;
use chromotrace::engine::config as core_config;
use std::path::PathBuf;

pub struct AppConfig {
    pub input_path: PathBuf,
    pub json_output: Option<PathBuf>,
    pub csv_output: Option<PathBuf>,
    pub read_options: ReadOptions,
    pub core_config: core_config::AnalysisConfig,
}
