use chromotrace::core::io::export::ExportError;
use chromotrace::core::io::xyz::XyzError;
use chromotrace::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Cannot read trajectory '{path}': {source}", path = path.display())]
    Trajectory {
        path: PathBuf,
        #[source]
        source: XyzError,
    },

    /// A TOML file (configuration or fragment mapping) that does not parse.
    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Failed to write results: {0}")]
    Export(#[from] ExportError),

    #[error("Failed to render fragment mapping: {0}")]
    MappingRender(#[from] toml::ser::Error),

    #[error("Failed to install logger: {0}")]
    Logging(String),

    #[error("Failed to configure worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
