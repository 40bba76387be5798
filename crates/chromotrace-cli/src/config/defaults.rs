use chromotrace::core::io::traits::DEFAULT_TIMESTEP_FS;
use chromotrace::engine::config::{DEFAULT_MAX_KEY_FRAMES, DEFAULT_THRESHOLD_SIGMA};

pub struct DefaultsConfig {
    pub timestep_fs: f64,
    pub twist_method: String,
    pub reference_frame: usize,
    pub threshold_sigma: f64,
    pub max_key_frames: usize,
    pub outlier_parameters: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            timestep_fs: DEFAULT_TIMESTEP_FS,
            twist_method: "default".to_string(),
            reference_frame: 0,
            threshold_sigma: DEFAULT_THRESHOLD_SIGMA,
            max_key_frames: DEFAULT_MAX_KEY_FRAMES,
            outlier_parameters: vec![
                "twist_angle".to_string(),
                "ring_planarity".to_string(),
                "ring_acceptor_angle".to_string(),
            ],
        }
    }
}
