use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;

use crate::error::SettingsError;

pub const DEFAULT_HELLO_THRESHOLD: usize = 50;
pub const DEFAULT_PARAMETERS_THRESHOLD: usize = 150;
pub const DEFAULT_LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z %Z";
pub const DEFAULT_MINIMUM_APM: f32 = 30.0;
pub const DEFAULT_CPU_PLAYER_TYPE: u8 = 1;
pub const DEFAULT_STARTING_STOCKS: u8 = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineSettings {
    pub hello_threshold: usize,
    pub parameters_threshold: usize,
    pub log_timestamp_format: String,
    pub minimum_apm: f32,
    pub cpu_player_type: u8,
    pub starting_stocks: u8,
    /// Section whose sets are best-of-5. Every other section plays best-of-3.
    pub best_of_five_section_id: Option<i64>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            hello_threshold: DEFAULT_HELLO_THRESHOLD,
            parameters_threshold: DEFAULT_PARAMETERS_THRESHOLD,
            log_timestamp_format: DEFAULT_LOG_TIMESTAMP_FORMAT.to_string(),
            minimum_apm: DEFAULT_MINIMUM_APM,
            cpu_player_type: DEFAULT_CPU_PLAYER_TYPE,
            starting_stocks: DEFAULT_STARTING_STOCKS,
            best_of_five_section_id: None,
        }
    }
}

impl PipelineSettings {
    pub fn with_best_of_five_section(mut self, section_id: i64) -> Self {
        self.best_of_five_section_id = Some(section_id);
        self
    }

    pub fn required_wins(&self, section_id: i64) -> u32 {
        if self.best_of_five_section_id == Some(section_id) {
            3
        } else {
            2
        }
    }
}

/// Reads settings from a JSON file. A missing file yields the defaults.
pub fn read_settings(path: &Path) -> Result<PipelineSettings, SettingsError> {
    let raw_json = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::info!(
                settings_path = %path.display(),
                "Settings file not found, using defaults"
            );
            return Ok(PipelineSettings::default());
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str::<PipelineSettings>(&raw_json).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
