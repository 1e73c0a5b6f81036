use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::player::Players;
use crate::error::ConfigError;

/// Game configuration.
///
/// Every field has a default, so `{}` is a valid JSON config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_white_name")]
    pub white_name: String,

    #[serde(default = "default_black_name")]
    pub black_name: String,
}

fn default_white_name() -> String {
    "Player 1".to_string()
}

fn default_black_name() -> String {
    "Player 2".to_string()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            white_name: default_white_name(),
            black_name: default_black_name(),
        }
    }
}

impl GameConfig {
    pub fn with_white_name(mut self, name: impl Into<String>) -> Self {
        self.white_name = name.into();
        self
    }

    pub fn with_black_name(mut self, name: impl Into<String>) -> Self {
        self.black_name = name.into();
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn players(&self) -> Players {
        Players::new(self.white_name.clone(), self.black_name.clone())
    }
}
