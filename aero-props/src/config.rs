use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::status::DEFAULT_PROTOCOL;

/// Settings of the status line codec
///
/// ```toml
/// protocol = "HTTP/1.1"
///
/// [reasons]
/// "207" = "Multi-Status"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CodecConfig {
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Reason phrases keyed by their 3-digit code,
    /// used before the standard HTTP table
    #[serde(default)]
    pub reasons: HashMap<String, String>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            reasons: HashMap::new(),
        }
    }
}

pub fn read_config(config_file: PathBuf) -> Result<CodecConfig> {
    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .open(config_file.as_path())?;

    let mut config = String::new();
    file.read_to_string(&mut config)?;

    Ok(toml::from_str(&config)?)
}

fn default_protocol() -> String {
    DEFAULT_PROTOCOL.into()
}
