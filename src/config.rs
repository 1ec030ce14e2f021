//! Configuration for the `blindtree` tool.

use anyhow::{anyhow, Context, Result};
use blindtree_protocol::{Encoder, EncodingType};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

static CONFIG_DIR: Lazy<Option<PathBuf>> = Lazy::new(dirs::config_dir);

/// Represents the `blindtree` configuration.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// The encoding type used for new epochs.
    ///
    /// If `None`, the current default encoding type is used. Existing epochs
    /// always keep the encoding type recorded in their root metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_type: Option<EncodingType>,
}

impl Config {
    /// Reads the configuration from the given file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = fs::read_to_string(path).with_context(|| {
            format!(
                "failed to read configuration file `{path}`",
                path = path.display()
            )
        })?;

        serde_json::from_str(&config)
            .with_context(|| format!("failed to deserialize file `{path}`", path = path.display()))
    }

    /// Writes the configuration to the given file path, creating its parent
    /// directory if needed.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!(
                    "failed to create parent directory `{path}`",
                    path = parent.display()
                )
            })?;
        }

        serde_json::to_writer_pretty(
            File::create(path).with_context(|| {
                format!("failed to create file `{path}`", path = path.display())
            })?,
            self,
        )
        .with_context(|| format!("failed to serialize file `{path}`", path = path.display()))
    }

    /// Loads the configuration from the default file path.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn from_default_file() -> Result<Option<Self>> {
        let path = Self::default_config_path()?;
        if path.is_file() {
            return Ok(Some(Self::from_file(path)?));
        }

        Ok(None)
    }

    /// Gets the path to the default configuration file.
    ///
    /// The default configuration file is `$CONFIG_DIR/blindtree/config.json`.
    pub fn default_config_path() -> Result<PathBuf> {
        CONFIG_DIR
            .as_ref()
            .map(|p| p.join("blindtree/config.json"))
            .ok_or_else(|| anyhow!("failed to determine operating system configuration directory"))
    }

    /// The encoding type for new epochs.
    pub fn encoding_type(&self) -> EncodingType {
        self.encoding_type.unwrap_or_default()
    }

    /// Creates an encoder for new epochs.
    pub fn encoder(&self) -> Encoder {
        Encoder::new(self.encoding_type())
    }
}
