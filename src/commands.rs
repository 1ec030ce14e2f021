//! Commands for the `blindtree` tool.

use crate::Config;
use anyhow::Result;
use clap::Args;
use std::{path::PathBuf, str::FromStr};

mod config;
mod encode;
mod hash_meta;
mod secret;

pub use self::config::*;
pub use self::encode::*;
pub use self::hash_meta::*;
pub use self::secret::*;

/// Common options for commands.
#[derive(Args)]
pub struct CommonOptions {
    /// The path to the configuration file to use.
    ///
    /// If not specified, the default of `$CONFIG_DIR/blindtree/config.json` is used.
    #[clap(long, value_name = "CONFIG", env = "BLINDTREE_CONFIG")]
    pub config: Option<PathBuf>,
}

impl CommonOptions {
    /// Reads the configuration, falling back to defaults when there is no
    /// configuration file.
    pub fn read_config(&self) -> Result<Config> {
        Ok(self
            .config
            .as_ref()
            .map_or_else(Config::from_default_file, |p| {
                Config::from_file(p).map(Some)
            })?
            .unwrap_or_default())
    }

    /// Gets the path of the configuration file in use.
    pub fn config_path(&self) -> Result<PathBuf> {
        self.config
            .clone()
            .map(Ok)
            .unwrap_or_else(Config::default_config_path)
    }
}

/// A byte string given on the command line in hex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl FromStr for HexBytes {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s).map(Self)
    }
}
