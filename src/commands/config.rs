use super::CommonOptions;
use anyhow::Result;
use blindtree_protocol::EncodingType;
use clap::Args;

/// Shows or updates the `blindtree` configuration file.
#[derive(Args)]
pub struct ConfigCommand {
    /// The common command options.
    #[clap(flatten)]
    pub common: CommonOptions,

    /// Sets the encoding type for new epochs, by tag or name.
    #[clap(long, value_name = "ENCODING")]
    pub encoding: Option<EncodingType>,
}

impl ConfigCommand {
    /// Executes the command.
    pub fn exec(self) -> Result<()> {
        let path = self.common.config_path()?;
        let mut config = self.common.read_config()?;

        if let Some(encoding_type) = self.encoding {
            config.encoding_type = Some(encoding_type);
            config.write_to_file(&path)?;
            println!(
                "updated blindtree configuration file `{path}`",
                path = path.display()
            );
        }

        println!("encoding type: {}", config.encoding_type());
        Ok(())
    }
}
