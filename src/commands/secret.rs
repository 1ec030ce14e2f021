use super::CommonOptions;
use anyhow::Result;
use blindtree_protocol::{Encoder, EncodingType};
use clap::Args;

/// Generates a fresh epoch secret.
#[derive(Args)]
pub struct SecretCommand {
    /// The common command options.
    #[clap(flatten)]
    pub common: CommonOptions,

    /// The encoding type the secret is for, by tag or name.
    #[clap(long, value_name = "ENCODING")]
    pub encoding: Option<EncodingType>,
}

impl SecretCommand {
    /// Executes the command.
    pub fn exec(self) -> Result<()> {
        let encoder = match self.encoding {
            Some(encoding_type) => Encoder::new(encoding_type),
            None => self.common.read_config()?.encoder(),
        };

        let secret = encoder.generate_secret()?;
        println!("{}", hex::encode(secret.expose()));
        Ok(())
    }
}
