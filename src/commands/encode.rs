use super::{CommonOptions, HexBytes};
use anyhow::{bail, Context, Result};
use blindtree_protocol::{
    Chain17V1Leaf, Encoder, EncodingType, Key, Leaf, LinkId, Secret, Seqno, TeamId,
};
use clap::Args;

/// Computes the blinded tree value of a chain link leaf.
#[derive(Args)]
pub struct EncodeCommand {
    /// The common command options.
    #[clap(flatten)]
    pub common: CommonOptions,

    /// The 16-byte team identifier, in hex.
    #[clap(long, value_name = "HEX")]
    pub team_id: HexBytes,

    /// The signature identifier, in hex.
    #[clap(long, value_name = "HEX")]
    pub sig_id: HexBytes,

    /// The 32-byte link identifier, in hex.
    #[clap(long, value_name = "HEX")]
    pub link_id: HexBytes,

    /// The position of the link in its chain.
    #[clap(long, value_name = "SEQNO", allow_negative_numbers = true)]
    pub seqno: Seqno,

    /// The tree key the leaf is stored under, in hex.
    #[clap(long, value_name = "HEX")]
    pub key: HexBytes,

    /// The epoch secret, in hex.
    #[clap(long, value_name = "HEX")]
    pub secret: HexBytes,

    /// The encoding type to blind with, by tag or name.
    #[clap(long, value_name = "ENCODING")]
    pub encoding: Option<EncodingType>,

    /// Also print the blinded preimage as JSON.
    #[clap(long)]
    pub preimage: bool,
}

impl EncodeCommand {
    /// Executes the command.
    pub fn exec(self) -> Result<()> {
        let encoder = match self.encoding {
            Some(encoding_type) => Encoder::new(encoding_type),
            None => self.common.read_config()?.encoder(),
        };

        let expected = encoder.encoding_type().secret_len();
        if self.secret.0.len() != expected {
            bail!(
                "secret must be {expected} bytes for {encoding_type}, got {len}",
                encoding_type = encoder.encoding_type(),
                len = self.secret.0.len()
            );
        }

        let team_id: [u8; 16] = self
            .team_id
            .0
            .try_into()
            .map_err(|id: Vec<u8>| anyhow::anyhow!("team id must be 16 bytes, got {}", id.len()))?;
        let link_id: [u8; 32] = self
            .link_id
            .0
            .try_into()
            .map_err(|id: Vec<u8>| anyhow::anyhow!("link id must be 32 bytes, got {}", id.len()))?;

        let leaf = Leaf::from(Chain17V1Leaf {
            team_id: TeamId(team_id),
            sig_id: self.sig_id.0,
            link_id: LinkId(link_id),
            seqno: self.seqno,
        });
        let key = Key::from(self.key.0);
        let secret = Secret::new(self.secret.0);

        tracing::debug!(
            encoding_type = %encoder.encoding_type(),
            key = %key,
            "encoding leaf"
        );

        let preimage = encoder
            .derive_blinded_entropy(&leaf, &key, &secret)
            .context("failed to blind leaf")?;
        let value = encoder.hash(&preimage).context("failed to hash leaf")?;

        println!("{}", hex::encode(value));
        if self.preimage {
            println!("{}", serde_json::to_string_pretty(&preimage)?);
        }
        Ok(())
    }
}
