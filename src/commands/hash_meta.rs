use anyhow::{Context, Result};
use blindtree_protocol::RootMetadata;
use clap::Args;
use std::{fs, path::PathBuf};

/// Prints the canonical bytes and `HashMeta` of a root metadata document.
#[derive(Args)]
pub struct HashMetaCommand {
    /// The path to a JSON root metadata document.
    #[clap(value_name = "FILE")]
    pub path: PathBuf,
}

impl HashMetaCommand {
    /// Executes the command.
    pub fn exec(self) -> Result<()> {
        let contents = fs::read_to_string(&self.path).with_context(|| {
            format!(
                "failed to read root metadata `{path}`",
                path = self.path.display()
            )
        })?;
        let metadata: RootMetadata = serde_json::from_str(&contents).with_context(|| {
            format!(
                "failed to deserialize root metadata `{path}`",
                path = self.path.display()
            )
        })?;

        tracing::debug!(
            seqno = metadata.seqno(),
            encoding_type = %metadata.encoding_type(),
            skips = metadata.skips().len(),
            "hashing root metadata"
        );

        let (bytes, hash) = metadata.canonicalize_and_hash()?;
        println!("canonical: {}", hex::encode(bytes));
        println!("hash_meta: {}", hex::encode(hash.bytes()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blindtree_protocol::{EncodingType, Skips};
    use std::fs::File;

    #[test]
    fn test_exec_hashes_metadata_file() {
        let mut skips = Skips::new();
        skips.insert(1, [0x22u8; 32]);
        let metadata = RootMetadata::new(EncodingType::CURRENT, 2, skips, vec![0x33; 32]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        serde_json::to_writer(File::create(&path).unwrap(), &metadata).unwrap();

        HashMetaCommand { path }.exec().unwrap();
    }

    #[test]
    fn test_exec_rejects_invalid_metadata() {
        let dir = tempfile::tempdir().unwrap();

        let missing = HashMetaCommand {
            path: dir.path().join("missing.json"),
        };
        let err = missing.exec().unwrap_err();
        assert!(err.to_string().starts_with("failed to read root metadata"));

        // Seqno 3 with no skip to epoch 2.
        let path = dir.path().join("metadata.json");
        fs::write(
            &path,
            r#"{"encodingType": 2, "seqno": 3, "skips": {}, "rootHash": ""}"#,
        )
        .unwrap();
        let err = HashMetaCommand { path }.exec().unwrap_err();
        assert!(err.to_string().starts_with("failed to deserialize root metadata"));
    }
}
