use anyhow::Result;
use blindtree_cli::commands::{ConfigCommand, EncodeCommand, HashMetaCommand, SecretCommand};
use clap::Parser;
use std::process::exit;
use tracing_subscriber::EnvFilter;

fn version() -> &'static str {
    option_env!("CARGO_VERSION_INFO").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Blinds log leaves and hashes tree root metadata.
#[derive(Parser)]
#[clap(
    bin_name = "blindtree",
    version,
    propagate_version = true,
    arg_required_else_help = true
)]
#[command(version = version())]
enum BlindtreeCli {
    Config(ConfigCommand),
    Secret(SecretCommand),
    Encode(EncodeCommand),
    HashMeta(HashMetaCommand),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = match BlindtreeCli::parse() {
        BlindtreeCli::Config(cmd) => cmd.exec(),
        BlindtreeCli::Secret(cmd) => cmd.exec(),
        BlindtreeCli::Encode(cmd) => cmd.exec(),
        BlindtreeCli::HashMeta(cmd) => cmd.exec(),
    } {
        eprintln!("error: {e:?}");
        exit(1);
    }

    Ok(())
}
