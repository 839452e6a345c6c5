use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pointseries_core::pipeline::Preset;

use super::PresetArg;

#[derive(Args)]
pub struct ConfigArgs {
    /// Preset to generate the config for
    #[arg(long, value_enum, default_value = "sentinel2-lai")]
    pub preset: PresetArg,

    /// Collection manifest path to put in the config
    #[arg(long, default_value = "collection/manifest.toml")]
    pub collection: PathBuf,

    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save a preset's default PipelineConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = Preset::from(args.preset).default_config(args.collection.clone());
    let toml_str = toml::to_string_pretty(&config)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
