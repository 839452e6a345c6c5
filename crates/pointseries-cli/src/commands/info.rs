use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pointseries_core::catalog::{ImageCollection, ManifestCollection};

#[derive(Args)]
pub struct InfoArgs {
    /// Collection manifest (TOML)
    pub manifest: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let collection = ManifestCollection::open(&args.manifest)
        .with_context(|| format!("Failed to open collection {}", args.manifest.display()))?;
    let records = collection.records();

    println!("Manifest:    {}", args.manifest.display());
    println!("Collection:  {}", collection.name());
    println!("Resolution:  {}", collection.temporal_resolution());
    println!("Bands:       {}", collection.band_names().join(", "));
    println!("Images:      {}", records.len());

    let first = records.iter().map(|r| r.time_start).min();
    let last = records.iter().map(|r| r.time_start).max();
    if let (Some(first), Some(last)) = (first, last) {
        println!("First:       {}", first);
        println!("Last:        {}", last);
    }

    let mut properties: Vec<&str> = records
        .iter()
        .flat_map(|r| r.properties.keys().map(String::as_str))
        .collect();
    properties.sort_unstable();
    properties.dedup();
    if !properties.is_empty() {
        println!("Properties:  {}", properties.join(", "));
    }

    Ok(())
}
