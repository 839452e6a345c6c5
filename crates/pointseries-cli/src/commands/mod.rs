pub mod config;
pub mod info;
pub mod run;

use clap::ValueEnum;
use pointseries_core::pipeline::Preset;

#[derive(Clone, Copy, ValueEnum)]
pub enum PresetArg {
    /// Sentinel-2 NDVI → LAI
    Sentinel2Lai,
    /// MODIS black/white-sky albedo blend
    ModisAlbedo,
    /// MODIS black-sky albedo
    ModisAlbedoBsa,
    /// ERA5-Land clear-sky index
    Era5ClearSky,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Sentinel2Lai => Preset::Sentinel2Lai,
            PresetArg::ModisAlbedo => Preset::ModisAlbedo,
            PresetArg::ModisAlbedoBsa => Preset::ModisAlbedoBsa,
            PresetArg::Era5ClearSky => Preset::Era5ClearSky,
        }
    }
}
