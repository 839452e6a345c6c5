#[allow(dead_code)]
mod common;

use std::path::Path;

use approx::assert_abs_diff_eq;
use image::{ImageBuffer, Luma, LumaA, Rgb};

use pointseries_core::catalog::manifest::load_raster;
use pointseries_core::catalog::{ImageCollection, ManifestCollection};
use pointseries_core::error::SeriesError;
use pointseries_core::export::CsvExporter;
use pointseries_core::pipeline::{run_and_export, CancelToken, NoOpReporter, Preset};
use pointseries_core::record::TemporalResolution;

use common::config_for;

fn write_u16_png(path: &Path, value: u16) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_fn(20, 20, |_, _| Luma([value]));
    img.save(path).unwrap();
}

const GRID: &str = "grid = { origin_lon = 11.18, origin_lat = 46.14, pixel_width = 0.001, pixel_height = -0.001, cols = 20, rows = 20 }";

fn modis_manifest(dir: &Path) -> std::path::PathBuf {
    write_u16_png(&dir.join("2023001/bsa.png"), 300);
    write_u16_png(&dir.join("2023001/wsa.png"), 400);
    write_u16_png(&dir.join("2023002/bsa.png"), 32767);
    write_u16_png(&dir.join("2023002/wsa.png"), 400);

    let manifest = format!(
        r#"
name = "MODIS/006/MCD43A3"
temporal_resolution = "daily"
bands = ["Albedo_BSA_shortwave", "Albedo_WSA_shortwave"]

[band_options.Albedo_BSA_shortwave]
nodata = 32767

[[images]]
id = "2023_01_01"
time_start = "2023-01-01T00:00:00"
{GRID}
bands = {{ Albedo_BSA_shortwave = "2023001/bsa.png", Albedo_WSA_shortwave = "2023001/wsa.png" }}

[[images]]
id = "2023_01_02"
time_start = "2023-01-02T00:00:00"
{GRID}
bands = {{ Albedo_BSA_shortwave = "2023002/bsa.png", Albedo_WSA_shortwave = "2023002/wsa.png" }}

[[images]]
id = "2023_01_03"
time_start = "2023-01-03T00:00:00"
{GRID}
bands = {{ Albedo_BSA_shortwave = "2023001/bsa.png" }}
"#
    );
    let path = dir.join("manifest.toml");
    std::fs::write(&path, manifest).unwrap();
    path
}

#[test]
fn test_open_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let path = modis_manifest(dir.path());
    let c = ManifestCollection::open(&path).unwrap();

    assert_eq!(c.name(), "MODIS/006/MCD43A3");
    assert_eq!(c.temporal_resolution(), TemporalResolution::Daily);
    assert_eq!(c.records().len(), 3);
    assert!(c.has_band("Albedo_WSA_shortwave"));
    assert!(!c.has_band("B4"));
}

#[test]
fn test_read_band_values_and_nodata() {
    let dir = tempfile::tempdir().unwrap();
    let c = ManifestCollection::open(&modis_manifest(dir.path())).unwrap();

    let bsa = c.read_band(0, "Albedo_BSA_shortwave").unwrap();
    assert_eq!(bsa.data.dim(), (20, 20));
    assert_abs_diff_eq!(bsa.data[[7, 3]], 300.0);

    let masked = c.read_band(1, "Albedo_BSA_shortwave").unwrap();
    assert!(masked.data.iter().all(|v| v.is_nan()));

    let unlisted = c.read_band(2, "Albedo_WSA_shortwave").unwrap();
    assert!(unlisted.data.iter().all(|v| v.is_nan()));
}

#[test]
fn test_missing_raster_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = modis_manifest(dir.path());
    std::fs::remove_file(dir.path().join("2023001/wsa.png")).unwrap();
    let c = ManifestCollection::open(&path).unwrap();
    assert!(c.read_band(0, "Albedo_WSA_shortwave").is_err());
}

#[test]
fn test_undeclared_band_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.toml");
    std::fs::write(
        &path,
        format!(
            "name = \"S2\"\nbands = [\"B4\"]\n\n[[images]]\nid = \"a\"\ntime_start = \"2024-06-03T10:00:00\"\n{GRID}\nbands = {{ B8 = \"a/B8.png\" }}\n"
        ),
    )
    .unwrap();
    assert!(matches!(
        ManifestCollection::open(&path),
        Err(SeriesError::MissingBand { .. })
    ));
}

#[test]
fn test_duplicate_image_id_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.toml");
    let image = |day: &str| {
        format!("[[images]]\nid = \"tile\"\ntime_start = \"{day}T00:00:00\"\n{GRID}\n")
    };
    let manifest = format!(
        "name = \"MODIS\"\nbands = [\"Albedo_BSA_shortwave\"]\n\n{}\n{}",
        image("2023-01-01"),
        image("2023-01-02")
    );
    std::fs::write(&path, manifest).unwrap();
    match ManifestCollection::open(&path) {
        Err(SeriesError::InvalidManifest(msg)) => assert!(msg.contains("tile"), "{msg}"),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("duplicate ids should be rejected"),
    }
}

#[test]
fn test_south_up_grid_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.toml");
    let grid = GRID.replace("pixel_height = -0.001", "pixel_height = 0.001");
    std::fs::write(
        &path,
        format!("name = \"S2\"\nbands = [\"B4\"]\n\n[[images]]\nid = \"a\"\ntime_start = \"2024-06-03T10:00:00\"\n{grid}\n"),
    )
    .unwrap();
    assert!(matches!(
        ManifestCollection::open(&path),
        Err(SeriesError::InvalidManifest(_))
    ));
}

#[test]
fn test_albedo_end_to_end_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let c = ManifestCollection::open(&modis_manifest(dir.path())).unwrap();
    let exporter = CsvExporter::new(dir.path().join("out"));
    let config = config_for(Preset::ModisAlbedo, "2023-01-01", "2023-02-01");

    let (run, _) = run_and_export(
        &config,
        &c,
        &exporter,
        std::sync::Arc::new(NoOpReporter),
        &CancelToken::new(),
    )
    .unwrap();

    // Day two has masked BSA, day three has no WSA raster.
    assert_eq!(run.matched, 3);
    assert_eq!(run.dropped, 2);
    let text =
        std::fs::read_to_string(dir.path().join("out/albedo/albedo_time_series.csv")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,albedo");
    assert_eq!(lines.len(), 2);
    let value: f64 = lines[1].split(',').nth(1).unwrap().parse().unwrap();
    assert!(lines[1].starts_with("2023-01-01,"));
    assert_abs_diff_eq!(value, 0.35, epsilon = 1e-12);
}

// ---------------------------------------------------------------------------
// Raster formats
// ---------------------------------------------------------------------------

#[test]
fn test_8bit_gray_read_raw() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("b.png");
    let img: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_fn(3, 2, |x, y| Luma([(10 * x + y) as u8]));
    img.save(&path).unwrap();

    let data = load_raster(&path).unwrap();
    assert_eq!(data.dim(), (2, 3));
    assert_eq!(data[[0, 0]], 0.0);
    assert_eq!(data[[1, 2]], 21.0);
}

#[test]
fn test_16bit_gray_read_raw() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("b.png");
    write_u16_png(&path, 40_000);
    let data = load_raster(&path).unwrap();
    assert!(data.iter().all(|&v| v == 40_000.0));
}

#[test]
fn test_gray_alpha_raster_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("b.png");
    let img: ImageBuffer<LumaA<u8>, Vec<u8>> = ImageBuffer::from_pixel(2, 2, LumaA([100, 255]));
    img.save(&path).unwrap();
    assert!(matches!(
        load_raster(&path),
        Err(SeriesError::InvalidManifest(_))
    ));
}

#[test]
fn test_color_raster_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("b.png");
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(2, 2, Rgb([100, 50, 25]));
    img.save(&path).unwrap();
    assert!(matches!(
        load_raster(&path),
        Err(SeriesError::InvalidManifest(_))
    ));
}
