#[allow(dead_code)]
mod common;

use std::sync::Arc;
use std::thread;

use pointseries_core::record::TemporalResolution;
use pointseries_core::series::{FeatureAssembler, RowOrder, TimeFormat, TimeSeriesCollector};

use common::datetime;

#[test]
fn test_time_format_follows_resolution() {
    assert_eq!(
        TimeFormat::for_resolution(TemporalResolution::Daily),
        TimeFormat::Date
    );
    assert_eq!(
        TimeFormat::for_resolution(TemporalResolution::SubDaily),
        TimeFormat::DateTime
    );
}

#[test]
fn test_assembler_renders_time() {
    let t = datetime("2024-07-01 13:00:00");
    let daily = FeatureAssembler::new(TimeFormat::Date).assemble(t, 1.25);
    assert_eq!(daily.time, "2024-07-01");
    assert_eq!(daily.value, 1.25);
    assert_eq!(daily.timestamp, t);

    let hourly = FeatureAssembler::new(TimeFormat::DateTime).assemble(t, 0.5);
    assert_eq!(hourly.time, "2024-07-01 13:00:00");
}

#[test]
fn test_collector_orders_by_catalog_index() {
    let assembler = FeatureAssembler::new(TimeFormat::Date);
    let collector = TimeSeriesCollector::new("date", "LAI");
    collector.push(2, assembler.assemble(datetime("2024-06-01 00:00:00"), 3.0));
    collector.push(0, assembler.assemble(datetime("2024-06-09 00:00:00"), 1.0));
    collector.push(1, assembler.assemble(datetime("2024-06-05 00:00:00"), 2.0));

    let series = collector.finish(RowOrder::Catalog);
    assert_eq!(series.time_column, "date");
    assert_eq!(series.value_column, "LAI");
    assert_eq!(series.values().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_collector_chronological_order() {
    let assembler = FeatureAssembler::new(TimeFormat::Date);
    let collector = TimeSeriesCollector::new("date", "LAI");
    collector.push(0, assembler.assemble(datetime("2024-06-09 00:00:00"), 1.0));
    collector.push(1, assembler.assemble(datetime("2024-06-01 00:00:00"), 2.0));
    collector.push(2, assembler.assemble(datetime("2024-06-05 00:00:00"), 3.0));
    collector.push(3, assembler.assemble(datetime("2024-06-01 00:00:00"), 4.0));

    let series = collector.finish(RowOrder::Chronological);
    let times: Vec<_> = series.rows.iter().map(|r| r.time.as_str()).collect();
    assert_eq!(times, vec!["2024-06-01", "2024-06-01", "2024-06-05", "2024-06-09"]);
    // Ties keep catalog order
    assert_eq!(series.values().collect::<Vec<_>>(), vec![2.0, 4.0, 3.0, 1.0]);
}

#[test]
fn test_collector_concurrent_pushes() {
    let collector = Arc::new(TimeSeriesCollector::new("date", "albedo"));
    let assembler = FeatureAssembler::new(TimeFormat::Date);
    let t = datetime("2024-01-01 00:00:00");

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let collector = Arc::clone(&collector);
            thread::spawn(move || {
                for i in 0..50 {
                    let index = i * 8 + worker;
                    collector.push(index, assembler.assemble(t, index as f64));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(collector.size(), 400);
    let collector = Arc::try_unwrap(collector).unwrap();
    let series = collector.finish(RowOrder::Catalog);
    let expected: Vec<f64> = (0..400).map(|i| i as f64).collect();
    assert_eq!(series.values().collect::<Vec<_>>(), expected);
}

#[test]
fn test_empty_collector() {
    let collector = TimeSeriesCollector::new("time", "clear_sky_index");
    assert!(collector.is_empty());
    let series = collector.finish(RowOrder::Catalog);
    assert!(series.is_empty());
    assert_eq!(series.size(), 0);
}
