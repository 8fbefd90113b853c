//! Single-slot dataset cache behaviour.

use chrono::NaiveDate;
use std::sync::Arc;
use subdash_core::{
    cache::DatasetCache,
    calendar::SimWindow,
    config::GeneratorConfig,
    generator::generate_all_data,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn window(start_day: u32, days: u32) -> SimWindow {
    SimWindow::new(NaiveDate::from_ymd_opt(2025, 1, start_day).unwrap(), days)
}

#[test]
fn repeated_window_returns_cached_records() {
    init_logging();
    let config = GeneratorConfig::default();
    let mut cache = DatasetCache::new();

    let first = cache.get_or_generate(&config, window(1, 420));
    let second = cache.get_or_generate(&config, window(1, 420));

    assert!(Arc::ptr_eq(&first, &second), "Second call should reuse the cached allocation");
    assert_eq!(cache.generations(), 1);
    assert_eq!(cache.cached_window(), Some(window(1, 420)));
}

#[test]
fn different_window_regenerates_from_scratch() {
    init_logging();
    let config = GeneratorConfig::default();
    let mut cache = DatasetCache::new();

    let first = cache.get_or_generate(&config, window(1, 420));
    let other = cache.get_or_generate(&config, window(1, 90));

    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(other.len(), 360);
    assert_eq!(&other[..], generate_all_data(&config, window(1, 90)).as_slice());
    assert_eq!(cache.generations(), 2);

    // Single slot: going back to the first window is a miss again.
    let again = cache.get_or_generate(&config, window(1, 420));
    assert!(!Arc::ptr_eq(&first, &again));
    assert_eq!(first, again);
    assert_eq!(cache.generations(), 3);
}

#[test]
fn start_date_is_part_of_the_key() {
    init_logging();
    let config = GeneratorConfig::default();
    let mut cache = DatasetCache::new();

    let jan1 = cache.get_or_generate(&config, window(1, 30));
    let jan2 = cache.get_or_generate(&config, window(2, 30));

    assert_eq!(cache.generations(), 2);
    assert_eq!(jan2[0].date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    assert_ne!(jan1[0].date, jan2[0].date);
}

#[test]
fn invalidate_forces_regeneration() {
    init_logging();
    let config = GeneratorConfig::default();
    let mut cache = DatasetCache::new();

    let first = cache.get_or_generate(&config, window(1, 30));
    cache.invalidate();
    assert_eq!(cache.cached_window(), None);

    let second = cache.get_or_generate(&config, window(1, 30));
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first, second);
}
