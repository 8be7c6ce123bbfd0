//! End-to-end tests for loading feature directories and the feature cache.

use std::fs;
use std::path::Path;

use ndarray::s;
use rstest::rstest;
use tempfile::TempDir;
use wf_features::data::loader::cache_path;
use wf_features::{DataError, LoadOptions, load_data};

/// Write `rows` instances of three features; the first feature is the row index.
fn write_features(dir: &Path, name: &str, rows: usize, base: f64) {
    let mut text = String::new();
    for i in 0..rows {
        text.push_str(&format!("{i} {} {}\n", base + i as f64, base));
    }
    fs::write(dir.join(name), text).unwrap();
}

#[rstest]
#[case(499, 0)]
#[case(500, 500)]
#[case(600, 500)]
fn per_file_instance_cap(#[case] rows: usize, #[case] kept: usize) {
    let dir = TempDir::new().unwrap();
    write_features(dir.path(), "3_1.csv", rows, 1.0);

    let dataset = load_data(dir.path(), &LoadOptions::default()).unwrap();
    assert_eq!(dataset.len(), kept);
    if kept > 0 {
        // The first instances in file order are the ones kept.
        let first = dataset.x.column(0).to_vec();
        let expected: Vec<f64> = (0..kept).map(|i| i as f64).collect();
        assert_eq!(first, expected);
    }
}

#[test]
fn second_load_returns_the_cached_pair() {
    let dir = TempDir::new().unwrap();
    write_features(dir.path(), "1_1.csv", 520, 0.0);
    write_features(dir.path(), "2_1.csv", 500, 100.0);

    let first = load_data(dir.path(), &LoadOptions::default()).unwrap();
    assert!(cache_path(dir.path()).exists());

    // Sources changing after the cache exists are not noticed.
    fs::remove_file(dir.path().join("2_1.csv")).unwrap();
    let second = load_data(dir.path(), &LoadOptions::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(second.len(), 1000);
}

#[test]
fn labels_are_remapped_to_a_dense_range() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    write_features(dir.path(), "10_1.csv", 500, 0.0);
    write_features(dir.path(), "4_1.csv", 500, 1.0);
    write_features(&dir.path().join("nested"), "4_2.csv", 510, 2.0);
    write_features(dir.path(), "7_1.csv", 499, 3.0); // skipped, leaves no gap
    write_features(dir.path(), "25_1.csv", 500, 4.0);

    let dataset = load_data(dir.path(), &LoadOptions::default()).unwrap();
    let view = dataset.view();
    assert_eq!(view.len(), 2000);
    assert_eq!(view.sites(), 0..3);

    let counts = view.site_counts();
    assert_eq!(counts.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    // class 4 → 0 (two files), class 10 → 1, class 25 → 2
    assert_eq!(counts[&0], 1000);
    assert_eq!(counts[&1], 500);
    assert_eq!(counts[&2], 500);
}

#[test]
fn site_rows_match_label_counts() {
    let dir = TempDir::new().unwrap();
    write_features(dir.path(), "1_1.csv", 500, 0.0);
    write_features(dir.path(), "1_2.csv", 500, 0.0);
    write_features(dir.path(), "2_1.csv", 500, 50.0);

    let dataset = load_data(dir.path(), &LoadOptions::default()).unwrap();
    let view = dataset.view();
    let labels = view.get_labels();
    for site in view.sites() {
        let label = site as i64;
        let expected = labels.iter().filter(|&&y| y == label).count();
        assert_eq!(view.get_site(label, None).len(), expected);
        assert_eq!(view.get_site(label, Some(2)).len(), expected);
    }
}

#[test]
fn feature_copies_are_isolated() {
    let dir = TempDir::new().unwrap();
    write_features(dir.path(), "1_1.csv", 500, 5.0);

    let dataset = load_data(dir.path(), &LoadOptions::default()).unwrap();
    let view = dataset.view();
    let before = view.get_feature(1);
    let mut copy = view.get_feature(1);
    copy.fill(0.0);
    assert_eq!(view.get_feature(1), before);
    assert_eq!(dataset.x.slice(s![.., 1]), before);
}

#[test]
fn non_numeric_fields_become_zero() {
    let dir = TempDir::new().unwrap();
    let mut text = String::from("a 1 2\n");
    for _ in 1..500 {
        text.push_str("1 ? 2\n");
    }
    fs::write(dir.path().join("1_1.csv"), text).unwrap();

    let dataset = load_data(dir.path(), &LoadOptions::default()).unwrap();
    assert_eq!(dataset.x.row(0).to_vec(), vec![0.0, 1.0, 2.0]);
    assert_eq!(dataset.x.row(1).to_vec(), vec![1.0, 0.0, 2.0]);
}

#[test]
fn extension_and_delimiter_options() {
    let dir = TempDir::new().unwrap();
    let text: String = (0..500).map(|i| format!("{i},1,2\n")).collect();
    fs::write(dir.path().join("1_1.feat"), &text).unwrap();
    fs::write(dir.path().join("2_1.csv"), &text).unwrap();

    let options = LoadOptions {
        extension: ".feat".to_string(),
        delimiter: ',',
        ..LoadOptions::default()
    };
    let dataset = load_data(dir.path(), &options).unwrap();
    assert_eq!(dataset.x.dim(), (500, 3));
    assert!(dataset.y.iter().all(|&y| y == 0));
}

#[test]
fn malformed_file_name_is_fatal() {
    let dir = TempDir::new().unwrap();
    write_features(dir.path(), "site.csv", 500, 0.0);

    let err = load_data(dir.path(), &LoadOptions::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DataError>(),
        Some(DataError::MalformedFileName { name }) if name == "site.csv"
    ));
    assert!(!cache_path(dir.path()).exists());
}

#[test]
fn missing_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(load_data(&dir.path().join("absent"), &LoadOptions::default()).is_err());
}

#[test]
fn empty_directory_yields_empty_dataset() {
    let dir = TempDir::new().unwrap();
    let dataset = load_data(dir.path(), &LoadOptions::default()).unwrap();
    assert!(dataset.is_empty());
    assert!(cache_path(dir.path()).exists());
    assert_eq!(load_data(dir.path(), &LoadOptions::default()).unwrap(), dataset);
}
