use std::collections::HashSet;
use std::fs;
use std::path::Path;

use cropcast_core::dataset::{read_labeled_csv, stratified_split, FEATURE_NAMES};
use cropcast_core::error::CropcastError;
use tempfile::TempDir;

fn write_csv(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("failed to write test csv");
    path
}

fn labeled_table() -> String {
    let mut content = String::from("N,P,K,temperature,humidity,ph,rainfall,label\n");
    for i in 0..10 {
        content.push_str(&format!("{},40,40,25.0,80.0,6.5,200.0,rice\n", 80 + i));
    }
    for i in 0..10 {
        content.push_str(&format!("{},55,20,21.0,60.0,7.0,90.0,maize\n", 20 + i));
    }
    for i in 0..5 {
        content.push_str(&format!("{},125,195,23.0,82.0,6.3,110.0,banana\n", 100 + i));
    }
    content
}

#[test]
fn reads_labeled_csv_into_dataset() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "crops.csv", &labeled_table());

    let dataset = read_labeled_csv(&path).expect("failed to read dataset");
    assert_eq!(dataset.n_samples(), 25);
    assert_eq!(dataset.n_features(), FEATURE_NAMES.len());
    // vocabulary is sorted
    assert_eq!(dataset.labels, vec!["banana", "maize", "rice"]);
    // targets index into the vocabulary
    assert!(dataset.y.iter().all(|&c| c < dataset.n_classes()));
    assert_eq!(dataset.y.iter().filter(|&&c| c == 2).count(), 10);
}

#[test]
fn tolerates_extra_columns_and_arbitrary_order() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        dir.path(),
        "shuffled.csv",
        "label,rainfall,ph,humidity,temperature,K,P,N,notes\n\
         rice,200.0,6.5,80.0,25.0,40,40,90,wet\n\
         maize,90.0,7.0,60.0,21.0,20,55,25,dry\n",
    );

    let dataset = read_labeled_csv(&path).expect("failed to read dataset");
    assert_eq!(dataset.n_samples(), 2);
    // first row is rice with N=90 in the canonical first column
    let rice_row = dataset.y.iter().position(|&c| dataset.labels[c] == "rice").unwrap();
    assert!((dataset.x[(rice_row, 0)] - 90.0).abs() < 1e-6);
}

#[test]
fn missing_label_column_is_data_format_error() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        dir.path(),
        "nolabel.csv",
        "N,P,K,temperature,humidity,ph,rainfall\n90,40,40,25.0,80.0,6.5,200.0\n",
    );

    let err = read_labeled_csv(&path).unwrap_err();
    assert!(matches!(err, CropcastError::DataFormat(_)));
    assert!(err.to_string().contains("label"));
}

#[test]
fn non_numeric_feature_is_data_format_error() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        dir.path(),
        "bad.csv",
        "N,P,K,temperature,humidity,ph,rainfall,label\n\
         90,40,40,25.0,80.0,6.5,200.0,rice\n\
         abc,55,20,21.0,60.0,7.0,90.0,maize\n",
    );

    let err = read_labeled_csv(&path).unwrap_err();
    assert!(matches!(err, CropcastError::DataFormat(_)));
    assert!(err.to_string().contains("abc"));
}

#[test]
fn single_label_is_data_format_error() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        dir.path(),
        "single.csv",
        "N,P,K,temperature,humidity,ph,rainfall,label\n\
         90,40,40,25.0,80.0,6.5,200.0,rice\n\
         91,41,41,25.5,81.0,6.6,201.0,rice\n",
    );

    let err = read_labeled_csv(&path).unwrap_err();
    assert!(matches!(err, CropcastError::DataFormat(_)));
}

#[test]
fn stratified_split_preserves_class_shares() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "crops.csv", &labeled_table());
    let dataset = read_labeled_csv(&path).unwrap();

    let (train, test) = stratified_split(&dataset, 0.2, 42).expect("split failed");

    // disjoint and exhaustive
    let train_set: HashSet<usize> = train.iter().copied().collect();
    let test_set: HashSet<usize> = test.iter().copied().collect();
    assert!(train_set.is_disjoint(&test_set));
    assert_eq!(train_set.len() + test_set.len(), dataset.n_samples());

    // 20% of each class: rice 2, maize 2, banana 1
    for (class_idx, expected) in [(0usize, 1usize), (1, 2), (2, 2)] {
        let count = test.iter().filter(|&&i| dataset.y[i] == class_idx).count();
        assert_eq!(count, expected, "class {}", class_idx);
    }
}

#[test]
fn stratified_split_is_deterministic_for_a_seed() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "crops.csv", &labeled_table());
    let dataset = read_labeled_csv(&path).unwrap();

    let first = stratified_split(&dataset, 0.2, 42).unwrap();
    let second = stratified_split(&dataset, 0.2, 42).unwrap();
    assert_eq!(first, second);
}

#[test]
fn undersized_class_is_insufficient_data_error() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        dir.path(),
        "tiny.csv",
        "N,P,K,temperature,humidity,ph,rainfall,label\n\
         90,40,40,25.0,80.0,6.5,200.0,rice\n\
         91,41,41,25.5,81.0,6.6,201.0,rice\n\
         25,55,20,21.0,60.0,7.0,90.0,maize\n",
    );
    let dataset = read_labeled_csv(&path).unwrap();

    let err = stratified_split(&dataset, 0.2, 42).unwrap_err();
    assert!(matches!(err, CropcastError::InsufficientData(_)));
    assert!(err.to_string().contains("maize"));
}
