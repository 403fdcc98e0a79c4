//! End-to-end: train on a small labeled table, then serve predictions from
//! the persisted artifact through both front-ends.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("cropcast").unwrap()
}

fn write_training_csv(path: &Path) {
    let mut content = String::from("N,P,K,temperature,humidity,ph,rainfall,label\n");
    for i in 0..12 {
        content.push_str(&format!("{},80,80,27.0,85.0,6.5,220.0,rice\n", 95 + i));
        content.push_str(&format!("{},55,20,21.0,60.0,7.0,90.0,maize\n", 20 + i));
        content.push_str(&format!("{},120,195,23.0,82.0,5.8,110.0,banana\n", 165 + i));
    }
    fs::write(path, content).expect("failed to write training csv");
}

fn fast_config(path: &Path) {
    fs::write(
        path,
        r#"{"learning_rate":0.1,"Gbdt":{"max_depth":3,"num_boost_round":20,"debug":false,"training_optimization_level":2,"loss_type":"LogLikelyhood"}}"#,
    )
    .expect("failed to write config");
}

#[test]
fn train_then_predict_and_recommend() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("crops.csv");
    let config = dir.path().join("config.json");
    let model = dir.path().join("crop_model.json");
    write_training_csv(&data);
    fast_config(&config);

    cmd()
        .args([
            "train",
            data.to_str().unwrap(),
            "--output",
            model.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Accuracy:"))
        .stdout(predicate::str::contains("Confusion Matrix:"))
        .stdout(predicate::str::contains("Classification Report:"))
        .stdout(predicate::str::contains("Model saved to"));

    let output = cmd()
        .args([
            "predict",
            "--model",
            model.to_str().unwrap(),
            "100",
            "80",
            "80",
            "27.0",
            "85.0",
            "6.5",
            "220.0",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed["success"], true);
    let recommendations = parsed["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 3);
    let mut last = 100.0f64;
    for rec in recommendations {
        assert!(rec["crop"].is_string());
        let probability = rec["probability"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&probability));
        assert!(probability <= last);
        last = probability;
    }

    cmd()
        .args([
            "recommend",
            "--model",
            model.to_str().unwrap(),
            "--n",
            "100",
            "--p",
            "80",
            "--k",
            "80",
            "--temperature",
            "27.0",
            "--humidity",
            "85.0",
            "--ph",
            "6.5",
            "--rainfall",
            "220.0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Top 3 recommended crops:"))
        .stdout(predicate::str::contains("1. "))
        .stdout(predicate::str::contains("% probability"));
}
