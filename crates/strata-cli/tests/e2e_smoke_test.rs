use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use strata::Orientation;
use strata_cli::{Args, run};

/// Collects all .json files from a directory
fn collect_json_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn args(input: &Path, output: &Path, orientation: Option<Orientation>) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        orientation,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_fixtures() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let fixtures = collect_json_files(fixtures_path());

    assert!(!fixtures.is_empty(), "No fixtures found in tests/fixtures/");

    let mut failed = Vec::new();

    for fixture in &fixtures {
        for orientation in [Orientation::TopToBottom, Orientation::LeftToRight] {
            let output_path = temp_dir.path().join(format!(
                "{}-{orientation}.json",
                fixture.file_stem().unwrap().to_string_lossy()
            ));

            if let Err(e) = run(&args(fixture, &output_path, Some(orientation))) {
                failed.push((fixture.clone(), e));
                continue;
            }

            let written = fs::read_to_string(&output_path).expect("Output should exist");
            let value: serde_json::Value =
                serde_json::from_str(&written).expect("Output should be valid JSON");
            assert_eq!(value["orientation"], orientation.to_string());
        }
    }

    if !failed.is_empty() {
        eprintln!("\nValid fixtures that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid fixture(s) failed unexpectedly", failed.len());
    }

    println!("✅ All {} valid fixtures passed", fixtures.len());
}

#[test]
fn e2e_smoke_test_error_fixtures() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let fixtures = collect_json_files(fixtures_path().join("errors"));

    assert!(
        !fixtures.is_empty(),
        "No error fixtures found in tests/fixtures/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for fixture in &fixtures {
        let output_path = temp_dir.path().join(format!(
            "error_{}.json",
            fixture.file_stem().unwrap().to_string_lossy()
        ));

        if run(&args(fixture, &output_path, None)).is_ok() {
            unexpectedly_succeeded.push(fixture.clone());
        }
        assert!(
            !output_path.exists(),
            "No output should be written for {}",
            fixture.display()
        );
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError fixtures that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error fixture(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!(
        "✅ All {} error fixtures failed as expected",
        fixtures.len()
    );
}

#[test]
fn e2e_diamond_layout() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("diamond.json");

    run(&args(
        &fixtures_path().join("diamond.json"),
        &output_path,
        None,
    ))
    .expect("Diamond should lay out");

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    let ranks: Vec<_> = value["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|node| node["rank"].as_u64().unwrap())
        .collect();
    assert_eq!(ranks, vec![0, 1, 1, 2]);
}

#[test]
fn e2e_missing_input_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("missing.json");
    let output = temp_dir.path().join("out.json");

    assert!(run(&args(&input, &output, None)).is_err());
}
