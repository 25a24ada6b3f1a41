//! Test end-to-end prediction pipeline over temp-provisioned artifacts.
//!
//! The PaDEL variant needs a local jar and JRE; run it with:
//! ```bash
//! cargo test --package picomol-pipeline --test test_pipeline_e2e -- --ignored --nocapture
//! ```

use std::path::Path;

use picomol_common::config::ServiceConfig;
use picomol_common::error::PicomolError;
use picomol_pipeline::download::{download_data_uri, parse_data_uri};
use picomol_pipeline::PredictionPipeline;

/// Write the two reference artifacts: a descriptor list naming [f2, f1]
/// and a linear model scoring f2 + 10*f1.
fn provision_artifacts(dir: &Path) -> ServiceConfig {
    let feature_list = dir.join("descriptor_list.csv");
    std::fs::write(&feature_list, "f2,f1\n").unwrap();

    let model = dir.join("bioactivity_model.json");
    std::fs::write(
        &model,
        r#"{
            "feature_names": ["f2", "f1"],
            "estimator": {"kind": "linear", "intercept": 0.0, "coefficients": [1.0, 10.0]}
        }"#,
    )
    .unwrap();

    let mut config = ServiceConfig::default();
    config.artifacts.model_path = model;
    config.artifacts.feature_list_path = feature_list;
    config.padel.work_dir = dir.to_path_buf();
    config
}

#[tokio::test]
async fn test_descriptor_table_run_scores_and_ranks() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = PredictionPipeline::new(provision_artifacts(dir.path()));

    let upload = b"id,f1,f2,f3\nm1,1,2,3\nm2,4,5,6\n";
    let report = pipeline.run_descriptor_table(upload, "csv").await.unwrap();

    assert_eq!(report.input_rows, 2);
    assert_eq!(report.descriptor_shape, (2, 4));
    assert_eq!(report.subset_shape, (2, 2));

    // Matrix rows are [(2,1), (5,4)]; scores f2 + 10*f1 => m1: 12, m2: 45.
    assert_eq!(report.predictions.len(), 2);
    assert_eq!(report.predictions[0].compound_id, "m2");
    assert!((report.predictions[0].pic50 - 45.0).abs() < 1e-12);
    assert_eq!(report.predictions[1].compound_id, "m1");
    assert!((report.predictions[1].pic50 - 12.0).abs() < 1e-12);

    for pair in report.predictions.windows(2) {
        assert!(pair[0].pic50 >= pair[1].pic50);
    }
}

#[tokio::test]
async fn test_equal_scores_keep_upload_order() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = PredictionPipeline::new(provision_artifacts(dir.path()));

    // Identical rows score identically; ranking must not swap them.
    let upload = b"id,f1,f2\nfirst,1,1\nsecond,1,1\ntop,9,9\n";
    let report = pipeline.run_descriptor_table(upload, "csv").await.unwrap();

    let order: Vec<&str> = report.predictions.iter().map(|p| p.compound_id.as_str()).collect();
    assert_eq!(order, vec!["top", "first", "second"]);
}

#[tokio::test]
async fn test_missing_required_feature_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = PredictionPipeline::new(provision_artifacts(dir.path()));

    let upload = b"id,f1,f3\nm1,1,3\n";
    let err = pipeline.run_descriptor_table(upload, "csv").await.unwrap_err();
    assert!(matches!(err, PicomolError::MissingRequiredFeature(name) if name == "f2"));
}

#[tokio::test]
async fn test_unsupported_extension_halts_before_artifacts_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = provision_artifacts(dir.path());
    // Break the artifacts: they must never be touched for a bad extension.
    config.artifacts.model_path = dir.path().join("missing.json");
    config.artifacts.feature_list_path = dir.path().join("missing.csv");

    let pipeline = PredictionPipeline::new(config);
    let err = pipeline.run_descriptor_table(b"id,f1\nm1,1\n", "pdf").await.unwrap_err();
    assert!(matches!(err, PicomolError::UnsupportedFormat(ext) if ext == "pdf"));
}

#[tokio::test]
async fn test_download_roundtrip_from_report() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = PredictionPipeline::new(provision_artifacts(dir.path()));

    let upload = b"id,f1,f2\nm1,1,2\nm2,4,5\n";
    let report = pipeline.run_descriptor_table(upload, "csv").await.unwrap();

    let uri = download_data_uri(&report.predictions).unwrap();
    let decoded = parse_data_uri(&uri).unwrap();
    assert_eq!(decoded, report.predictions);
}

#[tokio::test]
async fn test_molecule_run_cleans_up_work_file_on_generator_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = provision_artifacts(dir.path());
    // `true` exits 0 but writes no descriptor CSV: generation must fail.
    config.padel.java_bin = "true".to_string();

    let pipeline = PredictionPipeline::new(config);
    let err = pipeline
        .run_molecules(b"m1\tCCO\nm2\tCCN\n", "smi")
        .await
        .unwrap_err();
    assert!(matches!(err, PicomolError::DescriptorGenerationFailed(_)));

    // The fixed-name molecule file is removed even on failure.
    assert!(!dir.path().join("query_molecules.smi").exists());
}

/// Requires a local PaDEL-Descriptor install and a JRE.
#[tokio::test]
#[ignore]
async fn test_molecule_run_with_real_padel() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = provision_artifacts(dir.path());

    // Reference artifacts over real PaDEL output columns.
    config.artifacts.feature_list_path = dir.path().join("fp_list.csv");
    std::fs::write(&config.artifacts.feature_list_path, "PubchemFP0,PubchemFP1\n").unwrap();
    config.artifacts.model_path = dir.path().join("fp_model.json");
    std::fs::write(
        &config.artifacts.model_path,
        r#"{
            "feature_names": ["PubchemFP0", "PubchemFP1"],
            "estimator": {"kind": "linear", "intercept": 4.0, "coefficients": [0.5, 0.5]}
        }"#,
    )
    .unwrap();
    config.padel.jar_path = "PaDEL-Descriptor/PaDEL-Descriptor.jar".into();
    config.padel.descriptor_types = "PaDEL-Descriptor/PubchemFingerprinter.xml".into();

    let pipeline = PredictionPipeline::new(config);
    let report = pipeline
        .run_molecules(b"mol1\tCC(=O)OC1=CC=CC=C1C(=O)O\n", "smi")
        .await
        .unwrap();
    assert_eq!(report.input_rows, 1);
    assert_eq!(report.predictions.len(), 1);
}
