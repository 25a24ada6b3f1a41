//! Orchestrator for a single prediction run.
//!
//! One run is single-threaded and synchronous: the only blocking operation
//! is the PaDEL subprocess, which is awaited to completion. Each run loads
//! its own copy of the scoring model and the required-descriptor list;
//! nothing is shared or cached across runs. A failed stage aborts the
//! whole run: no retries, no partial results.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use picomol_common::config::ServiceConfig;
use picomol_common::error::Result;
use picomol_common::table::{DescriptorTable, FeatureList, Prediction};
use picomol_descriptors::loader::{load_descriptor_table, load_molecule_table, write_molecule_file};
use picomol_descriptors::padel::PadelRunner;
use picomol_descriptors::selector::select_features;
use picomol_model::{predict, rank_predictions, ScoringModel};

/// Summary of one completed run, ready for rendering and download.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub job_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Rows in the upload (molecules or descriptor rows)
    pub input_rows: usize,
    /// (rows, columns) of the full descriptor table, identifier included
    pub descriptor_shape: (usize, usize),
    /// (rows, features) of the matrix actually scored
    pub subset_shape: (usize, usize),
    /// Sorted descending by predicted pIC50
    pub predictions: Vec<Prediction>,
    pub duration_ms: u64,
}

/// Runs the full prediction flow for one upload.
pub struct PredictionPipeline {
    config: ServiceConfig,
}

impl PredictionPipeline {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    /// Score an uploaded descriptor table (`.csv` comma-delimited or `.txt`
    /// tab-delimited, header row expected).
    pub async fn run_descriptor_table(&self, bytes: &[u8], extension: &str) -> Result<RunReport> {
        let job_id = Uuid::new_v4();
        let started_at = Utc::now();
        let t0 = Instant::now();

        info!(job = %job_id, extension, "Starting prediction run over uploaded descriptors");
        let table = load_descriptor_table(bytes, extension)?;
        self.score_table(job_id, started_at, t0, table.rows.len(), table)
    }

    /// Full variant: a raw molecule upload (`.smi` or `.txt`, no header).
    /// Descriptors are computed by the external PaDEL-Descriptor jar before
    /// scoring.
    pub async fn run_molecules(&self, bytes: &[u8], extension: &str) -> Result<RunReport> {
        let job_id = Uuid::new_v4();
        let started_at = Utc::now();
        let t0 = Instant::now();

        info!(job = %job_id, extension, "Starting prediction run over raw molecules");
        let molecules = load_molecule_table(bytes, extension)?;

        let molecule_path = self.config.padel.work_dir.join(&self.config.padel.molecule_file);
        write_molecule_file(&molecules, &molecule_path)?;
        info!(job = %job_id, molecules = molecules.len(), "Calculating descriptors");

        let runner = PadelRunner::new(self.config.padel.clone());
        let generated = runner.run().await;

        // The jar has no use for its input once it has exited; drop the
        // fixed-name work file whether or not the run succeeded.
        if let Err(e) = std::fs::remove_file(&molecule_path) {
            warn!(job = %job_id, "Could not remove molecule work file: {}", e);
        }

        let output_path = generated?;
        let raw = std::fs::read(&output_path)?;
        let table = load_descriptor_table(&raw, "csv")?;

        self.score_table(job_id, started_at, t0, molecules.len(), table)
    }

    /// Shared tail of both variants: select, score, rank.
    fn score_table(
        &self,
        job_id: Uuid,
        started_at: DateTime<Utc>,
        t0: Instant,
        input_rows: usize,
        table: DescriptorTable,
    ) -> Result<RunReport> {
        let features = FeatureList::from_csv_header(&self.config.artifacts.feature_list_path)?;
        let matrix = select_features(&table, &features)?;
        let subset_shape = matrix.shape();

        let model = ScoringModel::load(&self.config.artifacts.model_path)?;
        let scores = predict(&model, &matrix)?;
        let predictions = rank_predictions(matrix.ids, scores);

        info!(job = %job_id, compounds = predictions.len(), "Scored and ranked compounds");

        Ok(RunReport {
            job_id,
            started_at,
            input_rows,
            descriptor_shape: table.shape(),
            subset_shape,
            predictions,
            duration_ms: t0.elapsed().as_millis() as u64,
        })
    }
}
