//! Molecular descriptor generation using PaDEL-Descriptor.
//!
//! PaDEL is an external Java tool; it is invoked as a subprocess over the
//! fixed-name molecule file in the work directory and produces a CSV of
//! computed descriptors (PubChem fingerprints). Nothing about descriptor
//! computation is reimplemented here.

use std::path::PathBuf;

use tokio::process::Command;
use tracing::{debug, info};

use picomol_common::config::PadelConfig;
use picomol_common::error::{PicomolError, Result};

/// Wrapper for PaDEL-Descriptor execution.
pub struct PadelRunner {
    config: PadelConfig,
}

impl PadelRunner {
    /// Create a new PadelRunner.
    pub fn new(config: PadelConfig) -> Self {
        Self { config }
    }

    /// Path where the jar is told to write the descriptor CSV.
    pub fn output_path(&self) -> PathBuf {
        self.config.work_dir.join(&self.config.output_file)
    }

    /// Run PaDEL-Descriptor over the molecule file in the work directory
    /// and return the path of the produced descriptor CSV.
    ///
    /// The invocation is awaited to completion with no upper bound.
    // TODO: agree on a wall-clock limit for the jar before exposing this
    // endpoint to untrusted uploads; large SDF batches can run for hours.
    pub async fn run(&self) -> Result<PathBuf> {
        let out_path = self.output_path();
        info!("Running PaDEL-Descriptor in {:?}", self.config.work_dir);

        let output = Command::new(&self.config.java_bin)
            .arg(format!("-Xms{}", self.config.heap))
            .arg(format!("-Xmx{}", self.config.heap))
            .arg("-Djava.awt.headless=true")
            .arg("-jar")
            .arg(&self.config.jar_path)
            .arg("-removesalt")
            .arg("-standardizenitro")
            .arg("-fingerprints")
            .arg("-descriptortypes")
            .arg(&self.config.descriptor_types)
            .arg("-dir")
            .arg(&self.config.work_dir)
            .arg("-file")
            .arg(&out_path)
            .output()
            .await
            .map_err(|e| {
                PicomolError::DescriptorGenerationFailed(format!(
                    "failed to launch {}: {}",
                    self.config.java_bin, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PicomolError::DescriptorGenerationFailed(format!(
                "PaDEL-Descriptor exited with {}: {}",
                output.status, stderr
            )));
        }

        if !out_path.exists() {
            return Err(PicomolError::DescriptorGenerationFailed(format!(
                "descriptor output file not found: {:?}",
                out_path
            )));
        }

        debug!("PaDEL-Descriptor completed successfully. Output in {:?}", out_path);
        Ok(out_path)
    }
}
