//! Picomol Pipeline - End-to-end bioactivity prediction runs.
//!
//! Orchestrates one user-triggered run:
//! 1. Parse the upload (descriptor table or raw molecule list)
//! 2. Compute descriptors via PaDEL-Descriptor when given raw molecules
//! 3. Project onto the model's required descriptor subset
//! 4. Score with the pre-trained model and rank descending
//! 5. Encode the ranked predictions for download

pub mod download;
pub mod run;

pub use run::{PredictionPipeline, RunReport};
