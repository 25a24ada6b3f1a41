use thiserror::Error;

#[derive(Debug, Error)]
pub enum PicomolError {
    #[error("Unsupported upload format: .{0}")]
    UnsupportedFormat(String),

    #[error("Descriptor generation failed: {0}")]
    DescriptorGenerationFailed(String),

    #[error("Required descriptor missing from input: {0}")]
    MissingRequiredFeature(String),

    #[error("Malformed table: {0}")]
    MalformedTable(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PicomolError>;
