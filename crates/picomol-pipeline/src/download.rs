//! Download encoding for ranked predictions.
//!
//! The result table is offered to the browser as a `data:` URI so no file
//! ever has to be written server-side: CSV, then base64, embedded straight
//! into the download link.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use picomol_common::error::{PicomolError, Result};
use picomol_common::table::Prediction;

const DATA_URI_PREFIX: &str = "data:file/csv;base64,";

/// Serialize ranked predictions as a two-column CSV.
pub fn predictions_to_csv(predictions: &[Prediction]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["compound_id", "pIC50"])?;
    for p in predictions {
        let score = p.pic50.to_string();
        writer.write_record([p.compound_id.as_str(), score.as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| PicomolError::Processing(format!("CSV buffer flush failed: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| PicomolError::Processing(format!("CSV output is not UTF-8: {e}")))
}

/// Parse a prediction CSV back into (identifier, score) pairs, in file
/// order.
pub fn predictions_from_csv(data: &str) -> Result<Vec<Prediction>> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let mut predictions = Vec::new();
    for record in reader.records() {
        let record = record?;
        let compound_id = record
            .get(0)
            .ok_or_else(|| PicomolError::MalformedTable("prediction row has no identifier".to_string()))?
            .to_string();
        let pic50: f64 = record
            .get(1)
            .ok_or_else(|| PicomolError::MalformedTable("prediction row has no score".to_string()))?
            .parse()
            .map_err(|_| PicomolError::MalformedTable("prediction score is not a number".to_string()))?;
        predictions.push(Prediction { compound_id, pic50 });
    }
    Ok(predictions)
}

/// Build the base64-embedded download link target for the predictions.
pub fn download_data_uri(predictions: &[Prediction]) -> Result<String> {
    let csv = predictions_to_csv(predictions)?;
    Ok(format!("{}{}", DATA_URI_PREFIX, STANDARD.encode(csv)))
}

/// Decode a download URI produced by [`download_data_uri`].
pub fn parse_data_uri(uri: &str) -> Result<Vec<Prediction>> {
    let encoded = uri
        .strip_prefix(DATA_URI_PREFIX)
        .ok_or_else(|| PicomolError::MalformedTable("not a prediction download URI".to_string()))?;
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| PicomolError::MalformedTable(format!("invalid base64 payload: {e}")))?;
    let csv = String::from_utf8(bytes)
        .map_err(|e| PicomolError::MalformedTable(format!("payload is not UTF-8: {e}")))?;
    predictions_from_csv(&csv)
}
