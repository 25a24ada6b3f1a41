//! Prediction workflow — upload form, pipeline trigger, result rendering.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::Json;

use picomol_common::error::{PicomolError, Result};
use picomol_pipeline::download::download_data_uri;
use picomol_pipeline::{PredictionPipeline, RunReport};

use crate::state::SharedState;

// ── Form input ───────────────────────────────────────────────────────────────

/// What arrived in the multipart form: the uploaded file plus the selected
/// input mode ("descriptors" = precomputed table, "molecules" = raw SMILES
/// list that PaDEL must process first).
struct UploadForm {
    file_name: String,
    bytes: Vec<u8>,
    mode: String,
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadForm> {
    let mut file_name = String::new();
    let mut bytes = Vec::new();
    let mut mode = "descriptors".to_string();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(PicomolError::Processing(format!("upload failed: {e}"))),
        };
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().unwrap_or_default().to_string();
                bytes = field
                    .bytes()
                    .await
                    .map_err(|e| PicomolError::Processing(format!("upload failed: {e}")))?
                    .to_vec();
            }
            "mode" => {
                mode = field
                    .text()
                    .await
                    .map_err(|e| PicomolError::Processing(format!("upload failed: {e}")))?;
            }
            _ => {}
        }
    }

    if bytes.is_empty() {
        return Err(PicomolError::MalformedTable("no file uploaded".to_string()));
    }

    Ok(UploadForm { file_name, bytes, mode })
}

fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default()
}

async fn run_pipeline(state: &SharedState, form: &UploadForm) -> Result<RunReport> {
    let pipeline = PredictionPipeline::new(state.config.clone());
    let extension = extension_of(&form.file_name);
    match form.mode.as_str() {
        "molecules" => pipeline.run_molecules(&form.bytes, &extension).await,
        _ => pipeline.run_descriptor_table(&form.bytes, &extension).await,
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

pub async fn predict_page(State(_state): State<SharedState>) -> Html<String> {
    Html(render_upload_page(None))
}

pub async fn predict_submit(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Html<String> {
    let form = match read_upload(multipart).await {
        Ok(form) => form,
        Err(e) => return Html(render_upload_page(Some(&e.to_string()))),
    };

    match run_pipeline(&state, &form).await {
        Ok(report) => match download_data_uri(&report.predictions) {
            Ok(uri) => Html(render_result_page(&report, &uri)),
            Err(e) => Html(render_upload_page(Some(&e.to_string()))),
        },
        // Every pipeline failure is recoverable at the UI level: render
        // the message, never bubble it out of the handler.
        Err(e) => Html(render_upload_page(Some(&e.to_string()))),
    }
}

pub async fn api_predict(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Json<serde_json::Value> {
    let form = match read_upload(multipart).await {
        Ok(form) => form,
        Err(e) => {
            return Json(serde_json::json!({ "status": "error", "error": e.to_string() }))
        }
    };

    match run_pipeline(&state, &form).await {
        Ok(report) => Json(serde_json::json!({ "status": "success", "report": report })),
        Err(e) => Json(serde_json::json!({ "status": "error", "error": e.to_string() })),
    }
}

// ── Renderer ─────────────────────────────────────────────────────────────────

fn render_upload_page(error: Option<&str>) -> String {
    let banner = match error {
        Some(message) => format!(
            r#"<div style="border:1px solid #c33; color:#c33; padding:0.75rem; margin-bottom:1rem;">{}</div>"#,
            message
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Picomol — Bioactivity Prediction</title>
</head>
<body style="font-family: sans-serif; max-width: 720px; margin: 2rem auto;">
    <h1>Compound Bioactivity Prediction</h1>
    <p>Upload a descriptor table (.csv / .txt) or a raw molecule list
       (.smi / .txt) to score compounds with the pre-trained pIC50 model.</p>
    {}
    <form method="POST" action="/predict" enctype="multipart/form-data">
        <p><input type="file" name="file" required></p>
        <p>
            <label><input type="radio" name="mode" value="descriptors" checked>
                Precomputed descriptor table</label><br>
            <label><input type="radio" name="mode" value="molecules">
                Raw molecules (compute descriptors with PaDEL)</label>
        </p>
        <p><button type="submit">Predict</button></p>
    </form>
</body>
</html>"#,
        banner
    )
}

fn render_result_page(report: &RunReport, download_uri: &str) -> String {
    let rows: String = report
        .predictions
        .iter()
        .map(|p| {
            format!(
                r#"<tr><td style="font-family: monospace;">{}</td><td>{:.4}</td></tr>"#,
                p.compound_id, p.pic50
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Picomol — Prediction Output</title>
</head>
<body style="font-family: sans-serif; max-width: 720px; margin: 2rem auto;">
    <h1>Prediction Output</h1>
    <p>
        Job <code>{}</code> — {} input rows,
        descriptor table {}×{}, scored subset {}×{}, {} ms.
    </p>
    <p><a href="{}" download="prediction.csv">Download Predictions</a></p>
    <table border="1" cellpadding="6" style="border-collapse: collapse;">
        <thead><tr><th>compound_id</th><th>pIC50</th></tr></thead>
        <tbody>{}</tbody>
    </table>
    <p><a href="/">&larr; New prediction</a></p>
</body>
</html>"#,
        report.job_id,
        report.input_rows,
        report.descriptor_shape.0,
        report.descriptor_shape.1,
        report.subset_shape.0,
        report.subset_shape.1,
        report.duration_ms,
        download_uri,
        rows
    )
}
