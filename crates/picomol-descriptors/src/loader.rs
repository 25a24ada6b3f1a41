//! Upload parsing into the tabular model.
//!
//! Dispatch is on the declared file extension alone; an unknown extension
//! fails with `UnsupportedFormat` before anything else runs. Descriptor
//! tables carry a header row with the identifier column first; molecule
//! lists carry no header and are positional (identifier, SMILES).

use std::io::Write;
use std::path::Path;

use tracing::debug;

use picomol_common::error::{PicomolError, Result};
use picomol_common::table::{DescriptorRow, DescriptorTable, MoleculeRecord, MoleculeTable};

/// Parse an uploaded descriptor table.
///
/// `.csv` is comma-delimited, `.txt` tab-delimited; both expect a header
/// row. Every cell after the identifier column must be numeric.
pub fn load_descriptor_table(bytes: &[u8], extension: &str) -> Result<DescriptorTable> {
    let delimiter = match extension.to_ascii_lowercase().as_str() {
        "csv" => b',',
        "txt" => b'\t',
        other => return Err(PicomolError::UnsupportedFormat(other.to_string())),
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(bytes);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.len() < 2 {
        return Err(PicomolError::MalformedTable(
            "expected an identifier column and at least one descriptor column".to_string(),
        ));
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let mut fields = record.iter();
        let id = fields
            .next()
            .ok_or_else(|| PicomolError::MalformedTable(format!("row {} is empty", line + 1)))?
            .to_string();

        let mut values = Vec::with_capacity(columns.len() - 1);
        for (field, column) in fields.zip(&columns[1..]) {
            let value: f64 = field.trim().parse().map_err(|_| {
                PicomolError::MalformedTable(format!(
                    "row {}, column {}: not a number: {:?}",
                    line + 1,
                    column,
                    field
                ))
            })?;
            values.push(value);
        }
        rows.push(DescriptorRow { id, values });
    }

    debug!(rows = rows.len(), columns = columns.len(), "Parsed descriptor upload");
    Ok(DescriptorTable { columns, rows })
}

/// Parse an uploaded raw molecule list (`.smi` or `.txt`).
///
/// No header; each line is identifier then SMILES, separated by tabs or
/// spaces.
pub fn load_molecule_table(bytes: &[u8], extension: &str) -> Result<MoleculeTable> {
    match extension.to_ascii_lowercase().as_str() {
        "smi" | "txt" => {}
        other => return Err(PicomolError::UnsupportedFormat(other.to_string())),
    }

    let content = std::str::from_utf8(bytes)
        .map_err(|_| PicomolError::MalformedTable("molecule list is not valid UTF-8".to_string()))?;

    let mut records = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let id = parts.next();
        let smiles = parts.next();
        match (id, smiles) {
            (Some(id), Some(smiles)) => records.push(MoleculeRecord {
                id: id.to_string(),
                smiles: smiles.to_string(),
            }),
            _ => {
                return Err(PicomolError::MalformedTable(format!(
                    "line {}: expected identifier and SMILES",
                    line_no + 1
                )))
            }
        }
    }

    if records.is_empty() {
        return Err(PicomolError::MalformedTable("molecule list is empty".to_string()));
    }

    debug!(molecules = records.len(), "Parsed molecule upload");
    Ok(MoleculeTable { records })
}

/// Serialize a molecule table to the fixed-name work file the descriptor
/// generator consumes: tab-separated, no header.
pub fn write_molecule_file(table: &MoleculeTable, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    for record in &table.records {
        writeln!(file, "{}\t{}", record.id, record.smiles)?;
    }
    Ok(())
}
