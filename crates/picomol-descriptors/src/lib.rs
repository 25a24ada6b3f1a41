//! Picomol Descriptors - Upload parsing and molecular descriptor handling.
//!
//! This crate covers everything between an uploaded file and a scoring-ready
//! feature matrix:
//! 1. Parsing uploads (descriptor tables, raw molecule lists)
//! 2. Computing descriptors via the external PaDEL-Descriptor jar
//! 3. Projecting descriptor tables onto the model's feature subset

pub mod loader;
pub mod padel;
pub mod selector;

pub type Result<T> = picomol_common::error::Result<T>;
