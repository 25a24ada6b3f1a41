//! picomol-web — Web front end for Picomol
//! Provides the single-page prediction workflow:
//!   - Upload form (descriptor table or raw molecule list)
//!   - Pipeline run trigger
//!   - Ranked prediction table with base64 CSV download
//!   - JSON API for scripted use

pub mod handlers;
pub mod router;
pub mod state;
