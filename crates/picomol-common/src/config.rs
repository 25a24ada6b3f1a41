//! Service configuration.
//!
//! Everything a pipeline run needs to find on disk (the scoring artifact,
//! the required-descriptor list, the PaDEL-Descriptor installation) plus
//! the web bind address. Loadable from YAML or JSON; every field has a
//! default so a bare file (or none at all) still yields a working dev
//! configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Complete service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Read-only reference artifacts consumed by every run
    #[serde(default)]
    pub artifacts: ArtifactConfig,

    /// External descriptor generator invocation
    #[serde(default)]
    pub padel: PadelConfig,

    /// Web server bind options
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactConfig::default(),
            padel: PadelConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

// ── Reference artifacts ──────────────────────────────────────────────────────

/// Paths of the externally provisioned, read-only reference artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Serialized pre-trained regression model (JSON)
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// CSV whose header row is the ordered required-descriptor list
    #[serde(default = "default_feature_list_path")]
    pub feature_list_path: PathBuf,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("artifacts/bioactivity_model.json")
}
fn default_feature_list_path() -> PathBuf {
    PathBuf::from("artifacts/descriptor_list.csv")
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            feature_list_path: default_feature_list_path(),
        }
    }
}

// ── PaDEL-Descriptor ─────────────────────────────────────────────────────────

/// Invocation options for the external PaDEL-Descriptor jar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PadelConfig {
    /// Java launcher binary
    #[serde(default = "default_java_bin")]
    pub java_bin: String,

    /// Path to PaDEL-Descriptor.jar
    #[serde(default = "default_jar_path")]
    pub jar_path: PathBuf,

    /// Fingerprint definition XML handed to `-descriptortypes`
    #[serde(default = "default_descriptor_types")]
    pub descriptor_types: PathBuf,

    /// JVM heap size, applied to both -Xms and -Xmx (e.g. "2G")
    #[serde(default = "default_heap")]
    pub heap: String,

    /// Directory scanned by the jar; also holds the fixed-name work files
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Fixed name of the molecule file written for the jar to consume
    #[serde(default = "default_molecule_file")]
    pub molecule_file: String,

    /// Fixed name of the descriptor CSV the jar produces
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

fn default_java_bin() -> String {
    "java".to_string()
}
fn default_jar_path() -> PathBuf {
    PathBuf::from("PaDEL-Descriptor/PaDEL-Descriptor.jar")
}
fn default_descriptor_types() -> PathBuf {
    PathBuf::from("PaDEL-Descriptor/PubchemFingerprinter.xml")
}
fn default_heap() -> String {
    "2G".to_string()
}
fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_molecule_file() -> String {
    "query_molecules.smi".to_string()
}
fn default_output_file() -> String {
    "descriptors_output.csv".to_string()
}

impl Default for PadelConfig {
    fn default() -> Self {
        Self {
            java_bin: default_java_bin(),
            jar_path: default_jar_path(),
            descriptor_types: default_descriptor_types(),
            heap: default_heap(),
            work_dir: default_work_dir(),
            molecule_file: default_molecule_file(),
            output_file: default_output_file(),
        }
    }
}

// ── Web server ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ── Helper Methods ───────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load from YAML file
    pub fn from_yaml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from JSON file
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.padel.java_bin, "java");
        assert_eq!(config.padel.output_file, "descriptors_output.csv");
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = ServiceConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: ServiceConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.padel.jar_path, parsed.padel.jar_path);
        assert_eq!(config.artifacts.model_path, parsed.artifacts.model_path);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "padel:\n  heap: 4G\n";
        let config: ServiceConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.padel.heap, "4G");
        assert_eq!(config.padel.java_bin, "java");
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
