use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Path extension that names the service document a path is written to.
pub const DEFAULT_FILE_TAG: &str = "x-jdcloud-file";

/// Bucket for paths that carry no file tag.
pub const DEFAULT_BUCKET: &str = "Default";

/// Top-level project configuration loaded from `.jdspec.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JdspecConfig {
    /// Seed document handed to the scanner, or the already-scanned document
    /// when no scanner is configured.
    pub input: Option<String>,
    /// Root directory receiving `service/` and `model/`.
    pub output: String,
    pub scan: ScanConfig,
    pub module: Option<String>,
    pub file_tag: String,
    pub default_bucket: String,
    pub ref_base: String,
    pub format: OutputFormat,
    pub compact: bool,
}

impl Default for JdspecConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: ".".to_string(),
            scan: ScanConfig::default(),
            module: None,
            file_tag: DEFAULT_FILE_TAG.to_string(),
            default_bucket: DEFAULT_BUCKET.to_string(),
            ref_base: "..".to_string(),
            format: OutputFormat::Yaml,
            compact: false,
        }
    }
}

/// Options passed through to the external annotation scanner.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Scanner program; `None` means the input is already a scanned spec.
    pub scanner: Option<String>,
    pub base_path: String,
    pub tags: String,
    pub scan_models: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scanner: None,
            base_path: ".".to_string(),
            tags: String::new(),
            scan_models: false,
        }
    }
}

/// Encoding of the emitted documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// File extension, also used in rewritten model references.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".jdspec.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<JdspecConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: JdspecConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# jdspec configuration
# input: swagger.yaml     # seed spec for the scanner, or an already-scanned spec
output: .                 # receives service/ and model/

scan:
  # scanner: swagger      # run `<scanner> generate spec` instead of reading input as-is
  base_path: .
  tags: ""
  scan_models: false

# module: vm              # x-jdcloud-module stamped on every definition
file_tag: x-jdcloud-file  # path extension naming the service file
default_bucket: Default   # service file for untagged paths
ref_base: ..              # prefix of rewritten model references
format: yaml              # yaml | json
compact: false            # json only: skip pretty printing
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JdspecConfig::default();
        assert_eq!(config.input, None);
        assert_eq!(config.output, ".");
        assert_eq!(config.file_tag, DEFAULT_FILE_TAG);
        assert_eq!(config.default_bucket, "Default");
        assert_eq!(config.ref_base, "..");
        assert_eq!(config.format, OutputFormat::Yaml);
        assert!(config.scan.scanner.is_none());
        assert!(!config.scan.scan_models);
        assert!(!config.compact);
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: seed.json
output: out
scan:
  scanner: swagger
  base_path: ./api
  tags: jdcloud
  scan_models: true
module: vpc
file_tag: x-save-file
default_bucket: Common
ref_base: ../..
format: json
compact: true
"#;
        let config: JdspecConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input.as_deref(), Some("seed.json"));
        assert_eq!(config.output, "out");
        assert_eq!(config.scan.scanner.as_deref(), Some("swagger"));
        assert_eq!(config.scan.base_path, "./api");
        assert_eq!(config.scan.tags, "jdcloud");
        assert!(config.scan.scan_models);
        assert_eq!(config.module.as_deref(), Some("vpc"));
        assert_eq!(config.file_tag, "x-save-file");
        assert_eq!(config.default_bucket, "Common");
        assert_eq!(config.ref_base, "../..");
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.compact);
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "module: vm\n";
        let config: JdspecConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.module.as_deref(), Some("vm"));
        assert_eq!(config.output, ".");
        assert_eq!(config.scan.base_path, ".");
        assert_eq!(config.format, OutputFormat::Yaml);
    }

    #[test]
    fn test_default_content_parses() {
        let config: JdspecConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.file_tag, DEFAULT_FILE_TAG);
        assert_eq!(config.ref_base, "..");
    }

    #[test]
    fn test_extension_follows_format() {
        assert_eq!(OutputFormat::Yaml.extension(), "yaml");
        assert_eq!(OutputFormat::Json.extension(), "json");
    }
}
