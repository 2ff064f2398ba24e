//! Where the Swagger document comes from.
//!
//! Parsing Go annotations is left to an external scanner program; this module
//! either runs it or reads a document it produced earlier.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::ScanConfig;
use crate::error::{LoadError, ParseError};
use crate::parse::{self, spec::Swagger};

/// Produces the document the pipeline rewrites.
pub trait SpecSource {
    fn load(&self) -> Result<Swagger, LoadError>;
}

/// Parse `content` as JSON when `path` ends in `.json`, YAML otherwise.
pub fn parse_document(path: &Path, content: &str) -> Result<Swagger, ParseError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");
    match ext {
        "json" => parse::from_json(content),
        _ => parse::from_yaml(content),
    }
}

/// An already-scanned document on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SpecSource for FileSource {
    fn load(&self) -> Result<Swagger, LoadError> {
        let content = fs::read_to_string(&self.path).map_err(|source| LoadError::Read {
            path: self.path.clone(),
            source,
        })?;
        let spec = parse_document(&self.path, &content).map_err(|source| LoadError::Parse {
            path: self.path.clone(),
            source,
        })?;
        log::debug!(
            "loaded {}: {} paths, {} definitions",
            self.path.display(),
            spec.paths.len(),
            spec.definitions.len()
        );
        Ok(spec)
    }
}

/// Runs `<program> generate spec ...` and reads the document from its stdout.
#[derive(Debug, Clone)]
pub struct ScannerSource {
    program: String,
    seed: Option<PathBuf>,
    base_path: PathBuf,
    build_tags: String,
    scan_models: bool,
}

impl ScannerSource {
    pub fn new(program: impl Into<String>, scan: &ScanConfig, seed: Option<&Path>) -> Self {
        Self {
            program: program.into(),
            seed: seed.map(Path::to_path_buf),
            base_path: PathBuf::from(&scan.base_path),
            build_tags: scan.tags.clone(),
            scan_models: scan.scan_models,
        }
    }

    /// Command-line arguments handed to the scanner.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["generate".into(), "spec".into()];
        args.push("--base-path".into());
        args.push(self.base_path.clone().into_os_string());
        if !self.build_tags.is_empty() {
            args.push("--tags".into());
            args.push(self.build_tags.clone().into());
        }
        if self.scan_models {
            args.push("--scan-models".into());
        }
        if let Some(seed) = &self.seed {
            args.push("--input".into());
            args.push(seed.clone().into_os_string());
        }
        args
    }
}

impl SpecSource for ScannerSource {
    fn load(&self) -> Result<Swagger, LoadError> {
        log::debug!("running scanner {} {:?}", self.program, self.args());
        let output = Command::new(&self.program)
            .args(self.args())
            .output()
            .map_err(|source| LoadError::ScannerSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(LoadError::ScannerFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse::from_json(&stdout).map_err(LoadError::ScannerOutput)
    }
}
