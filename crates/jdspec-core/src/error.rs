use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported Swagger version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: ParseError },

    #[error("failed to run scanner `{program}`: {source}")]
    ScannerSpawn { program: String, source: io::Error },

    #[error("scanner `{program}` exited with {status}: {stderr}")]
    ScannerFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("scanner output is not a valid spec: {0}")]
    ScannerOutput(ParseError),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid response reference `{reference}` in {method} {path}")]
    InvalidRefFormat {
        reference: String,
        method: String,
        path: String,
    },
}

#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("definitions `{first}` and `{second}` both map to model file `{model}`")]
    DuplicateModel {
        model: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("partition error: {0}")]
    Partition(#[from] PartitionError),
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to encode {document} as JSON: {source}")]
    Json {
        document: String,
        source: serde_json::Error,
    },

    #[error("failed to encode {document} as YAML: {source}")]
    Yaml {
        document: String,
        source: serde_yaml_ng::Error,
    },
}
