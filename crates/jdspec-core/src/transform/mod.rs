//! The rewrite pipeline: annotate, resolve responses, partition.
//!
//! Reference rewriting runs later, on the serialized documents (see
//! [`crate::emit`]).

pub mod annotate;
pub mod casing;
pub mod partition;
pub mod ref_rewrite;
pub mod response_resolver;

use crate::config::{DEFAULT_BUCKET, DEFAULT_FILE_TAG, JdspecConfig};
use crate::error::TransformError;
use crate::parse::spec::Swagger;

pub use annotate::annotate;
pub use partition::{Partitions, partition};
pub use response_resolver::{ResolveReport, UnresolvedResponse, resolve_responses};

/// Options controlling the pipeline.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Vendor module stamped on every definition. Empty means none.
    pub module: Option<String>,
    /// Path extension naming the service document.
    pub file_tag: String,
    /// Service document for paths without a file tag.
    pub default_bucket: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            module: None,
            file_tag: DEFAULT_FILE_TAG.to_string(),
            default_bucket: DEFAULT_BUCKET.to_string(),
        }
    }
}

impl From<&JdspecConfig> for TransformOptions {
    fn from(cfg: &JdspecConfig) -> Self {
        Self {
            module: cfg.module.clone(),
            file_tag: cfg.file_tag.clone(),
            default_bucket: cfg.default_bucket.clone(),
        }
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub partitions: Partitions,
    pub report: ResolveReport,
}

/// Run the pipeline with default options.
pub fn transform(spec: Swagger) -> Result<Transformed, TransformError> {
    transform_with_options(spec, &TransformOptions::default())
}

/// Run the pipeline over `spec`, consuming it.
pub fn transform_with_options(
    mut spec: Swagger,
    options: &TransformOptions,
) -> Result<Transformed, TransformError> {
    annotate(&mut spec, options.module.as_deref());
    let report = resolve_responses(&mut spec)?;
    let partitions = partition(spec, &options.file_tag, &options.default_bucket)?;
    Ok(Transformed { partitions, report })
}
