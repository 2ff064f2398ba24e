//! Rendering partitions into files.

use serde_json::Value;

use crate::GeneratedFile;
use crate::config::{JdspecConfig, OutputFormat};
use crate::error::EmitError;
use crate::parse::spec::Swagger;
use crate::transform::Partitions;
use crate::transform::ref_rewrite::{MODEL_DIR, rewrite_refs};

/// Directory holding one document per bucket, relative to the output root.
pub const SERVICE_DIR: &str = "service";

/// Output encoding and reference layout.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    pub format: OutputFormat,
    /// JSON only; YAML has a single layout.
    pub compact: bool,
    /// Prefix placed before `model/` in rewritten references.
    pub ref_base: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Yaml,
            compact: false,
            ref_base: "..".to_string(),
        }
    }
}

impl From<&JdspecConfig> for EmitOptions {
    fn from(cfg: &JdspecConfig) -> Self {
        Self {
            format: cfg.format,
            compact: cfg.compact,
            ref_base: cfg.ref_base.clone(),
        }
    }
}

/// Render `service/<bucket>.<ext>` and `model/<Model>.<ext>` files.
pub fn render(
    partitions: &Partitions,
    options: &EmitOptions,
) -> Result<Vec<GeneratedFile>, EmitError> {
    let ext = options.format.extension();
    let mut files = Vec::with_capacity(partitions.services.len() + partitions.models.len());

    for (bucket, doc) in &partitions.services {
        let path = format!("{SERVICE_DIR}/{bucket}.{ext}");
        let content = render_document(&path, doc, options)?;
        files.push(GeneratedFile { path, content });
    }

    for (model, doc) in &partitions.models {
        let path = format!("{MODEL_DIR}/{model}.{ext}");
        let content = render_document(&path, doc, options)?;
        files.push(GeneratedFile { path, content });
    }

    Ok(files)
}

/// Encode one document, going through a JSON tree so references can be
/// rewritten structurally before the final encoding.
pub fn render_document(
    label: &str,
    doc: &Swagger,
    options: &EmitOptions,
) -> Result<String, EmitError> {
    let json_err = |source| EmitError::Json {
        document: label.to_string(),
        source,
    };

    let mut tree: Value = serde_json::to_value(doc).map_err(json_err)?;
    let rewritten = rewrite_refs(&mut tree, &options.ref_base, options.format.extension());
    log::debug!("{label}: rewrote {rewritten} references");

    match options.format {
        OutputFormat::Yaml => serde_yaml_ng::to_string(&tree).map_err(|source| EmitError::Yaml {
            document: label.to_string(),
            source,
        }),
        OutputFormat::Json if options.compact => serde_json::to_string(&tree).map_err(json_err),
        OutputFormat::Json => serde_json::to_string_pretty(&tree)
            .map(|s| s + "\n")
            .map_err(json_err),
    }
}
