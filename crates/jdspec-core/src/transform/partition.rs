use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;

use super::casing::{lower_first, upper_first};
use crate::error::PartitionError;
use crate::parse::spec::Swagger;

/// The documents a spec is split into, keyed by output identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partitions {
    /// Bucket name -> document holding only that bucket's paths.
    pub services: IndexMap<String, Swagger>,
    /// Model identifier (`upperFirst(name)`) -> single-definition document.
    pub models: IndexMap<String, Swagger>,
}

/// Split `spec` into one document per file-group bucket and one per definition.
///
/// `file_tag` is consumed from every path's extensions; paths without a
/// string value for it, or whose value is not a plain file name, land in
/// `default_bucket`.
pub fn partition(
    mut spec: Swagger,
    file_tag: &str,
    default_bucket: &str,
) -> Result<Partitions, PartitionError> {
    let paths = std::mem::take(&mut spec.paths);
    let definitions = std::mem::take(&mut spec.definitions);
    spec.responses.clear();

    let mut services: IndexMap<String, Swagger> = IndexMap::new();
    for (path, mut item) in paths {
        let bucket = match item.extensions.remove(file_tag) {
            Some(Value::String(name)) if is_file_stem(&name) => name,
            Some(other) => {
                log::warn!("ignoring {file_tag} = {other} on {path}, using {default_bucket}");
                default_bucket.to_string()
            }
            None => default_bucket.to_string(),
        };
        log::debug!("{path} -> {bucket}");
        services
            .entry(bucket)
            .or_insert_with(|| spec.clone())
            .paths
            .insert(path, item);
    }

    let mut models: IndexMap<String, Swagger> = IndexMap::new();
    let mut sources: HashMap<String, String> = HashMap::new();
    for (name, schema) in definitions {
        let model = upper_first(&name);
        if let Some(first) = sources.get(&model) {
            return Err(PartitionError::DuplicateModel {
                model,
                first: first.clone(),
                second: name,
            });
        }

        let mut doc = Swagger::with_version(spec.swagger.clone());
        doc.definitions.insert(lower_first(&name), schema);
        models.insert(model.clone(), doc);
        sources.insert(model, name);
    }

    log::debug!(
        "partitioned into {} service and {} model documents",
        services.len(),
        models.len()
    );
    Ok(Partitions { services, models })
}

/// A bucket name usable as a single file name inside the service directory.
fn is_file_stem(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
