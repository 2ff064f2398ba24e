use indexmap::IndexSet;
use serde_json::Value;

use super::casing::{lower_first, upper_first};

/// Prefix of a reference into the same document's definitions.
pub const LOCAL_DEFINITIONS: &str = "#/definitions/";

/// Directory holding one document per model, relative to the output root.
pub const MODEL_DIR: &str = "model";

/// Cross-document reference to the model file of `name`.
///
/// `model_ref("Widget", "..", "yaml")` is `../model/Widget.yaml#/definitions/widget`.
pub fn model_ref(name: &str, base: &str, extension: &str) -> String {
    let base = base.trim_end_matches('/');
    let file = format!(
        "{MODEL_DIR}/{}.{extension}{LOCAL_DEFINITIONS}{}",
        upper_first(name),
        lower_first(name)
    );
    if base.is_empty() {
        file
    } else {
        format!("{base}/{file}")
    }
}

/// Model identifier named by a reference built with [`model_ref`].
pub fn model_name_from_ref(reference: &str) -> Option<&str> {
    let (file, _) = reference.split_once('#')?;
    let file = file.rsplit('/').next()?;
    let (stem, _) = file.rsplit_once('.')?;
    (!stem.is_empty()).then_some(stem)
}

/// Point every local `#/definitions/<Name>` reference in `doc` at the split
/// model files. Returns how many references were rewritten.
///
/// Only string values of `$ref` members are touched; external references and
/// references into other sections stay as they are.
pub fn rewrite_refs(doc: &mut Value, base: &str, extension: &str) -> usize {
    match doc {
        Value::Object(map) => {
            let mut rewritten = 0;
            for (key, value) in map.iter_mut() {
                if key == "$ref" {
                    if let Value::String(target) = value {
                        if let Some(name) = target.strip_prefix(LOCAL_DEFINITIONS) {
                            let external = model_ref(name, base, extension);
                            *target = external;
                            rewritten += 1;
                        }
                        continue;
                    }
                }
                rewritten += rewrite_refs(value, base, extension);
            }
            rewritten
        }
        Value::Array(items) => items
            .iter_mut()
            .map(|item| rewrite_refs(item, base, extension))
            .sum(),
        _ => 0,
    }
}

/// Models named by the rewritten `$ref` values in `doc`, in first-seen order.
pub fn referenced_models(doc: &Value) -> Vec<String> {
    let mut names = IndexSet::new();
    collect_models(doc, &mut names);
    names.into_iter().collect()
}

fn collect_models(doc: &Value, names: &mut IndexSet<String>) {
    match doc {
        Value::Object(map) => {
            for (key, value) in map {
                match (key.as_str(), value) {
                    ("$ref", Value::String(target)) => {
                        if let Some(name) = model_name_from_ref(target) {
                            names.insert(name.to_string());
                        }
                    }
                    _ => collect_models(value, names),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_models(item, names)),
        _ => {}
    }
}
