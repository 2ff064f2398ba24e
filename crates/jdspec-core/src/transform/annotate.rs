use crate::parse::extensions::{Extensions, X_GO_NAME, X_GO_PACKAGE};
use crate::parse::schema::Schema;
use crate::parse::spec::Swagger;

/// Stamp the vendor module on every definition and strip Go leakage fields.
///
/// An empty or absent `module` clears the tag instead of setting it. Never
/// fails: removing a key that is not there is a no-op.
pub fn annotate(spec: &mut Swagger, module: Option<&str>) {
    let module = module.filter(|m| !m.is_empty());

    for schema in spec.definitions.values_mut() {
        schema.module = module.map(str::to_string);
        strip_leakage(schema);
    }

    for response in spec.responses.values_mut() {
        strip_extensions(&mut response.extensions);
        if let Some(schema) = response.schema.as_mut() {
            strip_leakage(schema);
        }
    }

    log::debug!(
        "annotated {} definitions and {} responses (module: {})",
        spec.definitions.len(),
        spec.responses.len(),
        module.unwrap_or("<none>")
    );
}

/// Remove the Go leakage keys from `schema` and every schema nested below it.
fn strip_leakage(schema: &mut Schema) {
    strip_extensions(&mut schema.extensions);
    schema.walk_children_mut(&mut |child: &mut Schema| {
        strip_extensions(&mut child.extensions);
    });
}

fn strip_extensions(extensions: &mut Extensions) {
    extensions.remove(X_GO_NAME);
    extensions.remove(X_GO_PACKAGE);
}
