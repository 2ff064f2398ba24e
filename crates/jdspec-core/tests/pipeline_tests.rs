use std::collections::HashSet;

use jdspec_core::emit::{self, EmitOptions};
use jdspec_core::parse;
use jdspec_core::parse::operation::HttpMethod;
use jdspec_core::parse::parameter::{ParameterLocation, ParameterOrRef};
use jdspec_core::parse::response::ResponseOrRef;
use jdspec_core::parse::schema::X_JDCLOUD_MODULE;
use jdspec_core::parse::spec::Swagger;
use jdspec_core::transform::{self, TransformOptions, Transformed};

const WIDGETS: &str = include_str!("fixtures/widgets.yaml");

fn run(module: Option<&str>) -> Transformed {
    let spec = parse::from_yaml(WIDGETS).unwrap();
    let options = TransformOptions {
        module: module.map(str::to_string),
        ..TransformOptions::default()
    };
    transform::transform_with_options(spec, &options).unwrap()
}

fn all_services(out: &Transformed) -> impl Iterator<Item = &Swagger> {
    out.partitions.services.values()
}

#[test]
fn module_tag_on_every_model() {
    let out = run(Some("widget"));
    for doc in out.partitions.models.values() {
        for schema in doc.definitions.values() {
            assert_eq!(schema.module.as_deref(), Some("widget"));
        }
    }

    let out = run(Some(""));
    for doc in out.partitions.models.values() {
        for schema in doc.definitions.values() {
            assert_eq!(schema.module, None);
        }
    }
}

#[test]
fn at_most_one_ok_response_per_operation() {
    let out = run(None);
    for doc in all_services(&out) {
        for item in doc.paths.values() {
            for (_, op) in item.operations() {
                let codes: Vec<u16> = op.responses.status_codes.keys().copied().collect();
                assert!(codes.is_empty() || codes == [200], "unexpected codes {codes:?}");
            }
        }
    }
}

#[test]
fn no_header_parameters_survive() {
    let out = run(None);
    for doc in all_services(&out) {
        for item in doc.paths.values() {
            for (_, op) in item.operations() {
                for param in &op.parameters {
                    if let ParameterOrRef::Parameter(p) = param {
                        assert_ne!(p.location, ParameterLocation::Header);
                        assert!(!p.extensions.contains_key("x-go-name"));
                        if p.location == ParameterLocation::Body {
                            assert_eq!(p.tiered, Some(false));
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn no_go_leakage_in_models() {
    let out = run(Some("widget"));
    for doc in out.partitions.models.values() {
        for schema in doc.definitions.values() {
            assert!(!schema.extensions.contains_key("x-go-package"));
            for prop in schema.properties.values() {
                assert!(!prop.extensions.contains_key("x-go-name"));
            }
        }
    }
}

#[test]
fn inlined_responses_are_stripped() {
    let out = run(None);
    let widget = &out.partitions.services["Widget"];
    let get = widget.paths["/regions/{regionId}/widgets"].get.as_ref().unwrap();
    match &get.responses.status_codes[&200u16] {
        ResponseOrRef::Response(r) => {
            assert_eq!(r.description, "widgets in the region");
            let body = r.schema.as_ref().unwrap();
            assert!(!body.properties["requestId"].extensions.contains_key("x-go-name"));
        }
        other => panic!("expected inlined response, got {other:?}"),
    }
    assert!(get.responses.default.is_some());
}

#[test]
fn paths_partitioned_without_loss_or_duplicates() {
    let input = parse::from_yaml(WIDGETS).unwrap();
    let expected: HashSet<String> = input.paths.keys().cloned().collect();

    let out = run(None);
    let mut seen = HashSet::new();
    for doc in all_services(&out) {
        for path in doc.paths.keys() {
            assert!(seen.insert(path.clone()), "{path} appears twice");
        }
    }
    assert_eq!(seen, expected);

    assert_eq!(out.partitions.services["Widget"].paths.len(), 2);
    let default: Vec<&String> = out.partitions.services["Default"].paths.keys().collect();
    assert_eq!(default, ["/regions/{regionId}/quota"]);
}

#[test]
fn models_partitioned_without_loss_or_duplicates() {
    let out = run(None);
    let names: HashSet<&str> = out.partitions.models.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        HashSet::from(["Widget", "WidgetSpec", "Tag", "Quota"])
    );
    for doc in out.partitions.models.values() {
        assert_eq!(doc.definitions.len(), 1);
    }
    assert!(out.partitions.models["Quota"].definitions.contains_key("quota"));
    assert!(out.partitions.models["WidgetSpec"].definitions.contains_key("widgetSpec"));
}

#[test]
fn unresolved_response_is_warned_not_fatal() {
    let out = run(None);
    assert_eq!(out.report.unresolved.len(), 1);
    let missing = &out.report.unresolved[0];
    assert_eq!(missing.name, "missingResponse");
    assert_eq!(missing.method, HttpMethod::Delete);
    assert_eq!(missing.path, "/regions/{regionId}/widgets/{widgetId}");

    let item = &out.partitions.services["Widget"].paths["/regions/{regionId}/widgets/{widgetId}"];
    assert_eq!(
        item.delete.as_ref().unwrap().responses.status_codes[&200u16],
        ResponseOrRef::reference("#/responses/missingResponse")
    );

    let files = emit::render(&out.partitions, &EmitOptions::default()).unwrap();
    assert_eq!(files.len(), 2 + 4);
}

#[test]
fn group_scenario() {
    let yaml = r##"
swagger: "2.0"
paths:
  /a:
    x-jdcloud-file: Group1
    get:
      responses: {}
  /b:
    get:
      responses: {}
definitions:
  Foo:
    type: object
  Bar:
    type: object
"##;
    let spec = parse::from_yaml(yaml).unwrap();
    let out = transform::transform(spec).unwrap();
    let files = emit::render(&out.partitions, &EmitOptions::default()).unwrap();

    let by_path = |p: &str| {
        let file = files
            .iter()
            .find(|f| f.path == p)
            .unwrap_or_else(|| panic!("missing {p}"));
        serde_yaml_ng::from_str::<serde_json::Value>(&file.content).unwrap()
    };

    let group1 = by_path("service/Group1.yaml");
    let paths: Vec<&String> = group1["paths"].as_object().unwrap().keys().collect();
    assert_eq!(paths, ["/a"]);
    assert!(group1["paths"]["/a"].get("x-jdcloud-file").is_none());
    assert!(group1.get("definitions").is_none());

    let default = by_path("service/Default.yaml");
    let paths: Vec<&String> = default["paths"].as_object().unwrap().keys().collect();
    assert_eq!(paths, ["/b"]);

    let foo = by_path("model/Foo.yaml");
    let keys: Vec<&String> = foo["definitions"].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["foo"]);
    let bar = by_path("model/Bar.yaml");
    let keys: Vec<&String> = bar["definitions"].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["bar"]);
}

#[test]
fn emitted_references_point_at_model_files() {
    let out = run(Some("widget"));
    let files = emit::render(&out.partitions, &EmitOptions::default()).unwrap();

    let service = files
        .iter()
        .find(|f| f.path == "service/Widget.yaml")
        .unwrap();
    assert!(service.content.contains("../model/WidgetSpec.yaml#/definitions/widgetSpec"));
    assert!(service.content.contains("../model/Widget.yaml#/definitions/widget"));
    assert!(!service.content.contains("'#/definitions/"));
    assert!(!service.content.contains("\"#/definitions/"));

    let model = files.iter().find(|f| f.path == "model/Widget.yaml").unwrap();
    assert!(model.content.contains("../model/Tag.yaml#/definitions/tag"));
    assert!(model.content.contains(&format!("{X_JDCLOUD_MODULE}: widget")));
    assert!(!model.content.contains("x-go-package"));
}

#[test]
fn malformed_response_reference_fails_the_run() {
    let yaml = r#"
swagger: "2.0"
paths:
  /a:
    get:
      responses:
        "200":
          $ref: okResponse
"#;
    let spec = parse::from_yaml(yaml).unwrap();
    assert!(transform::transform(spec).is_err());
}
