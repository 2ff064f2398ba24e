use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::ResolveError;
use crate::parse::extensions::X_GO_NAME;
use crate::parse::operation::{HttpMethod, Operation};
use crate::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};
use crate::parse::response::{Response, ResponseOrRef};
use crate::parse::spec::Swagger;

/// Prefix of a reference to a shared parameter.
const SHARED_PARAMETERS: &str = "#/parameters/";

/// The only status code that survives resolution.
pub const STATUS_OK: u16 = 200;

/// A 200 response whose reusable response could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedResponse {
    pub path: String,
    pub method: HttpMethod,
    pub name: String,
}

/// Non-fatal findings of [`resolve_responses`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub unresolved: Vec<UnresolvedResponse>,
}

impl ResolveReport {
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Inline every 200 response, drop the other status codes and conform
/// parameters to the vendor convention.
///
/// The reusable `responses` map is consumed: it is empty afterwards. Shared
/// header parameters are removed along with every reference to them.
pub fn resolve_responses(spec: &mut Swagger) -> Result<ResolveReport, ResolveError> {
    let reusable = std::mem::take(&mut spec.responses);
    let mut report = ResolveReport::default();

    let mut shared = IndexMap::new();
    let mut headers = HashSet::new();
    for (name, param) in std::mem::take(&mut spec.parameters) {
        match conform_parameter(param) {
            Some(param) => {
                shared.insert(name, param);
            }
            None => {
                headers.insert(name);
            }
        }
    }
    spec.parameters = shared;

    for (path, item) in spec.paths.iter_mut() {
        item.parameters = conform_parameters(std::mem::take(&mut item.parameters), &headers);

        for (method, op) in item.operations_mut() {
            let mut resolver = OperationResolver {
                reusable: &reusable,
                headers: &headers,
                report: &mut report,
                path: path.as_str(),
                method,
            };
            resolver.resolve(op)?;
        }
    }

    log::debug!(
        "resolved responses across {} paths, {} unresolved",
        spec.paths.len(),
        report.unresolved.len()
    );
    Ok(report)
}

struct OperationResolver<'a> {
    reusable: &'a IndexMap<String, Response>,
    headers: &'a HashSet<String>,
    report: &'a mut ResolveReport,
    path: &'a str,
    method: HttpMethod,
}

impl OperationResolver<'_> {
    fn resolve(&mut self, op: &mut Operation) -> Result<(), ResolveError> {
        let mut status_codes = std::mem::take(&mut op.responses.status_codes);
        let mut kept = IndexMap::new();
        if let Some(ok) = status_codes.shift_remove(&STATUS_OK) {
            kept.insert(STATUS_OK, self.resolve_ok(ok)?);
        }
        op.responses.status_codes = kept;

        op.parameters = conform_parameters(std::mem::take(&mut op.parameters), self.headers);
        Ok(())
    }

    fn resolve_ok(&mut self, response: ResponseOrRef) -> Result<ResponseOrRef, ResolveError> {
        let ref_path = match response {
            ResponseOrRef::Ref { ref_path } => ref_path,
            inline => return Ok(inline),
        };

        let name = ref_name(&ref_path).ok_or_else(|| ResolveError::InvalidRefFormat {
            reference: ref_path.clone(),
            method: self.method.to_string(),
            path: self.path.to_string(),
        })?;

        match self.reusable.get(name) {
            Some(resolved) => Ok(ResponseOrRef::Response(resolved.clone())),
            None => {
                log::warn!(
                    "unresolved response `{}` for {} {}",
                    name,
                    self.method,
                    self.path
                );
                self.report.unresolved.push(UnresolvedResponse {
                    path: self.path.to_string(),
                    method: self.method,
                    name: name.to_string(),
                });
                Ok(ResponseOrRef::Ref { ref_path })
            }
        }
    }
}

/// Terminal segment of a pointer like `#/responses/widgetResponse`.
fn ref_name(ref_path: &str) -> Option<&str> {
    let (_, name) = ref_path.rsplit_once('/')?;
    (!name.is_empty()).then_some(name)
}

/// Drop header parameters, mark body parameters untiered and strip `x-go-name`.
///
/// `headers` names the shared `#/parameters/` entries that were header
/// parameters; references to them are dropped too.
fn conform_parameters(
    parameters: Vec<ParameterOrRef>,
    headers: &HashSet<String>,
) -> Vec<ParameterOrRef> {
    parameters
        .into_iter()
        .filter_map(|param| match param {
            ParameterOrRef::Parameter(p) => conform_parameter(p).map(ParameterOrRef::Parameter),
            ParameterOrRef::Ref { ref_path } => {
                let shared = ref_path.strip_prefix(SHARED_PARAMETERS);
                if shared.is_some_and(|name| headers.contains(name)) {
                    return None;
                }
                Some(ParameterOrRef::Ref { ref_path })
            }
        })
        .collect()
}

fn conform_parameter(mut param: Parameter) -> Option<Parameter> {
    match param.location {
        ParameterLocation::Header => return None,
        ParameterLocation::Body => param.tiered = Some(false),
        _ => {}
    }
    param.extensions.remove(X_GO_NAME);
    Some(param)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::operation::PathItem;
    use crate::parse::schema::Schema;
    use serde_json::json;

    fn widget_response() -> Response {
        Response {
            description: "a widget".to_string(),
            schema: Some(Schema::reference("#/definitions/Widget")),
            ..Response::default()
        }
    }

    fn spec_with(op: Operation) -> Swagger {
        let mut spec = Swagger::with_version("2.0");
        spec.responses
            .insert("WidgetResponse".to_string(), widget_response());
        spec.paths.insert(
            "/widgets".to_string(),
            PathItem {
                get: Some(op),
                ..PathItem::default()
            },
        );
        spec
    }

    fn get_op(spec: &Swagger) -> &Operation {
        spec.paths["/widgets"].get.as_ref().unwrap()
    }

    #[test]
    fn test_ok_inlined_and_others_dropped() {
        let mut op = Operation::default();
        op.responses
            .status_codes
            .insert(200, ResponseOrRef::reference("#/responses/WidgetResponse"));
        op.responses
            .status_codes
            .insert(404, ResponseOrRef::reference("#/responses/notFound"));
        let mut spec = spec_with(op);

        let report = resolve_responses(&mut spec).unwrap();

        assert!(report.is_clean());
        let responses = &get_op(&spec).responses.status_codes;
        assert_eq!(responses.len(), 1);
        assert_eq!(
            responses[&STATUS_OK],
            ResponseOrRef::Response(widget_response())
        );
        assert!(spec.responses.is_empty());
    }

    #[test]
    fn test_unresolved_ok_is_reported_and_kept() {
        let mut op = Operation::default();
        op.responses
            .status_codes
            .insert(200, ResponseOrRef::reference("#/responses/missing"));
        let mut spec = spec_with(op);

        let report = resolve_responses(&mut spec).unwrap();

        assert_eq!(
            report.unresolved,
            vec![UnresolvedResponse {
                path: "/widgets".to_string(),
                method: HttpMethod::Get,
                name: "missing".to_string(),
            }]
        );
        assert_eq!(
            get_op(&spec).responses.status_codes[&STATUS_OK],
            ResponseOrRef::reference("#/responses/missing")
        );
    }

    #[test]
    fn test_malformed_ref_is_an_error() {
        let mut op = Operation::default();
        op.responses
            .status_codes
            .insert(200, ResponseOrRef::reference("WidgetResponse"));
        let mut spec = spec_with(op);

        let err = resolve_responses(&mut spec).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidRefFormat { .. }));
    }

    #[test]
    fn test_trailing_slash_ref_is_an_error() {
        assert_eq!(ref_name("#/responses/"), None);
        assert_eq!(ref_name("#/responses/ok"), Some("ok"));
        assert_eq!(ref_name("other.yaml#/responses/ok"), Some("ok"));
    }

    #[test]
    fn test_inline_ok_untouched_and_no_ok_leaves_empty_map() {
        let inline = ResponseOrRef::Response(Response {
            description: "inline".to_string(),
            ..Response::default()
        });
        let mut with_ok = Operation::default();
        with_ok.responses.status_codes.insert(200, inline.clone());
        let mut without_ok = Operation::default();
        without_ok
            .responses
            .status_codes
            .insert(500, inline.clone());

        let mut spec = spec_with(with_ok);
        spec.paths["/widgets"].delete = Some(without_ok);

        resolve_responses(&mut spec).unwrap();

        let item = &spec.paths["/widgets"];
        assert_eq!(
            item.get.as_ref().unwrap().responses.status_codes[&STATUS_OK],
            inline
        );
        assert!(item.delete.as_ref().unwrap().responses.status_codes.is_empty());
    }

    #[test]
    fn test_default_response_left_alone() {
        let mut op = Operation::default();
        op.responses.default = Some(ResponseOrRef::reference("#/responses/error"));
        let mut spec = spec_with(op);

        resolve_responses(&mut spec).unwrap();
        assert!(get_op(&spec).responses.default.is_some());
    }

    #[test]
    fn test_parameters_conformed() {
        let mut body = Parameter::new("body", ParameterLocation::Body);
        body.extensions.insert(X_GO_NAME, json!("Body"));
        let mut query = Parameter::new("page", ParameterLocation::Query);
        query.extensions.insert(X_GO_NAME, json!("Page"));
        query.extensions.insert("x-keep", json!(1));

        let mut op = Operation::default();
        op.parameters = vec![
            ParameterOrRef::Parameter(Parameter::new("x-request-id", ParameterLocation::Header)),
            ParameterOrRef::Parameter(body),
            ParameterOrRef::Parameter(query),
            ParameterOrRef::Ref {
                ref_path: "#/parameters/region".to_string(),
            },
        ];
        let mut spec = spec_with(op);
        spec.paths["/widgets"].parameters = vec![ParameterOrRef::Parameter(Parameter::new(
            "Authorization",
            ParameterLocation::Header,
        ))];

        resolve_responses(&mut spec).unwrap();

        assert!(spec.paths["/widgets"].parameters.is_empty());
        let params = &get_op(&spec).parameters;
        assert_eq!(params.len(), 3);
        match &params[0] {
            ParameterOrRef::Parameter(p) => {
                assert_eq!(p.location, ParameterLocation::Body);
                assert_eq!(p.tiered, Some(false));
                assert!(!p.extensions.contains_key(X_GO_NAME));
            }
            other => panic!("expected body parameter, got {other:?}"),
        }
        match &params[1] {
            ParameterOrRef::Parameter(p) => {
                assert_eq!(p.tiered, None);
                assert!(!p.extensions.contains_key(X_GO_NAME));
                assert!(p.extensions.contains_key("x-keep"));
            }
            other => panic!("expected query parameter, got {other:?}"),
        }
        assert!(matches!(params[2], ParameterOrRef::Ref { .. }));
    }

    #[test]
    fn test_all_verbs_processed() {
        let mut op = Operation::default();
        op.responses
            .status_codes
            .insert(201, ResponseOrRef::reference("#/responses/WidgetResponse"));
        let mut spec = spec_with(op.clone());
        spec.paths["/widgets"].put = Some(op);

        resolve_responses(&mut spec).unwrap();

        for (_, op) in spec.paths["/widgets"].operations() {
            assert!(op.responses.status_codes.is_empty());
        }
    }

    #[test]
    fn test_shared_parameters_conformed() {
        let mut body = Parameter::new("body", ParameterLocation::Body);
        body.extensions.insert(X_GO_NAME, json!("Body"));

        let mut op = Operation::default();
        op.parameters = vec![
            ParameterOrRef::Ref {
                ref_path: "#/parameters/requestId".to_string(),
            },
            ParameterOrRef::Ref {
                ref_path: "#/parameters/widgetBody".to_string(),
            },
            ParameterOrRef::Ref {
                ref_path: "#/parameters/unknown".to_string(),
            },
        ];
        let mut spec = spec_with(op);
        spec.parameters.insert(
            "requestId".to_string(),
            Parameter::new("x-jdcloud-request-id", ParameterLocation::Header),
        );
        spec.parameters.insert("widgetBody".to_string(), body);
        spec.paths["/widgets"].parameters = vec![ParameterOrRef::Ref {
            ref_path: "#/parameters/requestId".to_string(),
        }];

        resolve_responses(&mut spec).unwrap();

        assert!(!spec.parameters.contains_key("requestId"));
        let shared_body = &spec.parameters["widgetBody"];
        assert_eq!(shared_body.tiered, Some(false));
        assert!(!shared_body.extensions.contains_key(X_GO_NAME));

        assert!(spec.paths["/widgets"].parameters.is_empty());
        let refs: Vec<&str> = get_op(&spec)
            .parameters
            .iter()
            .map(|p| match p {
                ParameterOrRef::Ref { ref_path } => ref_path.as_str(),
                other => panic!("expected reference, got {other:?}"),
            })
            .collect();
        assert_eq!(refs, ["#/parameters/widgetBody", "#/parameters/unknown"]);
    }
}
