pub mod extensions;
pub mod operation;
pub mod parameter;
pub mod response;
pub mod schema;
pub mod spec;

use crate::error::ParseError;
use spec::Swagger;

/// The only document version the scanner emits and the pipeline accepts.
pub const SWAGGER_VERSION: &str = "2.0";

/// Parse a Swagger document from YAML.
pub fn from_yaml(input: &str) -> Result<Swagger, ParseError> {
    let spec: Swagger = serde_yaml_ng::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse a Swagger document from JSON.
pub fn from_json(input: &str) -> Result<Swagger, ParseError> {
    let spec: Swagger = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

fn validate_version(spec: &Swagger) -> Result<(), ParseError> {
    if spec.swagger != SWAGGER_VERSION {
        return Err(ParseError::UnsupportedVersion(spec.swagger.clone()));
    }
    Ok(())
}
