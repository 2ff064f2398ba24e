use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::extensions::Extensions;
use super::schema::Schema;

/// A response definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<serde_json::Value>,

    #[serde(flatten)]
    pub extensions: Extensions,
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}

impl ResponseOrRef {
    pub fn reference(ref_path: impl Into<String>) -> Self {
        Self::Ref {
            ref_path: ref_path.into(),
        }
    }
}

/// The `responses` object of an operation.
///
/// On the wire this is a single map mixing `default`, numeric status codes
/// and `x-` extensions; the numeric keys are split out into `status_codes`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Responses {
    pub default: Option<ResponseOrRef>,
    pub status_codes: IndexMap<u16, ResponseOrRef>,
    pub extensions: Extensions,
}

impl Serialize for Responses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = usize::from(self.default.is_some())
            + self.status_codes.len()
            + self.extensions.len();
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(default) = &self.default {
            map.serialize_entry("default", default)?;
        }
        for (code, response) in &self.status_codes {
            map.serialize_entry(&code.to_string(), response)?;
        }
        for (key, value) in self.extensions.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Responses {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ResponsesVisitor)
    }
}

struct ResponsesVisitor;

impl<'de> Visitor<'de> for ResponsesVisitor {
    type Value = Responses;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of status codes to responses")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Responses, A::Error> {
        let mut responses = Responses::default();
        while let Some(ResponseKey(key)) = map.next_key()? {
            if key == "default" {
                responses.default = Some(map.next_value()?);
            } else if key.starts_with("x-") {
                let value: serde_json::Value = map.next_value()?;
                responses.extensions.insert(key, value);
            } else {
                let code: u16 = key.parse().map_err(|_| {
                    de::Error::custom(format!("invalid response status code `{key}`"))
                })?;
                responses.status_codes.insert(code, map.next_value()?);
            }
        }
        Ok(responses)
    }
}

/// A `responses` key. YAML hands unquoted status codes over as integers.
struct ResponseKey(String);

impl<'de> Deserialize<'de> for ResponseKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = ResponseKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a status code or extension name")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ResponseKey, E> {
                Ok(ResponseKey(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ResponseKey, E> {
                Ok(ResponseKey(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ResponseKey, E> {
                Ok(ResponseKey(v.to_string()))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}
