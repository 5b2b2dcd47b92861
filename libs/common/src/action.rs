use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::{Method, Property};

/// Connection-level settings shared by every action that targets the same datasource.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceConfiguration {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  /// Base URL that relative action paths are resolved against.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  #[serde(default)]
  pub headers: Vec<Property>,
  #[serde(default)]
  pub params: Vec<Property>,
}

/// A configuration value held as a raw string, e.g. `custom.variables.value`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct StringProperty {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub value: Option<String>,
}

impl StringProperty {
  pub fn new(value: impl Into<String>) -> Self {
    Self {
      value: Some(value.into()),
    }
  }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomActionConfiguration {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub variables: Option<StringProperty>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub operation_name: Option<StringProperty>,
}

/// The per-call description of what to execute.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfiguration {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub path: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub body: Option<String>,
  #[serde(default)]
  pub headers: Vec<Property>,
  #[serde(default)]
  pub params: Vec<Property>,
  #[serde(
    default,
    with = "optional_method",
    skip_serializing_if = "Option::is_none"
  )]
  pub http_method: Option<Method>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub custom: Option<CustomActionConfiguration>,
}

impl ActionConfiguration {
  /// Raw `custom.variables.value`, if set.
  pub fn variables_value(&self) -> Option<&str> {
    self
      .custom
      .as_ref()
      .and_then(|c| c.variables.as_ref())
      .and_then(|v| v.value.as_deref())
  }

  pub fn operation_name_value(&self) -> Option<&str> {
    self
      .custom
      .as_ref()
      .and_then(|c| c.operation_name.as_ref())
      .and_then(|v| v.value.as_deref())
  }
}

/// A cookie carried over from an earlier request in the same chain of API calls.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ForwardedCookie {
  pub domain: String,
  pub value: String,
}

/// Forwarded cookies keyed by cookie name.
pub type ForwardedCookies = BTreeMap<String, ForwardedCookie>;

/// Describes what a datasource exposes. Empty for datasources without introspection.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct DatasourceMetadata {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema: Option<Value>,
}

mod optional_method {
  use std::str::FromStr;

  use serde::{de::Error, Deserialize, Deserializer, Serializer};

  use crate::http::Method;

  pub fn serialize<S>(method: &Option<Method>, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match method {
      Some(m) => serializer.serialize_str(m.as_str()),
      None => serializer.serialize_none(),
    }
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Method>, D::Error>
  where
    D: Deserializer<'de>,
  {
    match Option::<String>::deserialize(deserializer)? {
      Some(raw) if !raw.trim().is_empty() => Method::from_str(&raw.trim().to_uppercase())
        .map(Some)
        .map_err(|e| D::Error::custom(format!("invalid http method \"{}\": {}", raw, e))),
      _ => Ok(None),
    }
  }
}
