use std::str::FromStr;

use anyhow::{anyhow, Result as AnyhowResult};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
pub use url::{Host, Url};

pub use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
pub use http::Method;
pub use mime::{Mime, APPLICATION_JSON};
pub type HttpHeadersMap = HeaderMap<HeaderValue>;

/// A single `{key, value}` entry, as used by header and query parameter lists.
///
/// Lists of properties keep their order and may hold the same key more than once.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Property {
  #[serde(default)]
  pub key: String,
  #[serde(default)]
  pub value: String,
}

impl Property {
  pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      value: value.into(),
    }
  }

  pub fn has_key(&self) -> bool {
    !self.key.trim().is_empty()
  }
}

pub trait ToHeadersMap {
  fn to_headers_map(&self) -> AnyhowResult<HttpHeadersMap>;
}

impl ToHeadersMap for Vec<Property> {
  fn to_headers_map(&self) -> Result<HttpHeadersMap, anyhow::Error> {
    let mut headers_map = HeaderMap::new();

    for property in self.iter().filter(|p| p.has_key()) {
      let header_name = HeaderName::from_str(property.key.trim())
        .map_err(|e| anyhow!("Couldn't parse key into a header name: {}", e))?;
      let header_value = HeaderValue::from_str(&property.value)
        .map_err(|e| anyhow!("Couldn't parse value into a header value: {}", e))?;

      // Header lists may repeat a key, every occurrence is sent.
      headers_map.append(header_name, header_value);
    }

    Ok(headers_map)
  }
}

/// The body of an outgoing request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
  #[default]
  Empty,
  /// Serialized as JSON when sent.
  Json(Value),
  /// Sent as-is.
  Raw(String),
}

impl RequestBody {
  pub fn is_empty(&self) -> bool {
    match self {
      RequestBody::Empty => true,
      RequestBody::Raw(raw) => raw.is_empty(),
      RequestBody::Json(_) => false,
    }
  }

  pub fn as_json(&self) -> Option<&Value> {
    match self {
      RequestBody::Json(value) => Some(value),
      _ => None,
    }
  }

  /// Renders the body the way it goes on the wire.
  pub fn to_wire_string(&self) -> String {
    match self {
      RequestBody::Empty => String::new(),
      RequestBody::Raw(raw) => raw.clone(),
      RequestBody::Json(value) => value.to_string(),
    }
  }
}

/// Everything the HTTP executor needs to perform a single request.
#[derive(Debug, Clone)]
pub struct HttpRequestDescriptor {
  pub method: Method,
  pub url: String,
  pub headers: Vec<Property>,
  pub params: Vec<Property>,
  pub data: RequestBody,
}

impl HttpRequestDescriptor {
  pub fn header(&self, key: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|h| h.key.eq_ignore_ascii_case(key))
      .map(|h| h.value.as_str())
  }
}

pub fn has_header(headers: &[Property], name: &HeaderName) -> bool {
  headers
    .iter()
    .any(|h| h.key.trim().eq_ignore_ascii_case(name.as_str()))
}

pub fn extract_content_type(headers_map: &HttpHeadersMap) -> Option<Mime> {
  let content_type = headers_map
    .get(CONTENT_TYPE)
    .and_then(|value| value.to_str().ok())
    .map(ToString::to_string);

  content_type.and_then(|content_type| content_type.parse().ok())
}

pub fn is_json_mime(mime: &Mime) -> bool {
  mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON)
}
