use tracing::debug;

use crate::{
  action::{ActionConfiguration, DatasourceConfiguration},
  http::{has_header, HttpRequestDescriptor, Method, Property, RequestBody, Url, CONTENT_TYPE},
  plugin::PluginError,
};

/// Resolves the URL an action targets.
///
/// An absolute `path` is used as-is, a relative one is appended to the datasource `url`.
/// A `path` only counts as absolute when it names a host, so `localhost:4000/graphql` is relative.
pub fn resolve_url(
  datasource: &DatasourceConfiguration,
  action: &ActionConfiguration,
) -> Result<Url, PluginError> {
  let path = action.path.as_deref().map(str::trim).unwrap_or_default();

  if !path.is_empty() {
    if let Ok(url) = Url::parse(path) {
      if url.has_host() {
        return Ok(url);
      }
    }
  }

  let base = datasource
    .url
    .as_deref()
    .map(str::trim)
    .filter(|base| !base.is_empty());

  let full = match base {
    Some(base) if path.is_empty() => base.to_string(),
    Some(base) => format!(
      "{}/{}",
      base.trim_end_matches('/'),
      path.trim_start_matches('/')
    ),
    None if path.is_empty() => return Err(PluginError::MissingUrl),
    None => path.to_string(),
  };

  match Url::parse(&full) {
    Ok(url) if url.has_host() => Ok(url),
    Ok(_) => Err(PluginError::InvalidUrl {
      url: full,
      source: url::ParseError::EmptyHost,
    }),
    Err(source) => Err(PluginError::InvalidUrl { url: full, source }),
  }
}

/// Builds the generic request shape for an action: target URL, method, headers, query params and raw body.
///
/// Plugins override the parts that are specific to their protocol.
#[tracing::instrument(level = "debug", skip_all, name = "generate_request_config")]
pub fn generate_request_config(
  datasource: &DatasourceConfiguration,
  action: &ActionConfiguration,
) -> Result<HttpRequestDescriptor, PluginError> {
  let url = resolve_url(datasource, action)?;

  let mut headers: Vec<Property> = datasource
    .headers
    .iter()
    .chain(action.headers.iter())
    .filter(|h| h.has_key())
    .cloned()
    .collect();

  if !has_header(&headers, &CONTENT_TYPE) {
    headers.push(Property::new("Content-Type", mime::APPLICATION_JSON.as_ref()));
  }

  let params = datasource
    .params
    .iter()
    .chain(action.params.iter())
    .filter(|p| p.has_key())
    .cloned()
    .collect();

  let data = match action.body.as_deref() {
    Some(body) if !body.is_empty() => RequestBody::Raw(body.to_string()),
    _ => RequestBody::Empty,
  };

  let method = action.http_method.clone().unwrap_or(Method::GET);
  debug!("generated request config: {} {}", method, url);

  Ok(HttpRequestDescriptor {
    method,
    url: url.to_string(),
    headers,
    params,
    data,
  })
}
