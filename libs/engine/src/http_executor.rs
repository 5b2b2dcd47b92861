use std::time::Instant;

use actuator_common::{
  execute::ExecutionOutput,
  http::{extract_content_type, is_json_mime, HttpRequestDescriptor, ToHeadersMap},
  plugin::HttpExecutor,
};
use actuator_config::HttpClientConfig;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

#[derive(Debug, Clone)]
pub struct ReqwestHttpExecutor {
  pub fetcher: Client,
}

impl ReqwestHttpExecutor {
  pub fn new(config: &HttpClientConfig) -> Result<Self, reqwest::Error> {
    let fetcher = Client::builder().timeout(config.timeout).build()?;

    Ok(Self { fetcher })
  }

  async fn send(&self, request: HttpRequestDescriptor) -> ExecutionOutput {
    let headers = match request.headers.to_headers_map() {
      Ok(headers) => headers,
      Err(e) => return ExecutionOutput::new_error(e.to_string()),
    };

    let mut upstream_req = self
      .fetcher
      .request(request.method, &request.url)
      .headers(headers);

    let params = request
      .params
      .iter()
      .filter(|p| p.has_key())
      .map(|p| (p.key.as_str(), p.value.as_str()))
      .collect::<Vec<_>>();
    if !params.is_empty() {
      upstream_req = upstream_req.query(&params);
    }

    if !request.data.is_empty() {
      upstream_req = upstream_req.body(request.data.to_wire_string());
    }

    let upstream_response = match upstream_req.send().await {
      Ok(res) => res,
      Err(e) => {
        error!("failed to send request to {:?}: {}", request.url, e);
        return ExecutionOutput::new_error(e.to_string());
      }
    };

    let status = upstream_response.status();
    let content_type = extract_content_type(upstream_response.headers());
    debug!("received response with status {} from {:?}", status, request.url);

    let body = match upstream_response.bytes().await {
      Ok(body) => body,
      Err(e) => {
        error!("failed to read response body from {:?}: {}", request.url, e);
        return ExecutionOutput::new_error(e.to_string());
      }
    };

    let output = if body.is_empty() {
      Value::Object(Map::new())
    } else {
      match serde_json::from_slice::<Value>(&body) {
        Ok(json) => json,
        Err(e) => {
          if content_type.as_ref().is_some_and(is_json_mime) {
            warn!("response declared as JSON could not be parsed: {}", e);
          }

          Value::String(String::from_utf8_lossy(&body).into_owned())
        }
      }
    };

    let error = (status.is_client_error() || status.is_server_error())
      .then(|| format!("Request failed with status code {}", status.as_u16()));

    ExecutionOutput {
      output,
      error,
      ..Default::default()
    }
  }
}

#[async_trait::async_trait(?Send)]
impl HttpExecutor for ReqwestHttpExecutor {
  #[tracing::instrument(
    level = "debug",
    skip_all,
    name = "ReqwestHttpExecutor::execute_request",
    fields(method = %request.method, url = %request.url)
  )]
  async fn execute_request(&self, request: HttpRequestDescriptor) -> ExecutionOutput {
    let started = Instant::now();
    let mut output = self.send(request).await;
    output.execution_time = Some(started.elapsed().as_millis() as u64);

    output
  }
}
