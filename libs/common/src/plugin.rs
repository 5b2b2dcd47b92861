use std::fmt::Debug;

use crate::{
  action::{ActionConfiguration, DatasourceConfiguration, DatasourceMetadata, ForwardedCookies},
  execute::{ExecutionContext, ExecutionOutput},
  http::HttpRequestDescriptor,
};

/// The rendered, human readable form of a request (a `curl` command).
pub type RawRequest = String;

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
  #[error("Plugin init error: {source}")]
  InitError { source: anyhow::Error },
  #[error("failed to parse \"{property}\": {source}")]
  ParseError {
    property: String,
    source: serde_json::Error,
  },
  #[error("invalid url \"{url}\": {source}")]
  InvalidUrl {
    url: String,
    source: url::ParseError,
  },
  #[error("action has no path and the datasource has no url")]
  MissingUrl,
}

/// Performs outgoing HTTP requests on behalf of plugins.
///
/// Transport failures and error statuses are reported through [`ExecutionOutput::error`], never as an `Err`.
#[async_trait::async_trait(?Send)]
pub trait HttpExecutor: Debug {
  async fn execute_request(&self, request: HttpRequestDescriptor) -> ExecutionOutput;
}

/// Everything the host hands to [`ApiPlugin::execute`] for a single invocation.
pub struct PluginExecutionProps<'a> {
  pub context: &'a ExecutionContext,
  pub datasource_configuration: &'a DatasourceConfiguration,
  pub action_configuration: &'a ActionConfiguration,
  pub forwarded_cookies: &'a ForwardedCookies,
  pub http: &'a dyn HttpExecutor,
}

#[async_trait::async_trait(?Send)]
pub trait CreatablePlugin: ApiPlugin {
  type Config;

  async fn create(config: Self::Config) -> Result<Box<Self>, PluginError>;
}

/// The set of operations every API plugin provides to the host.
///
/// Plugins never call each other or the host dispatcher, they only receive calls.
#[async_trait::async_trait(?Send)]
pub trait ApiPlugin: Debug {
  /// The name the plugin is registered under.
  fn name(&self) -> &'static str;

  async fn execute(&self, props: PluginExecutionProps<'_>) -> Result<ExecutionOutput, PluginError>;

  /// Renders the request `execute` would send, without sending it.
  fn get_request(&self, action_configuration: &ActionConfiguration)
    -> Result<RawRequest, PluginError>;

  /// Configuration paths that may contain expressions the host resolves before invoking the plugin.
  fn dynamic_properties(&self) -> Vec<&'static str> {
    vec![]
  }

  /// Configuration paths whose values must be string-escaped before interpolation.
  fn escape_string_properties(&self) -> Vec<&'static str> {
    vec![]
  }

  async fn metadata(
    &self,
    _datasource_configuration: &DatasourceConfiguration,
  ) -> Result<DatasourceMetadata, PluginError> {
    Ok(DatasourceMetadata::default())
  }

  async fn test(&self, _datasource_configuration: &DatasourceConfiguration) -> Result<(), PluginError> {
    Ok(())
  }
}
