use std::borrow::Cow;

use actuator_common::{
  action::{ActionConfiguration, DatasourceConfiguration, DatasourceMetadata},
  curl::make_curl_string,
  execute::ExecutionOutput,
  graphql::GraphQLRequest,
  http::{Method, RequestBody},
  json::parse_and_extract_json_map_value,
  plugin::{ApiPlugin, CreatablePlugin, PluginError, PluginExecutionProps, RawRequest},
  request_config::{generate_request_config, resolve_url},
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
  config::{EmptyVariablesPolicy, GraphQLPluginConfig},
  cookies::{cookie_domain, merge_forwarded_cookies},
};

static PLUGIN_NAME: &str = "graphql";
static VARIABLES_PROPERTY: &str = "custom.variables.value";

#[derive(Debug, Default)]
pub struct GraphQLPlugin(pub GraphQLPluginConfig);

#[async_trait::async_trait(?Send)]
impl CreatablePlugin for GraphQLPlugin {
  type Config = GraphQLPluginConfig;

  async fn create(config: Self::Config) -> Result<Box<Self>, PluginError> {
    Ok(Box::new(Self(config)))
  }
}

impl GraphQLPlugin {
  /// Builds the `{query, variables, operationName}` body for an action.
  pub fn build_request_body(
    &self,
    action: &ActionConfiguration,
  ) -> Result<GraphQLRequest, PluginError> {
    let variables = match (action.variables_value(), self.0.empty_variables) {
      (None | Some(""), EmptyVariablesPolicy::DefaultEmptyObject) => Some(Map::new()),
      (None | Some(""), EmptyVariablesPolicy::Omit) => None,
      // `variables` is only ever sent as an object.
      (Some(raw), _) => Some(parse_and_extract_json_map_value(raw).map_err(|source| {
        PluginError::ParseError {
          property: VARIABLES_PROPERTY.to_string(),
          source,
        }
      })?),
    };

    let operation_name = action
      .operation_name_value()
      .filter(|name| !name.trim().is_empty())
      .map(ToString::to_string);

    Ok(GraphQLRequest {
      operation: action.body.clone().unwrap_or_default(),
      variables,
      operation_name,
    })
  }
}

#[async_trait::async_trait(?Send)]
impl ApiPlugin for GraphQLPlugin {
  fn name(&self) -> &'static str {
    PLUGIN_NAME
  }

  #[tracing::instrument(
    level = "debug",
    skip_all,
    name = "GraphQLPlugin::execute",
    fields(execution_id = %props.context.execution_id)
  )]
  async fn execute(&self, props: PluginExecutionProps<'_>) -> Result<ExecutionOutput, PluginError> {
    let mut action = Cow::Borrowed(props.action_configuration);

    if self.0.forward_cookies && !props.forwarded_cookies.is_empty() {
      let url = resolve_url(props.datasource_configuration, &action)?;

      if let Some(domain) = cookie_domain(&url) {
        let forwarded = merge_forwarded_cookies(
          &mut action.to_mut().headers,
          &domain,
          props.forwarded_cookies,
          self.0.cookie_separator,
        );
        debug!("forwarded {} cookie(s) for domain {:?}", forwarded, domain);
      }
    }

    let mut request = generate_request_config(props.datasource_configuration, &action)?;
    // GraphQL actions ignore the configured method.
    request.method = Method::POST;
    request.data = RequestBody::Json(self.build_request_body(&action)?.into());

    debug!("sending graphql request to {:?}", request.url);

    Ok(props.http.execute_request(request).await)
  }

  fn get_request(
    &self,
    action_configuration: &ActionConfiguration,
  ) -> Result<RawRequest, PluginError> {
    let body = Value::from(self.build_request_body(action_configuration)?);

    Ok(make_curl_string(
      &Method::POST,
      action_configuration.path.as_deref().unwrap_or_default(),
      &action_configuration.headers,
      &body.to_string(),
    ))
  }

  fn dynamic_properties(&self) -> Vec<&'static str> {
    vec!["path", "body", VARIABLES_PROPERTY, "headers"]
  }

  fn escape_string_properties(&self) -> Vec<&'static str> {
    vec!["body"]
  }

  async fn metadata(
    &self,
    _datasource_configuration: &DatasourceConfiguration,
  ) -> Result<DatasourceMetadata, PluginError> {
    Ok(DatasourceMetadata::default())
  }

  async fn test(
    &self,
    _datasource_configuration: &DatasourceConfiguration,
  ) -> Result<(), PluginError> {
    Ok(())
  }
}
