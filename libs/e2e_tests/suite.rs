use actuator_common::{
  action::{ActionConfiguration, DatasourceConfiguration, ForwardedCookies},
  execute::ExecutionOutput,
  plugin::ApiPlugin,
};
use actuator_config::HttpClientConfig;
use actuator_engine::{
  http_executor::ReqwestHttpExecutor,
  plugin_manager::{ExecutionRequest, ManagerError, PluginManager},
};
use httpmock::{prelude::*, Then, When};
use serde_json::json;

pub struct TestSuite {
  pub plugins: Vec<Box<dyn ApiPlugin>>,
  pub mock_server: Option<MockServer>,
  pub forwarded_cookies: ForwardedCookies,
}

impl Default for TestSuite {
  fn default() -> Self {
    Self {
      plugins: vec![Box::new(graphql_plugin::Plugin::default())],
      mock_server: None,
      forwarded_cookies: ForwardedCookies::new(),
    }
  }
}

impl TestSuite {
  fn manager(plugins: Vec<Box<dyn ApiPlugin>>) -> PluginManager {
    // @expected: 👇
    let http = ReqwestHttpExecutor::new(&HttpClientConfig::default())
      .expect("failed to build the HTTP client");

    PluginManager::new_from_vec(plugins, Box::new(http))
  }

  /// Executes `action` against a mocked upstream, served at `/graphql` of the datasource URL.
  ///
  /// The mock must be hit exactly once.
  pub async fn run_with_mock(
    self,
    action: ActionConfiguration,
    mock_fn: impl FnOnce(When, Then),
  ) -> Result<ExecutionOutput, ManagerError> {
    let mock_server = self.mock_server.unwrap_or_else(MockServer::start);
    let mock = mock_server.mock(mock_fn);

    let request = ExecutionRequest {
      datasource_configuration: DatasourceConfiguration {
        url: Some(mock_server.base_url()),
        ..Default::default()
      },
      action_configuration: action,
      forwarded_cookies: self.forwarded_cookies,
      ..Default::default()
    };

    let response = Self::manager(self.plugins)
      .execute("graphql", &request)
      .await;

    mock.assert();
    response
  }

  /// Executes `action` against an upstream that answers every POST to `/graphql` with a fixed payload.
  pub async fn run_action(
    self,
    action: ActionConfiguration,
  ) -> Result<ExecutionOutput, ManagerError> {
    let mock_server = self.mock_server.unwrap_or_else(MockServer::start);

    mock_server.mock(|when, then| {
      when.method(POST).path("/graphql");
      then
        .status(200)
        .header("content-type", "application/json")
        .json_body(json!({
            "data": {
                "__typename": "Query"
            }
        }));
    });

    let request = ExecutionRequest {
      datasource_configuration: DatasourceConfiguration {
        url: Some(mock_server.base_url()),
        ..Default::default()
      },
      action_configuration: action,
      forwarded_cookies: self.forwarded_cookies,
      ..Default::default()
    };

    Self::manager(self.plugins)
      .execute("graphql", &request)
      .await
  }
}
