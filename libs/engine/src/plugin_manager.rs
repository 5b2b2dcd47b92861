use std::time::Instant;

use actuator_common::{
  action::{
    ActionConfiguration, DatasourceConfiguration, DatasourceMetadata, ForwardedCookies,
  },
  execute::{ExecutionContext, ExecutionOutput},
  plugin::{ApiPlugin, CreatablePlugin, HttpExecutor, PluginError, PluginExecutionProps, RawRequest},
};
use actuator_config::PluginDefinition;
use serde::Deserialize;
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
  #[error("plugin \"{0}\" is not registered")]
  UnknownPlugin(String),
  #[error(transparent)]
  Plugin(#[from] PluginError),
}

/// A single action invocation, as handed over by the host.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
  #[serde(default)]
  pub context: ExecutionContext,
  #[serde(default)]
  pub datasource_configuration: DatasourceConfiguration,
  pub action_configuration: ActionConfiguration,
  #[serde(default)]
  pub forwarded_cookies: ForwardedCookies,
}

/// Owns the registered plugins and dispatches host calls to them.
#[derive(Debug)]
pub struct PluginManager {
  plugins: Vec<Box<dyn ApiPlugin>>,
  http: Box<dyn HttpExecutor>,
}

impl PluginManager {
  pub fn new_from_vec(plugins: Vec<Box<dyn ApiPlugin>>, http: Box<dyn HttpExecutor>) -> Self {
    Self { plugins, http }
  }

  pub async fn create_plugin<T: CreatablePlugin + 'static>(
    config: T::Config,
  ) -> Result<Box<dyn ApiPlugin>, PluginError> {
    let plugin: Box<dyn ApiPlugin> = T::create(config).await?;

    Ok(plugin)
  }

  pub async fn new(
    plugins_config: &[PluginDefinition],
    http: Box<dyn HttpExecutor>,
  ) -> Result<Self, PluginError> {
    let mut instance = Self::new_from_vec(vec![], http);

    for plugin_def in plugins_config.iter() {
      let plugin = match plugin_def {
        PluginDefinition::GraphQLPlugin {
          enabled: Some(true),
          config,
        } => {
          Self::create_plugin::<graphql_plugin::Plugin>(config.clone().unwrap_or_default()).await?
        }
        // In case plugin is not enabled, we are skipping it.
        _ => continue,
      };

      instance.register_boxed_plugin(plugin);
    }

    Ok(instance)
  }

  /// Registers a plugin. A plugin registered later under the same name takes precedence.
  pub fn register_boxed_plugin(&mut self, plugin: Box<dyn ApiPlugin>) {
    debug!("registering plugin {:?}", plugin.name());
    self.plugins.insert(0, plugin);
  }

  pub fn register_plugin(&mut self, plugin: impl ApiPlugin + 'static) {
    self.register_boxed_plugin(Box::new(plugin));
  }

  pub fn plugin_names(&self) -> Vec<&'static str> {
    self.plugins.iter().map(|p| p.name()).collect()
  }

  fn find(&self, name: &str) -> Result<&dyn ApiPlugin, ManagerError> {
    self
      .plugins
      .iter()
      .find(|p| p.name() == name)
      .map(|p| p.as_ref())
      .ok_or_else(|| ManagerError::UnknownPlugin(name.to_string()))
  }

  #[tracing::instrument(
    level = "debug",
    skip(self, request),
    fields(execution_id = %request.context.execution_id)
  )]
  pub async fn execute(
    &self,
    plugin_name: &str,
    request: &ExecutionRequest,
  ) -> Result<ExecutionOutput, ManagerError> {
    let plugin = self.find(plugin_name)?;
    let started = Instant::now();

    let result = plugin
      .execute(PluginExecutionProps {
        context: &request.context,
        datasource_configuration: &request.datasource_configuration,
        action_configuration: &request.action_configuration,
        forwarded_cookies: &request.forwarded_cookies,
        http: self.http.as_ref(),
      })
      .await;

    match result {
      Ok(mut output) => {
        if output.execution_time.is_none() {
          output.execution_time = Some(started.elapsed().as_millis() as u64);
        }

        Ok(output)
      }
      Err(e) => {
        error!("plugin {:?} failed to execute: {}", plugin_name, e);

        Err(e.into())
      }
    }
  }

  pub fn get_request(
    &self,
    plugin_name: &str,
    action_configuration: &ActionConfiguration,
  ) -> Result<RawRequest, ManagerError> {
    Ok(self.find(plugin_name)?.get_request(action_configuration)?)
  }

  pub fn dynamic_properties(&self, plugin_name: &str) -> Result<Vec<&'static str>, ManagerError> {
    Ok(self.find(plugin_name)?.dynamic_properties())
  }

  pub fn escape_string_properties(
    &self,
    plugin_name: &str,
  ) -> Result<Vec<&'static str>, ManagerError> {
    Ok(self.find(plugin_name)?.escape_string_properties())
  }

  pub async fn metadata(
    &self,
    plugin_name: &str,
    datasource_configuration: &DatasourceConfiguration,
  ) -> Result<DatasourceMetadata, ManagerError> {
    Ok(
      self
        .find(plugin_name)?
        .metadata(datasource_configuration)
        .await?,
    )
  }

  pub async fn test(
    &self,
    plugin_name: &str,
    datasource_configuration: &DatasourceConfiguration,
  ) -> Result<(), ManagerError> {
    Ok(self.find(plugin_name)?.test(datasource_configuration).await?)
  }
}
