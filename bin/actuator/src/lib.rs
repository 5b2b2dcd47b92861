use std::fs::read_to_string;

use actuator_config::ActuatorConfig;
use actuator_engine::{
  http_executor::ReqwestHttpExecutor,
  plugin_manager::{ExecutionRequest, PluginManager},
};
use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use tracing::{debug, info};

pub const DEFAULT_CONFIG_FILE_PATH: &str = "./actuator.yaml";

/// Runs a single action invocation through the configured plugins.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "actuator", version, allow_missing_positional = true)]
pub struct CliArgs {
  /// Path of the config file (YAML or JSON)
  #[arg(value_name = "CONFIG_FILE", default_value = DEFAULT_CONFIG_FILE_PATH)]
  pub config_file_path: String,
  /// Path of the JSON invocation file
  #[arg(value_name = "INVOCATION_FILE")]
  pub invocation_file_path: String,
  /// Print the request as a curl command instead of executing it
  #[arg(long)]
  pub preview: bool,
}

/// The contents of an invocation file: the plugin to dispatch to, and the action to run.
#[derive(Deserialize, Debug, Clone)]
pub struct Invocation {
  pub plugin: String,
  #[serde(flatten)]
  pub request: ExecutionRequest,
}

impl Invocation {
  pub fn from_file(path: &str) -> anyhow::Result<Self> {
    let contents =
      read_to_string(path).with_context(|| format!("failed to read invocation file {:?}", path))?;

    serde_json::from_str(&contents)
      .with_context(|| format!("failed to parse invocation file {:?}", path))
  }
}

pub async fn build_manager(config: &ActuatorConfig) -> anyhow::Result<PluginManager> {
  let http = ReqwestHttpExecutor::new(&config.http.clone().unwrap_or_default())
    .context("failed to build the HTTP client")?;

  let manager = PluginManager::new(&config.plugins, Box::new(http))
    .await
    .context("failed to initialize plugins")?;
  debug!("registered plugins: {:?}", manager.plugin_names());

  Ok(manager)
}

/// Runs a single invocation and returns what should be printed.
pub async fn run(
  manager: &PluginManager,
  invocation: &Invocation,
  preview: bool,
) -> anyhow::Result<String> {
  if preview {
    let raw = manager.get_request(&invocation.plugin, &invocation.request.action_configuration)?;

    return Ok(raw);
  }

  let output = manager
    .execute(&invocation.plugin, &invocation.request)
    .await?;
  info!(
    "action executed in {}ms",
    output.execution_time.unwrap_or_default()
  );

  Ok(serde_json::to_string_pretty(&output)?)
}

pub async fn run_cli(args: &CliArgs, config: &ActuatorConfig) -> anyhow::Result<String> {
  let invocation = Invocation::from_file(&args.invocation_file_path)?;
  let manager = build_manager(config).await?;

  run(&manager, &invocation, args.preview).await
}
