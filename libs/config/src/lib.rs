pub mod interpolate;

use actuator_logger::config::LoggerConfigFormat;
use interpolate::interpolate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{fs::read_to_string, path::Path, time::Duration};

/// The top-level configuration object of the Actuator host.
///
/// Both YAML and JSON are supported, the format is picked from the file extension (`.json`, `.yaml`, `.yml`).
///
/// ## Loading the config file
///
/// The path of the config file is the first argument of the binary:
///
/// ```sh
///
/// actuator my-config-file.yaml invocation.json
///
/// ```
///
/// > By default, Actuator looks for a file named `actuator.yaml` in the current directory.
///
/// ### Configuration Interpolation with Environment Variables
///
/// Environment variables are interpolated into the raw file before it is parsed:
///
/// - `${VAR_NAME}` inserts the value of `VAR_NAME`. Unknown variables are replaced with an empty string, and a warning is printed.
/// - `${VAR_NAME:-default}` falls back to `default` when `VAR_NAME` is unset or empty.
/// - `${VAR_NAME:?message}` fails loading with `message` when `VAR_NAME` is unset or empty.
/// - `$$` is a literal `$`.
///
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema, Default)]
pub struct ActuatorConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  /// Logger configuration.
  pub logger: Option<LoggerConfig>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  /// Configuration of the HTTP client used to execute actions.
  pub http: Option<HttpClientConfig>,
  /// List of plugins the host can dispatch actions to.
  ///
  /// A plugin that is not listed (or is disabled) can not be invoked.
  #[serde(default)]
  pub plugins: Vec<PluginDefinition>,
}

fn default_plugin_enabled() -> Option<bool> {
  Some(true)
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(tag = "type")]
pub enum PluginDefinition {
  #[serde(rename = "graphql")]
  /// Executes actions against GraphQL endpoints.
  GraphQLPlugin {
    #[serde(
      default = "default_plugin_enabled",
      skip_serializing_if = "Option::is_none"
    )]
    enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<graphql_plugin::Config>,
  },
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct HttpClientConfig {
  /// Maximum duration of a single request, including connecting and reading the response.
  ///
  /// Uses a human readable duration format, for example `10s` or `1m 30s`.
  #[serde(
    default = "default_http_timeout",
    deserialize_with = "humantime_serde::deserialize",
    serialize_with = "humantime_serde::serialize"
  )]
  #[schemars(with = "String")]
  pub timeout: Duration,
}

impl Default for HttpClientConfig {
  fn default() -> Self {
    Self {
      timeout: default_http_timeout(),
    }
  }
}

fn default_http_timeout() -> Duration {
  Duration::from_secs(30)
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct LoggerConfig {
  /// Environment filter configuration as a string, following the [tracing_subscriber::EnvFilter](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html) syntax.
  ///
  /// - `info` logs all messages at info level and higher.
  ///
  /// - `info,graphql_plugin=debug` additionally logs the debug messages of the GraphQL plugin.
  #[serde(default = "default_log_filter")]
  pub filter: String,
  /// Configures the logger format.
  ///
  /// By default, `pretty` is used in debug builds. Release builds use `compact` in TTY environments, and `json` otherwise.
  #[serde(default)]
  pub format: LoggerConfigFormat,
  /// Emits timing information for spans (look for `close` events in the logs).
  #[serde(default)]
  pub print_performance_info: bool,
}

impl Default for LoggerConfig {
  fn default() -> Self {
    Self {
      filter: default_log_filter(),
      format: LoggerConfigFormat::default(),
      print_performance_info: false,
    }
  }
}

fn default_log_filter() -> String {
  "info".to_string()
}

#[tracing::instrument(level = "trace", skip(get_env_value))]
pub fn load_config(
  file_path: &str,
  get_env_value: impl Fn(&str) -> Option<String>,
) -> ActuatorConfig {
  let path = Path::new(file_path);

  // @expected: 👇
  let raw_contents = read_to_string(file_path)
    .unwrap_or_else(|e| panic!("Failed to read config file \"{}\": {}", file_path, e));

  parse_config_contents(raw_contents, ConfigFormat::from_path(path), get_env_value)
}

pub fn parse_config_contents(
  contents: String,
  format: ConfigFormat,
  get_env_value: impl Fn(&str) -> Option<String>,
) -> ActuatorConfig {
  let mut config_string = contents;

  match interpolate(&config_string, get_env_value) {
    Ok((interpolated_content, warnings)) => {
      config_string = interpolated_content;

      for warning in warnings {
        println!("warning: {}", warning);
      }
    }
    Err(errors) => {
      for error in errors {
        println!("error: {:?}", error);
      }

      // @expected: 👇
      panic!("Failed to interpolate config file, please resolve the above errors");
    }
  }

  match format {
    ConfigFormat::Json => {
      // @expected: 👇
      parse_config_from_json(&config_string).expect("Failed to parse JSON config file")
    }
    ConfigFormat::Yaml => {
      // @expected: 👇
      parse_config_from_yaml(&config_string).expect("Failed to parse YAML config file")
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
  Json,
  Yaml,
}

impl ConfigFormat {
  pub fn from_path(path: &Path) -> Self {
    match path.extension() {
      Some(ext) => match ext.to_str() {
        Some("json") => ConfigFormat::Json,
        Some("yaml") | Some("yml") => ConfigFormat::Yaml,
        // @expected: 👇
        _ => panic!("Unsupported config file extension"),
      },
      // @expected: 👇
      None => panic!("Config file has no extension"),
    }
  }
}

fn parse_config_from_yaml(contents: &str) -> Result<ActuatorConfig, serde_yaml::Error> {
  serde_yaml::from_str::<ActuatorConfig>(contents)
}

fn parse_config_from_json(contents: &str) -> Result<ActuatorConfig, serde_json::Error> {
  serde_json::from_str::<ActuatorConfig>(contents)
}
