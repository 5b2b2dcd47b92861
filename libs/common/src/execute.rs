use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Context = Map<String, Value>;

/// Per-invocation state owned by the host.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContext {
  #[serde(default)]
  pub execution_id: String,
  /// Opaque host data carried alongside the invocation.
  #[serde(default)]
  pub context: Context,
}

/// The normalized result of running an action.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionOutput {
  pub output: Value,
  #[serde(default)]
  pub log: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  /// Wall time of the execution, in milliseconds.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub execution_time: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub request: Option<String>,
}

impl Default for ExecutionOutput {
  fn default() -> Self {
    Self {
      output: Value::Object(Map::new()),
      log: vec![],
      error: None,
      execution_time: None,
      request: None,
    }
  }
}

impl ExecutionOutput {
  pub fn new_error(error: impl Into<String>) -> Self {
    Self {
      error: Some(error.into()),
      ..Default::default()
    }
  }

  pub fn is_error(&self) -> bool {
    self.error.is_some()
  }
}
