use actuator_common::serde_utils::{
  JsonSchemaExample, JsonSchemaExampleMetadata, JsonSchemaExampleWrapperType,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The `graphql` plugin executes actions against a GraphQL endpoint, following the [GraphQL over HTTP specification](https://graphql.github.io/graphql-over-http/).
///
/// Every action is sent as an HTTP `POST` request with a JSON body, regardless of the method configured on the action:
///
/// `{ "query": "...", "variables": { ... } }`
///
/// The query is taken from the action `body`, and the variables from `custom.variables.value` (a JSON-encoded object).
///
/// Cookies forwarded from previous actions in the same chain are replayed when their domain matches the target URL.
///
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema, PartialEq)]
#[schemars(example = "graphql_example_1")]
#[schemars(example = "graphql_example_2")]
pub struct GraphQLPluginConfig {
  /// What to send when an action has no variables.
  #[serde(default)]
  pub empty_variables: EmptyVariablesPolicy,
  /// Replay forwarded cookies that belong to the domain of the target URL.
  #[serde(default = "forward_cookies_default_value")]
  pub forward_cookies: bool,
  /// How forwarded cookies are joined with a `Cookie` header already set on the action.
  #[serde(default)]
  pub cookie_separator: CookieSeparator,
}

impl Default for GraphQLPluginConfig {
  fn default() -> Self {
    Self {
      empty_variables: EmptyVariablesPolicy::default(),
      forward_cookies: forward_cookies_default_value(),
      cookie_separator: CookieSeparator::default(),
    }
  }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, JsonSchema, PartialEq, Eq, Default)]
pub enum EmptyVariablesPolicy {
  /// Send `"variables": {}`. Some GraphQL servers reject requests without an object there.
  #[serde(rename = "default_empty_object")]
  #[schemars(title = "default_empty_object")]
  #[default]
  DefaultEmptyObject,
  /// Leave the `variables` key out of the request body.
  #[serde(rename = "omit")]
  #[schemars(title = "omit")]
  Omit,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, JsonSchema, PartialEq, Eq, Default)]
pub enum CookieSeparator {
  /// `forwarded; existing`
  #[serde(rename = "spaced")]
  #[schemars(title = "spaced")]
  #[default]
  Spaced,
  /// `forwarded;existing`, byte-compatible with older deployments.
  #[serde(rename = "legacy")]
  #[schemars(title = "legacy")]
  Legacy,
}

impl CookieSeparator {
  pub fn as_str(&self) -> &'static str {
    match self {
      CookieSeparator::Spaced => "; ",
      CookieSeparator::Legacy => ";",
    }
  }
}

fn forward_cookies_default_value() -> bool {
  true
}

fn graphql_example_1() -> JsonSchemaExample<GraphQLPluginConfig> {
  JsonSchemaExample {
    metadata: JsonSchemaExampleMetadata::new("Defaults", None),
    wrapper: Some(JsonSchemaExampleWrapperType::Plugin {
      name: "graphql".to_string(),
    }),
    example: GraphQLPluginConfig::default(),
  }
}

fn graphql_example_2() -> JsonSchemaExample<GraphQLPluginConfig> {
  JsonSchemaExample {
    metadata: JsonSchemaExampleMetadata::new(
      "Omit Variables",
      Some("Leaves out empty variables, and appends an existing `Cookie` header without a space after the forwarded cookies."),
    ),
    wrapper: Some(JsonSchemaExampleWrapperType::Plugin {
      name: "graphql".to_string(),
    }),
    example: GraphQLPluginConfig {
      empty_variables: EmptyVariablesPolicy::Omit,
      forward_cookies: true,
      cookie_separator: CookieSeparator::Legacy,
    },
  }
}
