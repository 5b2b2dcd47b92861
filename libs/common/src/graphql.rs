use serde_json::{Map, Value};

/// The JSON body of a GraphQL-over-HTTP `POST` request.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQLRequest {
  // The GraphQL operation, sent as `query`
  pub operation: String,
  // GraphQL operation variables, omitted when `None`
  pub variables: Option<Map<String, Value>>,
  // The operation name, omitted when `None`
  pub operation_name: Option<String>,
}

impl From<GraphQLRequest> for Value {
  fn from(request: GraphQLRequest) -> Self {
    let mut body = Map::new();
    body.insert("query".to_string(), Value::String(request.operation));

    if let Some(variables) = request.variables {
      body.insert("variables".to_string(), Value::Object(variables));
    }

    if let Some(operation_name) = request.operation_name {
      body.insert("operationName".to_string(), Value::String(operation_name));
    }

    Value::Object(body)
  }
}
