#[cfg(test)]
pub mod graphql_plugin {
  use std::cell::RefCell;

  use actuator_common::{
    action::{
      ActionConfiguration, CustomActionConfiguration, DatasourceConfiguration, ForwardedCookie,
      ForwardedCookies, StringProperty,
    },
    curl::parse_curl_body,
    execute::{ExecutionContext, ExecutionOutput},
    http::{HttpRequestDescriptor, Method, Property, Url},
    plugin::{ApiPlugin, HttpExecutor, PluginError, PluginExecutionProps},
  };
  use serde_json::{json, Value};

  use crate::{CookieSeparator, EmptyVariablesPolicy};

  #[derive(Debug, Default)]
  struct RecordingExecutor {
    requests: RefCell<Vec<HttpRequestDescriptor>>,
  }

  #[async_trait::async_trait(?Send)]
  impl HttpExecutor for RecordingExecutor {
    async fn execute_request(&self, request: HttpRequestDescriptor) -> ExecutionOutput {
      self.requests.borrow_mut().push(request);

      ExecutionOutput {
        output: json!({ "data": { "__typename": "Query" } }),
        ..Default::default()
      }
    }
  }

  impl RecordingExecutor {
    fn single(&self) -> HttpRequestDescriptor {
      let requests = self.requests.borrow();
      assert_eq!(requests.len(), 1);
      requests[0].clone()
    }
  }

  fn plugin(config: crate::Config) -> crate::Plugin {
    crate::Plugin(config)
  }

  fn action(path: &str, variables: Option<&str>) -> ActionConfiguration {
    ActionConfiguration {
      path: Some(path.to_string()),
      body: Some("query Me($id: ID!) { user(id: $id) { name } }".to_string()),
      custom: Some(CustomActionConfiguration {
        variables: variables.map(StringProperty::new),
        operation_name: None,
      }),
      ..Default::default()
    }
  }

  fn cookies(entries: &[(&str, &str, &str)]) -> ForwardedCookies {
    entries
      .iter()
      .map(|(name, domain, value)| {
        (
          name.to_string(),
          ForwardedCookie {
            domain: domain.to_string(),
            value: value.to_string(),
          },
        )
      })
      .collect()
  }

  async fn execute(
    plugin: &crate::Plugin,
    action: &ActionConfiguration,
    forwarded_cookies: &ForwardedCookies,
  ) -> (Result<ExecutionOutput, PluginError>, RecordingExecutor) {
    let executor = RecordingExecutor::default();
    let result = plugin
      .execute(PluginExecutionProps {
        context: &ExecutionContext {
          execution_id: "test".to_string(),
          ..Default::default()
        },
        datasource_configuration: &DatasourceConfiguration::default(),
        action_configuration: action,
        forwarded_cookies,
        http: &executor,
      })
      .await;

    (result, executor)
  }

  fn cookie_headers(request: &HttpRequestDescriptor) -> Vec<&str> {
    request
      .headers
      .iter()
      .filter(|h| h.key == "Cookie")
      .map(|h| h.value.as_str())
      .collect()
  }

  pub mod body {
    use super::*;

    #[tokio::test]
    async fn variables_are_parsed_into_an_object() {
      let (result, executor) = execute(
        &plugin(Default::default()),
        &action("https://api.example.com/graphql", Some(r#"{"id": "1", "nested": {"a": [1, 2]}}"#)),
        &Default::default(),
      )
      .await;

      assert_eq!(
        result.unwrap().output,
        json!({ "data": { "__typename": "Query" } })
      );
      assert_eq!(
        executor.single().data.as_json(),
        Some(&json!({
          "query": "query Me($id: ID!) { user(id: $id) { name } }",
          "variables": { "id": "1", "nested": { "a": [1, 2] } }
        }))
      );
    }

    #[tokio::test]
    async fn empty_variables_default_to_empty_object() {
      let plugin = plugin(Default::default());

      for variables in [None, Some("")] {
        let (result, executor) = execute(
          &plugin,
          &action("https://api.example.com/graphql", variables),
          &Default::default(),
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(
          executor.single().data.as_json().unwrap()["variables"],
          json!({})
        );
      }
    }

    #[tokio::test]
    async fn empty_variables_omitted() {
      let plugin = plugin(crate::Config {
        empty_variables: EmptyVariablesPolicy::Omit,
        ..Default::default()
      });

      for variables in [None, Some("")] {
        let (_, executor) = execute(
          &plugin,
          &action("https://api.example.com/graphql", variables),
          &Default::default(),
        )
        .await;

        let body = executor.single().data.as_json().cloned().unwrap();
        assert_eq!(
          body,
          json!({ "query": "query Me($id: ID!) { user(id: $id) { name } }" })
        );
      }
    }

    #[tokio::test]
    async fn missing_custom_section() {
      let action = ActionConfiguration {
        path: Some("https://api.example.com/graphql".to_string()),
        body: Some("{ a }".to_string()),
        ..Default::default()
      };
      let (_, executor) = execute(&plugin(Default::default()), &action, &Default::default()).await;

      assert_eq!(
        executor.single().data.as_json(),
        Some(&json!({ "query": "{ a }", "variables": {} }))
      );
    }

    #[tokio::test]
    async fn operation_name_is_forwarded() {
      let mut action = action("https://api.example.com/graphql", None);
      if let Some(custom) = action.custom.as_mut() {
        custom.operation_name = Some(StringProperty::new("Me"));
      }

      let (_, executor) = execute(&plugin(Default::default()), &action, &Default::default()).await;
      assert_eq!(
        executor.single().data.as_json().unwrap()["operationName"],
        json!("Me")
      );
    }

    #[tokio::test]
    async fn malformed_variables_fail() {
      for variables in ["{not json}", "[1, 2]", "\"string\"", "null", "  "] {
        for policy in [EmptyVariablesPolicy::DefaultEmptyObject, EmptyVariablesPolicy::Omit] {
          let plugin = plugin(crate::Config {
            empty_variables: policy,
            ..Default::default()
          });
          let (result, executor) = execute(
            &plugin,
            &action("https://api.example.com/graphql", Some(variables)),
            &Default::default(),
          )
          .await;

          match result {
            Err(PluginError::ParseError { property, .. }) => {
              assert_eq!(property, "custom.variables.value")
            }
            other => panic!("expected a parse error for {:?}, got {:?}", variables, other),
          }
          assert!(executor.requests.borrow().is_empty());
        }
      }
    }
  }

  pub mod method {
    use super::*;

    #[tokio::test]
    async fn always_post() {
      for method in [None, Some(Method::GET), Some(Method::PUT), Some(Method::DELETE)] {
        let mut action = action("https://api.example.com/graphql", None);
        action.http_method = method;

        let (_, executor) = execute(&plugin(Default::default()), &action, &Default::default()).await;
        assert_eq!(executor.single().method, Method::POST);
      }
    }

    #[tokio::test]
    async fn request_shape() {
      let mut action = action("/graphql", None);
      action.headers = vec![Property::new("X-Request-Id", "42")];

      let executor = RecordingExecutor::default();
      crate::Plugin::default()
        .execute(PluginExecutionProps {
          context: &ExecutionContext {
            execution_id: "test".to_string(),
            ..Default::default()
          },
          datasource_configuration: &DatasourceConfiguration {
            url: Some("https://api.example.com".to_string()),
            headers: vec![Property::new("Authorization", "Bearer token")],
            ..Default::default()
          },
          action_configuration: &action,
          forwarded_cookies: &Default::default(),
          http: &executor,
        })
        .await
        .unwrap();

      let request = executor.single();
      assert_eq!(request.url, "https://api.example.com/graphql");
      assert_eq!(
        request.headers,
        vec![
          Property::new("Authorization", "Bearer token"),
          Property::new("X-Request-Id", "42"),
          Property::new("Content-Type", "application/json"),
        ]
      );
    }
  }

  pub mod cookies {
    use super::*;

    #[test]
    fn domain_of_url() {
      let domain = |url: &str| crate::cookie_domain(&Url::parse(url).unwrap());

      assert_eq!(
        domain("https://api.example.com/graphql"),
        Some("example.com".to_string())
      );
      assert_eq!(
        domain("https://a.b.example.com"),
        Some("b.example.com".to_string())
      );
      assert_eq!(domain("https://example.com"), Some("example.com".to_string()));
      assert_eq!(domain("http://localhost:4000"), Some("localhost".to_string()));
      assert_eq!(domain("http://10.0.0.1:4000"), Some("10.0.0.1".to_string()));
    }

    #[tokio::test]
    async fn only_matching_domain_is_forwarded() {
      let (_, executor) = execute(
        &plugin(Default::default()),
        &action("https://api.example.com/graphql", None),
        &cookies(&[("a", "example.com", "1"), ("b", "other.com", "2")]),
      )
      .await;

      assert_eq!(cookie_headers(&executor.single()), vec!["a=1"]);
    }

    #[tokio::test]
    async fn multiple_cookies_are_joined() {
      let (_, executor) = execute(
        &plugin(Default::default()),
        &action("https://api.example.com/graphql", None),
        &cookies(&[("a", "example.com", "1"), ("b", "example.com", "2")]),
      )
      .await;

      assert_eq!(cookie_headers(&executor.single()), vec!["a=1; b=2"]);
    }

    #[tokio::test]
    async fn existing_cookie_header_is_replaced() {
      let mut action = action("https://api.example.com/graphql", None);
      action.headers = vec![
        Property::new("Cookie", "session=abc"),
        Property::new("X-Other", "1"),
        Property::new("Cookie", "second=def"),
      ];
      let forwarded = cookies(&[("a", "example.com", "1")]);

      let (_, executor) = execute(&plugin(Default::default()), &action, &forwarded).await;
      let request = executor.single();
      assert_eq!(cookie_headers(&request), vec!["a=1; session=abc"]);
      assert_eq!(request.header("X-Other"), Some("1"));

      let legacy = plugin(crate::Config {
        cookie_separator: CookieSeparator::Legacy,
        ..Default::default()
      });
      let (_, executor) = execute(&legacy, &action, &forwarded).await;
      assert_eq!(cookie_headers(&executor.single()), vec!["a=1;session=abc"]);
    }

    #[tokio::test]
    async fn headers_untouched_without_match() {
      let mut action = action("https://api.example.com/graphql", None);
      action.headers = vec![
        Property::new("Cookie", "session=abc"),
        Property::new("Cookie", "second=def"),
      ];

      let (_, executor) = execute(
        &plugin(Default::default()),
        &action,
        &cookies(&[("b", "other.com", "2")]),
      )
      .await;

      assert_eq!(
        cookie_headers(&executor.single()),
        vec!["session=abc", "second=def"]
      );
    }

    #[tokio::test]
    async fn lowercase_cookie_header_is_kept() {
      let mut action = action("https://api.example.com/graphql", None);
      action.headers = vec![Property::new("cookie", "session=abc")];

      let (_, executor) = execute(
        &plugin(Default::default()),
        &action,
        &cookies(&[("a", "example.com", "1")]),
      )
      .await;

      let request = executor.single();
      assert_eq!(cookie_headers(&request), vec!["a=1"]);
      assert!(request
        .headers
        .contains(&Property::new("cookie", "session=abc")));
    }

    #[tokio::test]
    async fn disabled_forwarding() {
      let plugin = plugin(crate::Config {
        forward_cookies: false,
        ..Default::default()
      });

      let (_, executor) = execute(
        &plugin,
        &action("https://api.example.com/graphql", None),
        &cookies(&[("a", "example.com", "1")]),
      )
      .await;

      assert!(cookie_headers(&executor.single()).is_empty());
    }

    #[tokio::test]
    async fn unresolvable_path_fails_with_and_without_cookies() {
      let action = action("not a url", None);

      for forwarded in [cookies(&[("a", "example.com", "1")]), cookies(&[])] {
        let (result, executor) = execute(&plugin(Default::default()), &action, &forwarded).await;
        assert!(matches!(result, Err(PluginError::InvalidUrl { .. })));
        assert!(executor.requests.borrow().is_empty());
      }
    }

    #[tokio::test]
    async fn host_less_path_uses_datasource_domain() {
      let action = action("localhost:4000/graphql", None);
      let forwarded = cookies(&[("session", "example.com", "abc")]);

      let executor = RecordingExecutor::default();
      crate::Plugin::default()
        .execute(PluginExecutionProps {
          context: &ExecutionContext::default(),
          datasource_configuration: &DatasourceConfiguration {
            url: Some("https://gw.example.com".to_string()),
            ..Default::default()
          },
          action_configuration: &action,
          forwarded_cookies: &forwarded,
          http: &executor,
        })
        .await
        .unwrap();

      let request = executor.single();
      assert_eq!(request.url, "https://gw.example.com/localhost:4000/graphql");
      assert_eq!(cookie_headers(&request), vec!["session=abc"]);
    }
  }

  pub mod preview {
    use super::*;

    #[tokio::test]
    async fn get_request_matches_executed_body() {
      for (variables, policy) in [
        (Some(r#"{"id": "O'Brien"}"#), EmptyVariablesPolicy::DefaultEmptyObject),
        (None, EmptyVariablesPolicy::DefaultEmptyObject),
        (None, EmptyVariablesPolicy::Omit),
      ] {
        let plugin = plugin(crate::Config {
          empty_variables: policy,
          ..Default::default()
        });
        let mut action = action("https://api.example.com/graphql", variables);
        action.headers = vec![Property::new("X-Request-Id", "42")];

        let raw = plugin.get_request(&action).unwrap();
        assert!(raw.starts_with("curl --location --request POST 'https://api.example.com/graphql'"));
        assert!(raw.contains("--header 'X-Request-Id: 42'"));

        let (_, executor) = execute(&plugin, &action, &Default::default()).await;
        let previewed: Value = serde_json::from_str(&parse_curl_body(&raw).unwrap()).unwrap();
        assert_eq!(Some(&previewed), executor.single().data.as_json());
      }
    }

    #[test]
    fn get_request_fails_on_malformed_variables() {
      assert!(matches!(
        plugin(Default::default())
          .get_request(&action("https://api.example.com/graphql", Some("{not json}"))),
        Err(PluginError::ParseError { .. })
      ));
    }
  }

  pub mod declarations {
    use super::*;

    #[test]
    fn properties() {
      let plugin = crate::Plugin::default();
      assert_eq!(plugin.name(), "graphql");
      assert_eq!(
        plugin.dynamic_properties(),
        vec!["path", "body", "custom.variables.value", "headers"]
      );
      assert_eq!(plugin.escape_string_properties(), vec!["body"]);
    }

    #[tokio::test]
    async fn metadata_and_test() {
      let plugin = crate::Plugin::default();
      let datasource = DatasourceConfiguration {
        url: Some("https://unreachable.invalid".to_string()),
        ..Default::default()
      };

      let metadata = plugin.metadata(&datasource).await.unwrap();
      assert_eq!(serde_json::to_value(metadata).unwrap(), json!({}));
      assert!(plugin.test(&datasource).await.is_ok());
      assert!(plugin.test(&DatasourceConfiguration::default()).await.is_ok());
    }
  }
}
