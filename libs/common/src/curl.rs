use crate::{
  http::{Method, Property},
  plugin::RawRequest,
};

const DATA_FLAG: &str = "--data-raw ";
const LINE_BREAK: &str = " \\\n";
const ESCAPED_QUOTE: &str = "'\\''";

/// Renders a request as a `curl` command, one argument per line.
///
/// Arguments are single-quoted for POSIX shells. Headers without a key are skipped, and the body line is
/// left out when there is no body.
pub fn make_curl_string(method: &Method, url: &str, headers: &[Property], body: &str) -> RawRequest {
  let mut lines = vec![format!(
    "curl --location --request {} {}",
    method,
    shell_quote(url)
  )];

  for header in headers.iter().filter(|h| h.has_key()) {
    lines.push(format!(
      "--header {}",
      shell_quote(&format!("{}: {}", header.key.trim(), header.value))
    ));
  }

  if !body.is_empty() {
    lines.push(format!("{}{}", DATA_FLAG, shell_quote(body)));
  }

  lines.join(LINE_BREAK)
}

/// Extracts the body from a command built by [`make_curl_string`], undoing the shell quoting.
///
/// The body is always the last argument, so its opening quote is found by walking back from the end.
pub fn parse_curl_body(raw: &str) -> Option<String> {
  let content = raw.strip_suffix('\'')?;
  let mut end = content.len();

  let opening = loop {
    let quote = content[..end].rfind('\'')?;

    if content[..=quote].ends_with(ESCAPED_QUOTE) {
      end = quote + 1 - ESCAPED_QUOTE.len();
    } else {
      break quote;
    }
  };

  if !content[..opening].ends_with(&format!("{}{}", LINE_BREAK, DATA_FLAG)) {
    return None;
  }

  Some(content[opening + 1..].replace(ESCAPED_QUOTE, "'"))
}

fn shell_quote(value: &str) -> String {
  format!("'{}'", value.replace('\'', ESCAPED_QUOTE))
}
