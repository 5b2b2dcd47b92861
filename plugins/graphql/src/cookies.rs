use actuator_common::{
  action::ForwardedCookies,
  http::{Host, Property, Url},
};

use crate::config::CookieSeparator;

static COOKIE_HEADER: &str = "Cookie";

/// The domain forwarded cookies must belong to in order to be sent to `url`.
///
/// The leftmost label is dropped from hosts with three or more labels (`api.example.com` -> `example.com`).
/// Shorter hosts and IP addresses are used as-is.
pub fn cookie_domain(url: &Url) -> Option<String> {
  match url.host()? {
    Host::Domain(domain) => match domain.split_once('.') {
      Some((_, rest)) if rest.contains('.') => Some(rest.to_string()),
      _ => Some(domain.to_string()),
    },
    Host::Ipv4(_) | Host::Ipv6(_) => url.host_str().map(ToString::to_string),
  }
}

/// Replaces the `Cookie` headers of `headers` with a single one that carries the cookies forwarded for `domain`.
///
/// The value of the first existing `Cookie` header is kept after the forwarded ones. Nothing changes when no
/// forwarded cookie belongs to `domain`. Returns how many cookies were forwarded.
pub fn merge_forwarded_cookies(
  headers: &mut Vec<Property>,
  domain: &str,
  cookies: &ForwardedCookies,
  separator: CookieSeparator,
) -> usize {
  let matching = cookies
    .iter()
    .filter(|(_, cookie)| cookie.domain == domain)
    .map(|(name, cookie)| format!("{}={}", name, cookie.value))
    .collect::<Vec<_>>();

  if matching.is_empty() {
    return 0;
  }

  // Header keys are matched exactly, as they were authored.
  let existing = headers
    .iter()
    .find(|h| h.key == COOKIE_HEADER)
    .map(|h| h.value.clone());
  headers.retain(|h| h.key != COOKIE_HEADER);

  let mut value = matching.join("; ");
  if let Some(existing) = existing {
    value.push_str(separator.as_str());
    value.push_str(&existing);
  }

  headers.push(Property::new(COOKIE_HEADER, value));

  matching.len()
}
