mod config;
mod cookies;
mod plugin;

#[cfg(test)]
mod test;

pub use crate::config::CookieSeparator;
pub use crate::config::EmptyVariablesPolicy;
pub use crate::config::GraphQLPluginConfig as Config;
pub use crate::cookies::{cookie_domain, merge_forwarded_cookies};
pub use crate::plugin::GraphQLPlugin as Plugin;
