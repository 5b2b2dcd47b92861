pub mod action;
pub mod curl;
pub mod execute;
pub mod graphql;
pub mod http;
pub mod json;
pub mod plugin;
pub mod request_config;
pub mod serde_utils;
