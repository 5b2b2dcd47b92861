pub mod http_executor;
pub mod plugin_manager;
