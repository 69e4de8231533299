pub mod config;
pub mod dns_management;
pub mod errors;
pub mod hook_manager;
pub mod http_request;
pub mod types;
pub mod zone;
