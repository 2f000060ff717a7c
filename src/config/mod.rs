pub mod schema;

pub use schema::{Config, GatewayConfig, SessionsConfig, CONFIG_DIR_ENV};
