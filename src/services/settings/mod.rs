//! Settings persistence.
//!
//! Settings live in a TOML file under the platform config directory and can
//! be overridden from the environment for scripted use.

mod service;

pub use service::{SettingsService, ENV_ACCESS_TOKEN, ENV_API_URL};
