//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a [`SettingHandler`] that validates input and
//! mutates a [`Config`] in memory. Persisting the result is left to the
//! caller so handlers stay testable without touching the user's config file.

pub mod error;
pub mod handlers;

pub use error::SettingError;

use crate::core::config::data::Config;
use handlers::{BaseUrlHandler, DataDirHandler, RequestTimeoutHandler, ThemeHandler};

pub const KNOWN_KEYS: [&str; 4] = ["base-url", "theme", "request-timeout", "data-dir"];

/// Trait for handling a configuration setting.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Apply `args` to `config`, returning a success message.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value, returning a success message.
    fn unset(&self, config: &mut Config) -> String;
}

fn handler_for(key: &str) -> Result<Box<dyn SettingHandler>, SettingError> {
    let handler: Box<dyn SettingHandler> = match key {
        "base-url" => Box::new(BaseUrlHandler),
        "theme" => Box::new(ThemeHandler),
        "request-timeout" => Box::new(RequestTimeoutHandler),
        "data-dir" => Box::new(DataDirHandler),
        _ => return Err(SettingError::UnknownKey(key.to_string())),
    };
    debug_assert!(KNOWN_KEYS.contains(&handler.key()));
    Ok(handler)
}

pub fn set_setting(config: &mut Config, key: &str, args: &[String]) -> Result<String, SettingError> {
    handler_for(key)?.set(args, config)
}

pub fn unset_setting(config: &mut Config, key: &str) -> Result<String, SettingError> {
    Ok(handler_for(key)?.unset(config))
}

fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

fn success_unset(key: &str) -> String {
    format!("✅ Unset {key}")
}
