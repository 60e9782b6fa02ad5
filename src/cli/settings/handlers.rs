//! Handlers for the individual configuration keys.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use super::{success_set, success_unset, SettingError, SettingHandler};
use crate::core::config::data::Config;
use crate::ui::theme::Theme;

fn joined(args: &[String], hint: &'static str, example: &'static str) -> Result<String, SettingError> {
    let value = args.join(" ").trim().to_string();
    if value.is_empty() {
        return Err(SettingError::MissingArgs { hint, example });
    }
    Ok(value)
}

/// Handler for the `base-url` setting.
pub struct BaseUrlHandler;

impl SettingHandler for BaseUrlHandler {
    fn key(&self) -> &'static str {
        "base-url"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let value = joined(
            args,
            "To set the chat service URL, specify it:",
            "chatguard set base-url http://localhost:5001/api",
        )?;
        if !(value.starts_with("http://") || value.starts_with("https://")) {
            return Err(SettingError::InvalidValue {
                key: self.key(),
                input: value,
            });
        }
        let normalized = value.trim_end_matches('/').to_string();
        let message = success_set(self.key(), &normalized);
        config.base_url = Some(normalized);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> String {
        config.base_url = None;
        success_unset(self.key())
    }
}

/// Handler for the `theme` setting.
pub struct ThemeHandler;

impl SettingHandler for ThemeHandler {
    fn key(&self) -> &'static str {
        "theme"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let value = joined(args, "To set a theme, specify it:", "chatguard set theme light")?;
        let id = value.to_ascii_lowercase();
        if Theme::from_name(&id).is_none() {
            return Err(SettingError::UnknownTheme { input: value });
        }
        let message = success_set(self.key(), &id);
        config.theme = Some(id);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> String {
        config.theme = None;
        success_unset(self.key())
    }
}

/// Handler for the `request-timeout` setting (whole seconds, non-zero).
pub struct RequestTimeoutHandler;

impl SettingHandler for RequestTimeoutHandler {
    fn key(&self) -> &'static str {
        "request-timeout"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let value = joined(
            args,
            "To set the request timeout, specify seconds:",
            "chatguard set request-timeout 20",
        )?;
        let secs = value
            .trim_end_matches('s')
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| SettingError::InvalidValue {
                key: self.key(),
                input: value.clone(),
            })?;
        config.request_timeout = Some(secs);
        Ok(success_set(self.key(), &format!("{secs}s")))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.request_timeout = None;
        success_unset(self.key())
    }
}

/// Handler for the `data-dir` setting.
pub struct DataDirHandler;

impl SettingHandler for DataDirHandler {
    fn key(&self) -> &'static str {
        "data-dir"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let value = joined(
            args,
            "To move the chat store, specify a directory:",
            "chatguard set data-dir ~/chats",
        )?;
        let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        let dir = expand_data_dir(&value, home.as_deref()).ok_or_else(|| {
            SettingError::InvalidValue {
                key: self.key(),
                input: value.clone(),
            }
        })?;
        let message = success_set(self.key(), &dir.display().to_string());
        config.data_dir = Some(dir);
        Ok(message)
    }

    fn unset(&self, config: &mut Config) -> String {
        config.data_dir = None;
        success_unset(self.key())
    }
}

/// Resolves a leading `~` against `home`. Any other relative path is
/// rejected, since it would depend on the directory the command runs from.
pub(crate) fn expand_data_dir(value: &str, home: Option<&Path>) -> Option<PathBuf> {
    let Some(after_tilde) = value.strip_prefix('~') else {
        let path = PathBuf::from(value);
        return path.is_absolute().then_some(path);
    };
    let rest = after_tilde.trim_start_matches(std::path::is_separator);
    // `~user/...` is not supported.
    if !after_tilde.is_empty() && rest.len() == after_tilde.len() {
        return None;
    }
    let home = home?;
    Some(if rest.is_empty() {
        home.to_path_buf()
    } else {
        home.join(rest)
    })
}
