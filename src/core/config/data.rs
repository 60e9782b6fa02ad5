use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const BASE_URL_ENV: &str = "CHATGUARD_API_URL";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the chat service API, e.g. `http://localhost:5001/api`
    pub base_url: Option<String>,
    /// UI theme name ("dark", "light", "monochrome")
    pub theme: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout: Option<u64>,
    /// Where mode and transcript are kept; defaults to the platform data dir
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Resolve the service URL: explicit flag, then environment, then config,
    /// then the built-in default.
    pub fn effective_base_url(&self, cli_override: Option<&str>) -> String {
        let env_value = std::env::var(BASE_URL_ENV).ok();
        self.resolve_base_url(cli_override, env_value.as_deref())
    }

    pub(crate) fn resolve_base_url(
        &self,
        cli_override: Option<&str>,
        env_value: Option<&str>,
    ) -> String {
        [cli_override, env_value, self.base_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (unset, using {DEFAULT_BASE_URL})"),
        }
        match &self.theme {
            Some(theme) => println!("  theme: {theme}"),
            None => println!("  theme: (unset, using dark)"),
        }
        match self.request_timeout {
            Some(secs) => println!("  request-timeout: {secs}s"),
            None => println!("  request-timeout: (unset, using {DEFAULT_REQUEST_TIMEOUT_SECS}s)"),
        }
        match &self.data_dir {
            Some(dir) => println!("  data-dir: {}", path_display(dir)),
            None => println!("  data-dir: (unset, using platform default)"),
        }
    }
}

/// Get a user-friendly display string for a path, using `~` for the home
/// directory on Unix-like systems.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
