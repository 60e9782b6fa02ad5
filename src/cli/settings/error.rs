//! Error types for settings operations.

/// Errors that can occur when modifying configuration settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingError {
    /// The provided setting key is not recognized.
    #[error("Unknown config key: {0}")]
    UnknownKey(String),
    #[error("Unknown theme: {input}")]
    UnknownTheme { input: String },
    #[error("Invalid value for {key}: {input}")]
    InvalidValue { key: &'static str, input: String },
    /// Required arguments are missing.
    #[error("{hint}")]
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown config key: {key}");
                eprintln!("   Known keys: {}", super::KNOWN_KEYS.join(", "));
            }
            SettingError::UnknownTheme { input } => {
                eprintln!("❌ Unknown theme: {input}. Available: dark, light, monochrome");
            }
            SettingError::InvalidValue { key, input } => {
                eprintln!("❌ Invalid value for {key}: {input}");
            }
            SettingError::MissingArgs { hint, example } => {
                eprintln!("⚠️  {hint}");
                eprintln!("Example: {example}");
            }
        }
    }
}
