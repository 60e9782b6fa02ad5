use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Conversation style requested from the chat service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Formal,
    Funny,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Formal => "formal",
            Mode::Funny => "funny",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Mode::Formal => Mode::Funny,
            Mode::Funny => Mode::Formal,
        }
    }

    /// Stored values that are missing or unrecognized fall back to formal.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "formal" => Ok(Mode::Formal),
            "funny" => Ok(Mode::Funny),
            other => Err(format!(
                "unknown mode '{other}' (expected 'formal' or 'funny')"
            )),
        }
    }
}
