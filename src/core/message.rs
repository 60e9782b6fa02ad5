use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sender {
    User,
    Bot,
}

/// Moderation tag attached to a message by the chat service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "String")]
pub enum Classification {
    #[default]
    Safe,
    Offensive,
    Irrelevant,
}

/// A single transcript entry. Entries are never edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    #[serde(default, deserialize_with = "classification_or_safe")]
    pub classification: Classification,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }

    pub fn is_user(self) -> bool {
        self == Sender::User
    }

    pub fn is_bot(self) -> bool {
        self == Sender::Bot
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored history only distinguishes the user from everyone else, so any
/// sender other than `user` is read back as the bot.
impl From<&str> for Sender {
    fn from(value: &str) -> Self {
        match value {
            "user" => Sender::User,
            _ => Sender::Bot,
        }
    }
}

impl From<String> for Sender {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Sender> for String {
    fn from(value: Sender) -> Self {
        value.as_str().to_string()
    }
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Safe => "safe",
            Classification::Offensive => "offensive",
            Classification::Irrelevant => "irrelevant",
        }
    }

    /// Lenient parse used for service replies and stored history: anything
    /// that is not a known flag counts as safe.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "offensive" => Classification::Offensive,
            "irrelevant" => Classification::Irrelevant,
            _ => Classification::Safe,
        }
    }

    pub fn is_flagged(self) -> bool {
        self != Classification::Safe
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Classification> for String {
    fn from(value: Classification) -> Self {
        value.as_str().to_string()
    }
}

impl<'de> Deserialize<'de> for Classification {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        classification_or_safe(deserializer)
    }
}

/// Accepts a missing, null, or unknown classification and maps it to
/// [`Classification::Safe`].
pub fn classification_or_safe<'de, D>(deserializer: D) -> Result<Classification, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag
        .as_deref()
        .map(Classification::from_tag)
        .unwrap_or_default())
}

impl Message {
    pub fn new(text: impl Into<String>, sender: Sender, classification: Classification) -> Self {
        Self {
            text: text.into(),
            sender,
            classification,
        }
    }

    /// User-authored messages are always recorded as safe.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User, Classification::Safe)
    }

    pub fn bot(text: impl Into<String>, classification: Classification) -> Self {
        Self::new(text, Sender::Bot, classification)
    }

    pub fn is_user(&self) -> bool {
        self.sender.is_user()
    }

    pub fn is_bot(&self) -> bool {
        self.sender.is_bot()
    }
}
