use std::fmt;

use crate::api::HealthStatus;
use crate::core::mode::Mode;

/// Total characters a single message is expected to fit in.
pub const INPUT_BUDGET: usize = 500;

/// Above this many characters the input counter becomes visible.
pub const INPUT_WARNING_THRESHOLD: usize = 450;

/// Live status readout shown next to the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Connecting,
    Connected,
    ServiceError(u16),
    Unreachable,
    Thinking,
    Ready,
    Error,
    ModeChanged(Mode),
    HistoryCleared,
    PleaseWait,
    StorageError(String),
}

impl Status {
    pub fn from_health(health: HealthStatus) -> Self {
        match health {
            HealthStatus::Connected => Status::Connected,
            HealthStatus::Degraded(code) => Status::ServiceError(code),
            HealthStatus::Unreachable => Status::Unreachable,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Status::ServiceError(_) | Status::Unreachable | Status::Error | Status::StorageError(_)
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Connecting => f.write_str("Connecting..."),
            Status::Connected => f.write_str("Connected"),
            Status::ServiceError(code) => write!(f, "Service error (HTTP {code})"),
            Status::Unreachable => f.write_str("Service unreachable"),
            Status::Thinking => f.write_str("Thinking..."),
            Status::Ready => f.write_str("Ready"),
            Status::Error => f.write_str("Error: could not get a reply"),
            Status::ModeChanged(mode) => write!(f, "Mode set to {mode}"),
            Status::HistoryCleared => f.write_str("History cleared"),
            Status::PleaseWait => f.write_str("Please wait for the current reply"),
            Status::StorageError(err) => write!(f, "Storage error: {err}"),
        }
    }
}

/// Advisory counter for long input. Never blocks submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputNotice {
    Remaining(usize),
    OverBy(usize),
}

impl InputNotice {
    pub fn for_length(length: usize) -> Option<Self> {
        if length <= INPUT_WARNING_THRESHOLD {
            None
        } else if length <= INPUT_BUDGET {
            Some(InputNotice::Remaining(INPUT_BUDGET - length))
        } else {
            Some(InputNotice::OverBy(length - INPUT_BUDGET))
        }
    }
}

impl fmt::Display for InputNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputNotice::Remaining(1) => f.write_str("1 character remaining"),
            InputNotice::Remaining(n) => write!(f, "{n} characters remaining"),
            InputNotice::OverBy(n) => write!(f, "{n} over the {INPUT_BUDGET} character limit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_hidden_up_to_threshold() {
        assert_eq!(InputNotice::for_length(0), None);
        assert_eq!(InputNotice::for_length(450), None);
    }

    #[test]
    fn notice_counts_down_past_threshold() {
        assert_eq!(InputNotice::for_length(451), Some(InputNotice::Remaining(49)));
        assert_eq!(InputNotice::for_length(500), Some(InputNotice::Remaining(0)));
        assert_eq!(InputNotice::for_length(512), Some(InputNotice::OverBy(12)));
        assert_eq!(
            InputNotice::Remaining(49).to_string(),
            "49 characters remaining"
        );
    }

    #[test]
    fn health_maps_to_status() {
        assert_eq!(
            Status::from_health(HealthStatus::Connected),
            Status::Connected
        );
        assert_eq!(
            Status::from_health(HealthStatus::Degraded(502)),
            Status::ServiceError(502)
        );
        assert!(Status::from_health(HealthStatus::Unreachable).is_error());
    }
}
