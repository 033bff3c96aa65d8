//! Handler responses and the action tags the caller executes

use crate::CriticalOperation;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// What the caller should do with a response besides speaking it.
///
/// The set is closed; [`ActionTag::parse`] maps anything unrecognized to
/// [`ActionTag::Speak`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionTag {
    Speak,
    Exit,
    Timer,
    Shutdown,
    Restart,
    CancelOperation,
    VolumeUp,
    VolumeDown,
}

impl ActionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionTag::Speak => "speak",
            ActionTag::Exit => "exit",
            ActionTag::Timer => "timer",
            ActionTag::Shutdown => "shutdown",
            ActionTag::Restart => "restart",
            ActionTag::CancelOperation => "cancel_operation",
            ActionTag::VolumeUp => "volume_up",
            ActionTag::VolumeDown => "volume_down",
        }
    }

    pub fn parse(tag: &str) -> Self {
        match tag.trim() {
            "exit" => ActionTag::Exit,
            "timer" => ActionTag::Timer,
            "shutdown" => ActionTag::Shutdown,
            "restart" => ActionTag::Restart,
            "cancel_operation" => ActionTag::CancelOperation,
            "volume_up" => ActionTag::VolumeUp,
            "volume_down" => ActionTag::VolumeDown,
            _ => ActionTag::Speak,
        }
    }
}

impl From<CriticalOperation> for ActionTag {
    fn from(op: CriticalOperation) -> Self {
        match op {
            CriticalOperation::Shutdown => ActionTag::Shutdown,
            CriticalOperation::Restart => ActionTag::Restart,
        }
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActionTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(ActionTag::parse(&tag))
    }
}

/// Output of a handler, consumed immediately by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Text to speak
    pub text: String,
    /// Action to execute after speaking
    pub action: ActionTag,
    /// Whether the caller must collect a confirmation before anything happens
    pub requires_confirmation: bool,
    /// Operation awaiting confirmation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_type: Option<CriticalOperation>,
    /// Timer length in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
}

pub const NOT_UNDERSTOOD: &str =
    "I'm sorry, I didn't understand that command. Could you please repeat?";

impl Response {
    pub fn speak(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ActionTag::Speak,
            requires_confirmation: false,
            confirmation_type: None,
            duration_secs: None,
        }
    }

    pub fn not_understood() -> Self {
        Self::speak(NOT_UNDERSTOOD)
    }

    pub fn timer(text: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            duration_secs: Some(duration_secs),
            ..Self::speak(text).with_action(ActionTag::Timer)
        }
    }

    pub fn with_action(mut self, action: ActionTag) -> Self {
        self.action = action;
        self
    }

    /// Ask the caller to confirm `operation` before running it
    pub fn with_confirmation(mut self, operation: CriticalOperation) -> Self {
        self.requires_confirmation = true;
        self.confirmation_type = Some(operation);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_fall_back_to_speak() {
        assert_eq!(ActionTag::parse("volume_down"), ActionTag::VolumeDown);
        assert_eq!(ActionTag::parse("dance"), ActionTag::Speak);
        assert_eq!(ActionTag::parse(""), ActionTag::Speak);
    }

    #[test]
    fn tags_parse_their_own_names() {
        for tag in [
            ActionTag::Speak,
            ActionTag::Exit,
            ActionTag::Timer,
            ActionTag::Shutdown,
            ActionTag::Restart,
            ActionTag::CancelOperation,
            ActionTag::VolumeUp,
            ActionTag::VolumeDown,
        ] {
            assert_eq!(ActionTag::parse(tag.as_str()), tag);
        }
    }

    #[test]
    fn json_with_unknown_action_deserializes_as_speak() -> Result<(), serde_json::Error> {
        let r: Response = serde_json::from_str(
            r#"{"text":"hi","action":"teleport","requires_confirmation":false}"#,
        )?;
        assert_eq!(r.action, ActionTag::Speak);
        assert_eq!(r.duration_secs, None);
        Ok(())
    }

    #[test]
    fn timer_response_carries_duration() -> Result<(), serde_json::Error> {
        let r = Response::timer("Setting a timer for 90 seconds.", 90);
        let json = serde_json::to_string(&r)?;
        assert!(json.contains(r#""action":"timer""#));
        assert!(json.contains(r#""duration_secs":90"#));
        assert!(!json.contains("confirmation_type"));
        Ok(())
    }
}
