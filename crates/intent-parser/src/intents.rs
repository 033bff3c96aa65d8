//! The fixed set of intents an utterance can be classified into

use crate::ClassifierError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classified purpose of an utterance.
///
/// Variant order is the evaluation order of the pattern table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Time,
    Date,
    Weather,
    OpenBrowser,
    OpenApp,
    SystemInfo,
    Shutdown,
    Restart,
    CancelOperation,
    Timer,
    Volume,
    Greeting,
    Exit,
}

impl Intent {
    /// All intents in declaration order
    pub const ALL: [Intent; 13] = [
        Intent::Time,
        Intent::Date,
        Intent::Weather,
        Intent::OpenBrowser,
        Intent::OpenApp,
        Intent::SystemInfo,
        Intent::Shutdown,
        Intent::Restart,
        Intent::CancelOperation,
        Intent::Timer,
        Intent::Volume,
        Intent::Greeting,
        Intent::Exit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Time => "time",
            Intent::Date => "date",
            Intent::Weather => "weather",
            Intent::OpenBrowser => "open_browser",
            Intent::OpenApp => "open_app",
            Intent::SystemInfo => "system_info",
            Intent::Shutdown => "shutdown",
            Intent::Restart => "restart",
            Intent::CancelOperation => "cancel_operation",
            Intent::Timer => "timer",
            Intent::Volume => "volume",
            Intent::Greeting => "greeting",
            Intent::Exit => "exit",
        }
    }

    /// Whether this intent guards an irreversible system operation
    pub fn is_critical(&self) -> bool {
        matches!(self, Intent::Shutdown | Intent::Restart)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| ClassifierError::UnknownIntent(s.to_string()))
    }
}
