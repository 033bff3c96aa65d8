//! Ordered pattern table and the classifier built on it

use crate::parameters::{ParameterSet, TimeUnit, TimerDuration, DEFAULT_LOCATION};
use crate::{ClassifierError, Intent, Result};
use regex::Regex;

/// Patterns per intent, in evaluation order. Utterances are lowercased before
/// matching, so the patterns are written in lowercase.
const PATTERN_TABLE: &[(Intent, &[&str])] = &[
    (
        Intent::Time,
        &[
            r"\bwhat\s+time\s+(?:is\s+)?(?:it\s+)?\b",
            r"\bcurrent\s+time\b",
            r"\btell\s+me\s+the\s+time\b",
            r"\btime\s+(?:please|now)\b",
            r"\bwhat\s+time\b",
        ],
    ),
    (
        Intent::Date,
        &[
            r"\bwhat\s+date\s+(?:is\s+)?(?:it\s+)?\b",
            r"\bcurrent\s+date\b",
            r"\btell\s+me\s+the\s+date\b",
            r"\bwhat\s+day\s+is\s+it\b",
            r"\bdate\s+(?:please|today)\b",
        ],
    ),
    (
        Intent::Weather,
        &[
            r"\bweather\b",
            r"\bweather\s+in\b",
            r"\bhow\s+is\s+the\s+weather\b",
            r"\btemperature\b",
            r"\bwhat\s+weather\b",
        ],
    ),
    (
        Intent::OpenBrowser,
        &[
            r"\bopen\s+browser\b",
            r"\bopen\s+chrome\b",
            r"\bopen\s+firefox\b",
            r"\blaunch\s+browser\b",
            r"\bgo\s+to\s+google\b",
            r"\bstart\s+browser\b",
        ],
    ),
    (
        Intent::OpenApp,
        &[
            r"\bopen\s+(?P<app>notepad|calculator|paint|word|excel)\b",
            r"\blaunch\s+(?P<app>notepad|calculator|paint|word|excel)\b",
            r"\bstart\s+(?P<app>notepad|calculator|paint|word|excel)\b",
        ],
    ),
    (
        Intent::SystemInfo,
        &[
            r"\bsystem\s+info\b",
            r"\bsystem\s+information\b",
            r"\bcomputer\s+info\b",
            r"\bwhat\s+system\s+am\s+i\s+running\b",
        ],
    ),
    (
        Intent::Shutdown,
        &[
            r"\bshutdown\b",
            r"\bshut\s+down\b",
            r"\bturn\s+off\s+computer\b",
            r"\bpower\s+off\b",
            r"\bturn\s+off\s+pc\b",
        ],
    ),
    (
        Intent::Restart,
        &[
            r"\brestart\b",
            r"\breboot\b",
            r"\brestart\s+computer\b",
            r"\brestart\s+pc\b",
        ],
    ),
    (
        Intent::CancelOperation,
        &[
            r"\bcancel\s+(?P<operation>shutdown|restart)\b",
            r"\bstop\s+(?P<operation>shutdown|restart)\b",
            r"\babort\s+(?P<operation>shutdown|restart)\b",
        ],
    ),
    (
        Intent::Timer,
        &[
            r"\bset\s+timer\b",
            r"\btimer\s+for\b",
            r"\bcountdown\s+for\b",
            r"\bremind\s+me\s+in\b",
            r"\bwake\s+me\s+up\s+in\b",
        ],
    ),
    (
        Intent::Volume,
        &[
            r"\bset\s+volume\b",
            r"\bvolume\s+(?:up|down|to)\b",
            r"\bturn\s+(?:up|down)\s+volume\b",
            r"\bchange\s+volume\b",
        ],
    ),
    (
        Intent::Greeting,
        &[
            r"\bhello\b",
            r"\bhi\b",
            r"\bhey\b",
            r"\bgood\s+morning\b",
            r"\bgood\s+afternoon\b",
            r"\bgood\s+evening\b",
        ],
    ),
    (
        Intent::Exit,
        &[
            r"\bgoodbye\b",
            r"\bbye\b",
            r"\bexit\b",
            r"\bquit\b",
            r"\bstop\s+jarvis\b",
        ],
    ),
];

/// Duration patterns, tried in order; the first unit that matches wins.
const DURATION_PATTERNS: &[(TimeUnit, &str)] = &[
    (TimeUnit::Seconds, r"([0-9]+)\s*(?:second|seconds|sec|s)\b"),
    (TimeUnit::Minutes, r"([0-9]+)\s*(?:minute|minutes|min|m)\b"),
    (TimeUnit::Hours, r"([0-9]+)\s*(?:hour|hours|hr|h)\b"),
];

/// Location capture for weather requests. Case-insensitive so the captured
/// place keeps the casing it was given in.
const LOCATION_PATTERN: &str =
    r"(?i)weather\s+(?:in\s+)?([a-z\s,]+?)(?:\s+please|\s+now|\s+today)?$";

/// Lowercase and trim an utterance the way the classifier sees it
pub fn normalize(utterance: &str) -> String {
    utterance.trim().to_lowercase()
}

/// Table-driven intent classifier.
///
/// Built once and read-only afterwards: every method takes `&self`, and the
/// same input always yields the same result.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    table: Vec<(Intent, Vec<Regex>)>,
    durations: Vec<(TimeUnit, Regex)>,
    location: Regex,
}

impl IntentClassifier {
    /// Compile the pattern table
    pub fn new() -> Result<Self> {
        let mut table = Vec::with_capacity(PATTERN_TABLE.len());
        for (intent, patterns) in PATTERN_TABLE {
            let compiled = patterns
                .iter()
                .map(|p| compile(intent.as_str(), p))
                .collect::<Result<Vec<_>>>()?;
            table.push((*intent, compiled));
        }

        let durations = DURATION_PATTERNS
            .iter()
            .map(|(unit, p)| compile("timer", p).map(|re| (*unit, re)))
            .collect::<Result<Vec<_>>>()?;

        let location = compile("weather", LOCATION_PATTERN)?;

        tracing::debug!(intents = table.len(), "compiled intent pattern table");
        Ok(Self {
            table,
            durations,
            location,
        })
    }

    /// Intents in the order they are evaluated
    pub fn intents(&self) -> impl Iterator<Item = Intent> + '_ {
        self.table.iter().map(|(intent, _)| *intent)
    }

    /// Classify an utterance. First intent in table order with any matching
    /// pattern wins; `None` when nothing matches.
    pub fn classify(&self, utterance: &str) -> Option<Intent> {
        let text = normalize(utterance);
        let intent = self
            .table
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(&text)))
            .map(|(intent, _)| *intent);
        tracing::debug!(utterance = %text, ?intent, "classified utterance");
        intent
    }

    /// Extract the parameters an intent's handler consumes
    pub fn extract_parameters(&self, utterance: &str, intent: Intent) -> ParameterSet {
        let params = ParameterSet::default();
        match intent {
            Intent::Timer => match self.extract_duration(&normalize(utterance)) {
                Some(duration) => params.with_duration(duration),
                None => params,
            },
            Intent::Weather => params.with_location(self.extract_location(utterance)),
            Intent::OpenApp => match self.capture(intent, "app", utterance) {
                Some(app) => params.with_app(app),
                None => params,
            },
            Intent::CancelOperation => match self.capture(intent, "operation", utterance) {
                Some(op) => params.with_operation(op),
                None => params,
            },
            _ => params,
        }
    }

    fn extract_duration(&self, text: &str) -> Option<TimerDuration> {
        for (unit, re) in &self.durations {
            if let Some(captures) = re.captures(text) {
                let value = captures.get(1)?.as_str().parse::<u64>().ok()?;
                return TimerDuration::from_spoken(value, *unit);
            }
        }
        None
    }

    fn extract_location(&self, utterance: &str) -> String {
        self.location
            .captures(utterance.trim())
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|loc| !loc.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string())
    }

    /// Named group `group` from the first pattern of `intent` that captures it
    fn capture(&self, intent: Intent, group: &str, utterance: &str) -> Option<String> {
        let text = normalize(utterance);
        let (_, patterns) = self.table.iter().find(|(i, _)| *i == intent)?;
        patterns
            .iter()
            .filter_map(|re| re.captures(&text))
            .find_map(|c| c.name(group).map(|m| m.as_str().to_string()))
    }
}

fn compile(intent: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| ClassifierError::Pattern { intent, source })
}
