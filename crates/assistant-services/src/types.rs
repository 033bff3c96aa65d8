use serde::{Deserialize, Serialize};

/// Placeholder key shipped in sample configs; never treated as valid.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_OPENWEATHERMAP_API_KEY";

/// Location name meaning "wherever the user is"; not a place the weather
/// service can look up.
pub const CURRENT_LOCATION: &str = "current location";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_units")]
    pub units: String,
    #[serde(default = "default_location")]
    pub default_location: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_location() -> String {
    CURRENT_LOCATION.to_string()
}

fn default_endpoint() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            units: default_units(),
            default_location: default_location(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WeatherSettings {
    /// Place to look up for `location`. [`CURRENT_LOCATION`] resolves to the
    /// configured default; `None` when neither names a real place.
    pub fn resolve_location<'a>(&'a self, location: &'a str) -> Option<&'a str> {
        let location = location.trim();
        let place = if location.is_empty() || location.eq_ignore_ascii_case(CURRENT_LOCATION) {
            self.default_location.trim()
        } else {
            location
        };
        (!place.is_empty() && !place.eq_ignore_ascii_case(CURRENT_LOCATION)).then_some(place)
    }

    pub fn unit_labels(&self) -> UnitLabels {
        UnitLabels::for_units(&self.units)
    }

    /// A key is usable when present, non-blank and not the placeholder
    pub fn has_valid_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(str::trim)
            .is_some_and(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY)
    }
}

/// Suffixes matching the `units` parameter sent to the weather service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitLabels {
    pub temperature: &'static str,
    pub wind_speed: &'static str,
}

impl UnitLabels {
    pub const METRIC: UnitLabels = UnitLabels {
        temperature: "°C",
        wind_speed: "m/s",
    };

    pub fn for_units(units: &str) -> Self {
        match units.trim().to_ascii_lowercase().as_str() {
            "imperial" => UnitLabels {
                temperature: "°F",
                wind_speed: "mph",
            },
            "standard" => UnitLabels {
                temperature: "K",
                wind_speed: "m/s",
            },
            _ => UnitLabels::METRIC,
        }
    }
}

/// Result of a system control request, already phrased for speech
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlOutcome {
    pub success: bool,
    pub message: String,
}

impl ControlOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
