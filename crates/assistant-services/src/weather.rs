//! Weather providers: a live OpenWeatherMap client and a stand-in used when
//! no usable API key is configured.

use crate::{UnitLabels, WeatherError, WeatherProvider, WeatherSettings};
use serde::Deserialize;

/// Current-weather payload, reduced to the fields we speak.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentWeather {
    pub name: Option<String>,
    pub sys: Option<SysBlock>,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub main: Option<MainBlock>,
    pub wind: Option<WindBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SysBlock {
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Condition {
    pub main: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MainBlock {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindBlock {
    pub speed: Option<f64>,
}

/// Phrase a current-weather payload as one spoken sentence group.
pub fn render_report(data: &CurrentWeather, labels: UnitLabels) -> String {
    let city = data.name.as_deref().unwrap_or("Unknown");
    let location = match data.sys.as_ref().and_then(|s| s.country.as_deref()) {
        Some(country) if !country.is_empty() => format!("{city}, {country}"),
        _ => city.to_string(),
    };

    let description = data
        .weather
        .first()
        .and_then(|c| c.description.as_deref())
        .unwrap_or("Unknown");

    let main = data.main.clone().unwrap_or_default();
    let temp_text = main
        .temp
        .map(|t| format!("{t:.1}{}", labels.temperature))
        .unwrap_or_else(|| "N/A".to_string());
    let humidity_text = main
        .humidity
        .map(|h| format!("{h}%"))
        .unwrap_or_else(|| "N/A".to_string());
    let wind_text = data
        .wind
        .as_ref()
        .and_then(|w| w.speed)
        .map(|s| format!("{s:.1} {}", labels.wind_speed))
        .unwrap_or_else(|| "N/A".to_string());

    let mut report = format!("The weather in {location} is {description}. ");
    report.push_str(&format!("Temperature is {temp_text}"));
    match (main.temp, main.feels_like) {
        (Some(t), Some(f)) if (t - f).abs() > 2.0 => {
            report.push_str(&format!(
                ", but it feels like {f:.1}{}. ",
                labels.temperature
            ));
        }
        _ => report.push_str(". "),
    }
    report.push_str(&format!(
        "Humidity is {humidity_text} and wind speed is {wind_text}."
    ));
    report
}

/// Parse a raw response body and render it
pub fn report_from_json(body: &str, labels: UnitLabels) -> Result<String, WeatherError> {
    let data: CurrentWeather = serde_json::from_str(body)?;
    Ok(render_report(&data, labels))
}

/// Used when the weather service cannot be reached or is not configured.
#[derive(Debug, Clone, Default)]
pub struct UnavailableWeatherProvider;

impl WeatherProvider for UnavailableWeatherProvider {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn weather_simple(&self, location: &str) -> String {
        format!(
            "I can't provide weather information for {location} right now. \
             To enable weather features, please get a free API key from \
             OpenWeatherMap and configure it in the weather service."
        )
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(feature = "openweather")]
pub use live::LiveWeatherProvider;

#[cfg(feature = "openweather")]
mod live {
    use super::report_from_json;
    use crate::{WeatherError, WeatherProvider, WeatherSettings};
    use std::time::Duration;

    /// Blocking OpenWeatherMap client.
    pub struct LiveWeatherProvider {
        settings: WeatherSettings,
        api_key: String,
        client: reqwest::blocking::Client,
    }

    impl LiveWeatherProvider {
        pub fn new(settings: WeatherSettings) -> Result<Self, WeatherError> {
            let api_key = settings
                .api_key
                .clone()
                .filter(|_| settings.has_valid_key())
                .ok_or_else(|| WeatherError::Other("API key not configured".into()))?;
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(settings.timeout_secs))
                .build()?;
            Ok(Self {
                settings,
                api_key,
                client,
            })
        }

        fn fetch(&self, location: &str) -> Result<String, WeatherError> {
            let resp = self
                .client
                .get(&self.settings.endpoint)
                .query(&[
                    ("q", location),
                    ("appid", self.api_key.as_str()),
                    ("units", self.settings.units.as_str()),
                ])
                .send()?
                .error_for_status()?;
            let body = resp.text()?;
            report_from_json(&body, self.settings.unit_labels())
        }
    }

    impl WeatherProvider for LiveWeatherProvider {
        fn name(&self) -> &str {
            "openweathermap"
        }

        fn weather_simple(&self, location: &str) -> String {
            let Some(place) = self.settings.resolve_location(location) else {
                tracing::debug!(location, "no default location configured");
                return "Please tell me which city you want the weather for, \
                        or set a default location in the weather settings."
                    .to_string();
            };
            match self.fetch(place) {
                Ok(report) => report,
                Err(e) => {
                    tracing::warn!(location, error = %e, "weather lookup failed");
                    e.apology().to_string()
                }
            }
        }
    }
}

/// Pick the live provider when the settings carry a usable key, otherwise the
/// unavailable stand-in.
pub fn select_weather_provider(settings: &WeatherSettings) -> Box<dyn WeatherProvider> {
    if !settings.has_valid_key() {
        tracing::info!("weather API key not configured; weather lookups disabled");
        return Box::new(UnavailableWeatherProvider);
    }

    #[cfg(feature = "openweather")]
    {
        match LiveWeatherProvider::new(settings.clone()) {
            Ok(provider) => Box::new(provider),
            Err(e) => {
                tracing::warn!(error = %e, "failed to build weather client");
                Box::new(UnavailableWeatherProvider)
            }
        }
    }
    #[cfg(not(feature = "openweather"))]
    {
        tracing::warn!("openweather feature not enabled");
        Box::new(UnavailableWeatherProvider)
    }
}
