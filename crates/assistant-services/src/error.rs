use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl WeatherError {
    /// Spoken apology for this failure
    pub fn apology(&self) -> &'static str {
        match self {
            WeatherError::Network(_) => {
                "Sorry, I couldn't fetch weather data due to a network error."
            }
            WeatherError::InvalidResponse(_) => "Sorry, I received invalid weather data.",
            WeatherError::Other(_) => {
                "Sorry, I encountered an error while fetching weather data."
            }
        }
    }
}

#[cfg(feature = "openweather")]
impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            WeatherError::Other(format!("decode: {e}"))
        } else {
            WeatherError::Network(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    ExitStatus { program: String, status: String },
}
