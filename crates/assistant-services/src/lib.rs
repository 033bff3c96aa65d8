//! assistant-services: collaborators the command core talks to
//!
//! Weather lookup, operating system control and speech output, each behind a
//! narrow trait. The default build enables a `mock` backend for tests and an
//! `openweather` backend for live weather.

mod types;
pub use types::{
    ControlOutcome, UnitLabels, WeatherSettings, CURRENT_LOCATION, PLACEHOLDER_API_KEY,
};

mod error;
pub use error::{SystemError, WeatherError};

mod traits;
pub use traits::{Speaker, SystemControl, WeatherProvider};

pub mod weather;
#[cfg(feature = "openweather")]
pub use weather::LiveWeatherProvider;
pub use weather::{select_weather_provider, UnavailableWeatherProvider};

pub mod system;
pub use system::{DryRunSystem, HostSystem};

mod speech;
pub use speech::ConsoleSpeaker;

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockSystem, MockWeather, RecordingSpeaker, SystemCall};

pub mod plugin;
