use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::SignageConfig;
use crate::weather::{ForecastProvider, OpenMeteoClient, WeatherError};

/// Collaborators handed to route handlers through Rocket managed state.
///
/// The clock and the forecast provider sit behind traits so tests can pin
/// the date and script the provider.
#[derive(Clone)]
pub struct SignageServices {
    pub clock: Arc<dyn Clock>,
    pub forecast: Arc<dyn ForecastProvider>,
    pub config: SignageConfig,
}

impl SignageServices {
    /// Wall clock and a live Open-Meteo client, per `config`.
    pub fn from_config(config: SignageConfig) -> Result<Self, WeatherError> {
        let forecast = OpenMeteoClient::new(&config.forecast_base_url, config.forecast_timeout())?;
        Ok(SignageServices {
            clock: Arc::new(SystemClock),
            forecast: Arc::new(forecast),
            config,
        })
    }
}
