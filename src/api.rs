use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    model::{CurrentConditions, Forecast},
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("City not found: {0}")]
    CityNotFound(String),
    #[error("The weather service answered with status {0}")]
    Status(StatusCode),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected answer from the weather service: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client of the OpenWeatherMap 2.5 API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.timeout);

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Current conditions of a city, in metric units.
    pub async fn current(&self, city: &str) -> Result<CurrentConditions, ApiError> {
        self.get("weather", city).await
    }

    /// The 5 days / 3 hours forecast of a city, in metric units.
    pub async fn forecast(&self, city: &str) -> Result<Forecast, ApiError> {
        self.get("forecast", city).await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, city: &str) -> Result<T, ApiError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!("GET {url} for {city}");

        let response = self
            .http
            .get(url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => (),
            StatusCode::NOT_FOUND => return Err(ApiError::CityNotFound(city.to_string())),
            status => return Err(ApiError::Status(status)),
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
