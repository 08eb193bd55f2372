//! Payloads of the OpenWeatherMap `weather` and `forecast` endpoints.
//!
//! Every field is optional: a partial answer must still decode so the
//! dashboard can decide what to do with it.

use serde::{Deserialize, Deserializer, Serialize};

use crate::forecast::{round_half_up, ForecastSample};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub main: Option<Readings>,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// What a city card displays.
#[derive(Debug, Clone, PartialEq)]
pub struct CardData {
    pub temperature: i64,
    pub humidity: f64,
    pub description: String,
    pub icon: String,
}

impl CurrentConditions {
    /// The card content, or `None` as soon as one field is missing.
    pub fn card(&self) -> Option<CardData> {
        let main = self.main.as_ref()?;
        let temperature = main.temp.filter(|temp| temp.is_finite())?;
        let humidity = main.humidity.filter(|humidity| humidity.is_finite())?;
        let condition = self.weather.first()?;
        if condition.description.is_empty() || condition.icon.is_empty() {
            return None;
        }

        Some(CardData {
            temperature: round_half_up(temperature),
            humidity,
            description: condition.description.clone(),
            icon: condition.icon.clone(),
        })
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub city: ForecastCity,
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCity {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub dt: Option<i64>,
    #[serde(default)]
    pub main: Option<EntryReadings>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryReadings {
    #[serde(default)]
    pub temp: Option<f64>,
}

/// A unix timestamp, or `None` for anything that is not an integer.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_i64())
}

impl Forecast {
    /// Entries without a timestamp or a temperature are dropped.
    pub fn samples(&self) -> Vec<ForecastSample> {
        self.list
            .iter()
            .filter_map(|entry| {
                let timestamp = entry.dt?;
                let temperature = entry.main.as_ref()?.temp?;
                Some(ForecastSample::new(timestamp, temperature))
            })
            .collect()
    }
}

/// A symbol for an OpenWeatherMap icon code (`01d`, `10n`, ...).
pub fn weather_glyph(icon: &str) -> &'static str {
    let night = icon.ends_with('n');
    match icon.get(..2) {
        Some("01") if night => "🌙",
        Some("01") => "☀",
        Some("02") => "⛅",
        Some("03") | Some("04") => "☁",
        Some("09") | Some("10") => "🌧",
        Some("11") => "⛈",
        Some("13") => "❄",
        Some("50") => "🌫",
        _ => "?",
    }
}
