use std::collections::HashMap;

use crate::model::CurrentConditions;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CityWeather {
    pub current: Option<CurrentConditions>,
    pub loading: bool,
    /// The last fetch failed, don't retry on our own.
    pub failed: bool,
}

/// Latest current conditions of every city, keyed by normalized name.
#[derive(Debug, Default)]
pub struct WeatherStore {
    cities: HashMap<String, CityWeather>,
}

impl WeatherStore {
    pub fn get(&self, city: &str) -> Option<&CityWeather> {
        self.cities.get(city)
    }

    pub fn is_loading(&self, city: &str) -> bool {
        self.get(city).is_some_and(|weather| weather.loading)
    }

    pub fn needs_fetch(&self, city: &str) -> bool {
        match self.get(city) {
            Some(weather) => weather.current.is_none() && !weather.loading && !weather.failed,
            None => true,
        }
    }

    pub fn mark_loading(&mut self, city: &str) {
        let weather = self.cities.entry(city.to_string()).or_default();
        weather.loading = true;
        weather.failed = false;
    }

    /// Whatever resolved last wins.
    pub fn store(&mut self, city: &str, current: CurrentConditions) {
        self.cities.insert(
            city.to_string(),
            CityWeather {
                current: Some(current),
                loading: false,
                failed: false,
            },
        );
    }

    /// Keeps the previous conditions, if any.
    pub fn fail(&mut self, city: &str) {
        let weather = self.cities.entry(city.to_string()).or_default();
        weather.loading = false;
        weather.failed = true;
    }

    pub fn forget(&mut self, city: &str) {
        self.cities.remove(city);
    }
}
