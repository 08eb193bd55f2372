use eframe::Storage;
use log::warn;
use serde::{Deserialize, Serialize};

/// Key of the watched cities in the app storage.
pub const STORAGE_KEY: &str = "cities";

/// The cities on the dashboard, in the order they were added.
///
/// Names are stored trimmed and lowercased, and the storage holds them as a
/// plain JSON array of strings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatchList {
    cities: Vec<String>,
}

impl WatchList {
    pub fn load(storage: Option<&dyn Storage>) -> Self {
        let Some(raw) = storage.and_then(|storage| storage.get_string(STORAGE_KEY)) else {
            return Self::default();
        };
        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(err) => {
                warn!("Ignoring the stored city list: {err}");
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match serde_json::to_string(self) {
            Ok(raw) => storage.set_string(STORAGE_KEY, raw),
            Err(err) => warn!("Could not serialize the city list: {err}"),
        }
    }

    /// Appends the normalized `city` unless it is blank or already watched.
    pub fn add(&mut self, city: &str) -> bool {
        match normalize(city) {
            Some(city) if !self.contains(&city) => {
                self.cities.push(city);
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, city: &str) -> bool {
        let len = self.cities.len();
        self.cities.retain(|watched| watched != city);
        self.cities.len() != len
    }

    pub fn contains(&self, city: &str) -> bool {
        self.cities.iter().any(|watched| watched == city)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

pub fn normalize(city: &str) -> Option<String> {
    let city = city.trim().to_lowercase();
    (!city.is_empty()).then_some(city)
}

/// `"new york"` is displayed as `"New york"`.
pub fn display_name(city: &str) -> String {
    let mut chars = city.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
