use egui::{Button, Context, Frame, Key, RichText, ScrollArea, Ui};

use crate::{
    model::{weather_glyph, CurrentConditions},
    store::WeatherStore,
    watchlist::{display_name, normalize, WatchList},
};

const CARD_WIDTH: f32 = 220.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardAction {
    /// Check the city exists, then watch it.
    Add(String),
    Refresh(String),
    Details(String),
    Remove(String),
}

#[derive(Debug, Default)]
pub struct Dashboard {
    city_input: String,
    /// City being checked before it is added.
    adding: Option<String>,
}

impl Dashboard {
    pub fn adding(&self) -> Option<&str> {
        self.adding.as_deref()
    }

    /// The add attempt resolved. The form is only cleared when it succeeded.
    pub fn finish_adding(&mut self, added: bool) {
        self.adding = None;
        if added {
            self.city_input.clear();
        }
    }

    fn submit(&mut self, watchlist: &WatchList) -> Option<DashboardAction> {
        if self.adding.is_some() {
            return None;
        }
        let city = normalize(&self.city_input)?;
        if watchlist.contains(&city) {
            self.city_input.clear();
            return None;
        }
        self.adding = Some(city.clone());
        Some(DashboardAction::Add(city))
    }

    pub fn ui(
        &mut self,
        ctx: &Context,
        watchlist: &WatchList,
        weather: &WeatherStore,
    ) -> Option<DashboardAction> {
        let mut action = None;

        egui::SidePanel::left("add_city").show(ctx, |ui| {
            ui.vertical(|ui| {
                ui.label("City Name");
                let response = ui.text_edit_singleline(&mut self.city_input);
                let entered =
                    response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));

                let label = if self.adding.is_some() {
                    "Adding..."
                } else {
                    "Add City"
                };
                let clicked = ui
                    .add_enabled(self.adding.is_none(), Button::new(label))
                    .clicked();
                if entered || clicked {
                    action = self.submit(watchlist);
                }

                ui.separator();
                ui.label(format!("Total: {}", watchlist.len()));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if watchlist.is_empty() {
                ui.label("Add a city to follow its weather.");
                return;
            }
            ScrollArea::vertical().show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for city in watchlist.iter() {
                        if let Some(card_action) = city_card(ui, city, weather) {
                            action = Some(card_action);
                        }
                    }
                });
            });
        });

        action
    }
}

fn city_card(ui: &mut Ui, city: &str, weather: &WeatherStore) -> Option<DashboardAction> {
    let mut action = None;
    let loading = weather.is_loading(city);
    let card = weather
        .get(city)
        .and_then(|weather| weather.current.as_ref())
        .and_then(CurrentConditions::card);

    Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(CARD_WIDTH);
        ui.horizontal(|ui| {
            ui.heading(display_name(city));
            if let Some(card) = &card {
                ui.label(RichText::new(weather_glyph(&card.icon)).size(24.0))
                    .on_hover_text(&card.description);
            }
        });

        if loading {
            ui.label("Loading...");
            return;
        }

        match &card {
            Some(card) => {
                ui.label(format!("Temperature: {}°C", card.temperature));
                ui.label(format!("Description: {}", card.description));
                ui.label(format!("Humidity: {}%", card.humidity));
            }
            None => {
                ui.label(format!(
                    "Failed to load weather data for city {}",
                    display_name(city)
                ));
            }
        }

        ui.horizontal(|ui| {
            if ui.button("⟳").on_hover_text("Update Weather").clicked() {
                action = Some(DashboardAction::Refresh(city.to_string()));
            }
            if card.is_some() && ui.button("ℹ").on_hover_text("Details").clicked() {
                action = Some(DashboardAction::Details(city.to_string()));
            }
            if ui.button("🗑").on_hover_text("Remove").clicked() {
                action = Some(DashboardAction::Remove(city.to_string()));
            }
        });
    });

    action
}
