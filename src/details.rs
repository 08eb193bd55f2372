use std::sync::Arc;

use egui::{Button, Color32, Context, Ui};
use egui_plot::{AxisHints, Line, Points};
use log::warn;
use time::{macros::format_description, OffsetDateTime};

use crate::{
    api::ApiError,
    forecast::{
        reconstruct, resolve_covered_day, DayOffset, DayWindow, ForecastSample, HourlySeries,
    },
    model::Forecast,
    plot::create_plot_hourly,
    watchlist::display_name,
};

const TEMPERATURE_COLOR: Color32 = Color32::from_rgb(75, 192, 192);

#[derive(Debug, Clone, PartialEq)]
pub enum ForecastState {
    Loading,
    Failed,
    Loaded(Vec<ForecastSample>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsAction {
    Back,
}

/// Hourly temperatures of one city, one day at a time.
#[derive(Debug, Clone)]
pub struct DetailsPage {
    city: String,
    forecast: ForecastState,
    day: DayOffset,
}

impl DetailsPage {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            forecast: ForecastState::Loading,
            day: DayOffset::TODAY,
        }
    }

    pub fn day(&self) -> DayOffset {
        self.day
    }

    pub fn state(&self) -> &ForecastState {
        &self.forecast
    }

    /// Takes the forecast of `city`, moving to the first day that has data.
    /// Returns `false` and changes nothing if the page shows another city.
    pub fn receive(
        &mut self,
        city: &str,
        result: Result<Forecast, ApiError>,
        now: OffsetDateTime,
    ) -> bool {
        if city != self.city {
            return false;
        }

        self.forecast = match result {
            Ok(forecast) => {
                let samples = forecast.samples();
                self.day = resolve_covered_day(&samples, self.day, now);
                ForecastState::Loaded(samples)
            }
            Err(err) => {
                warn!("Could not load the forecast of {}: {err}", self.city);
                ForecastState::Failed
            }
        };
        true
    }

    pub fn ui(&mut self, ctx: &Context, now: OffsetDateTime) -> Option<DetailsAction> {
        let mut action = None;

        if matches!(self.forecast, ForecastState::Loaded(_)) {
            egui::TopBottomPanel::bottom("day_navigation").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!self.day.is_today(), Button::new("Previous Day"))
                        .clicked()
                    {
                        self.day = self.day.previous();
                    }
                    if ui
                        .add_enabled(!self.day.is_horizon(), Button::new("Next Day"))
                        .clicked()
                    {
                        self.day = self.day.next();
                    }
                });
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("⬅ Back").clicked() {
                    action = Some(DetailsAction::Back);
                }
                ui.heading(display_name(&self.city));
            });
            ui.separator();

            match &self.forecast {
                ForecastState::Loading => {
                    ui.label("Loading...");
                }
                ForecastState::Failed => {
                    ui.label("Failed to load weather data. Please try again later.");
                }
                ForecastState::Loaded(samples) if samples.is_empty() => {
                    ui.label(format!(
                        "No weather data available for city {}.",
                        display_name(&self.city)
                    ));
                }
                ForecastState::Loaded(samples) => {
                    let window = DayWindow::new(now, self.day);
                    let date = window
                        .date
                        .format(format_description!("[day]/[month]/[year]"))
                        .unwrap_or_else(|_| window.date.to_string());
                    ui.label(format!("Temperature on {date}"));

                    temperature_chart(ui, &reconstruct(samples, self.day, now));
                }
            }
        });

        action
    }
}

fn temperature_chart(ui: &mut Ui, series: &HourlySeries) {
    let labels: Arc<[String]> = series.labels.clone().into();
    let plot = create_plot_hourly("hourly_temperature", labels, |degree| {
        format!("{degree:.0}°C")
    })
    .custom_y_axes(vec![AxisHints::new_y().label("Temperature (°C)")]);

    let floor = series.values.iter().min().copied().unwrap_or_default() as f32;
    plot.show(ui, |ui| {
        let points = series.points();
        ui.line(
            Line::new(points.clone())
                .color(TEMPERATURE_COLOR)
                .fill(floor)
                .name("Temperature (°C)"),
        );
        ui.points(Points::new(points).color(TEMPERATURE_COLOR).radius(5.0));
    });
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use super::*;
    use crate::model::{EntryReadings, ForecastEntry};

    fn forecast(entries: &[(OffsetDateTime, f64)]) -> Forecast {
        Forecast {
            list: entries
                .iter()
                .map(|(at, temp)| ForecastEntry {
                    dt: Some(at.unix_timestamp()),
                    main: Some(EntryReadings { temp: Some(*temp) }),
                })
                .collect(),
            ..Forecast::default()
        }
    }

    #[test]
    fn loading_a_forecast_skips_empty_days() {
        let now = datetime!(2024-06-01 23:10 +02:00);
        let mut page = DetailsPage::new("paris");
        assert_eq!(page.state(), &ForecastState::Loading);

        let received = page.receive(
            "paris",
            Ok(forecast(&[(datetime!(2024-06-02 02:00 +02:00), 12.0)])),
            now,
        );

        assert!(received);
        assert_eq!(page.day(), DayOffset::new(1));
        assert!(matches!(page.state(), ForecastState::Loaded(samples) if samples.len() == 1));
    }

    #[test]
    fn empty_forecast_goes_to_the_horizon() {
        let now = datetime!(2024-06-01 12:00 UTC);
        let mut page = DetailsPage::new("paris");
        page.receive("paris", Ok(Forecast::default()), now);

        assert_eq!(page.day(), DayOffset::HORIZON);
        assert_eq!(page.state(), &ForecastState::Loaded(Vec::new()));
    }

    #[test]
    fn ignores_other_cities() {
        let now = datetime!(2024-06-01 12:00 UTC);
        let mut page = DetailsPage::new("paris");

        assert!(!page.receive("lyon", Ok(Forecast::default()), now));
        assert_eq!(page.state(), &ForecastState::Loading);
        assert_eq!(page.day(), DayOffset::TODAY);
    }

    #[test]
    fn failures_are_kept_on_the_page() {
        let now = datetime!(2024-06-01 12:00 UTC);
        let mut page = DetailsPage::new("paris");
        page.receive(
            "paris",
            Err(ApiError::CityNotFound(String::from("paris"))),
            now,
        );

        assert_eq!(page.state(), &ForecastState::Failed);
    }
}
