use log::{debug, info, warn};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    api::ApiError,
    dashboard::{Dashboard, DashboardAction},
    details::{DetailsAction, DetailsPage},
    fetch::{FetchEvent, Fetcher},
    model::CurrentConditions,
    store::WeatherStore,
    toast::Toasts,
    watchlist::WatchList,
};

pub enum View {
    Dashboard,
    Details(DetailsPage),
}

/// The whole application state. Views only get references to it.
pub struct WeatherApp {
    watchlist: WatchList,
    weather: WeatherStore,
    dashboard: Dashboard,
    view: View,
    toasts: Toasts,
    fetcher: Fetcher,
    utc_offset: UtcOffset,
}

impl WeatherApp {
    /// `utc_offset` must be read before any thread is started, see [`crate::local_offset`].
    pub fn new(cc: &eframe::CreationContext<'_>, fetcher: Fetcher, utc_offset: UtcOffset) -> Self {
        let watchlist = WatchList::load(cc.storage);
        info!("Watching {} cities", watchlist.len());

        Self {
            watchlist,
            weather: WeatherStore::default(),
            dashboard: Dashboard::default(),
            view: View::Dashboard,
            toasts: Toasts::default(),
            fetcher,
            utc_offset,
        }
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.utc_offset)
    }

    fn persist(&self, frame: &mut eframe::Frame) {
        if let Some(storage) = frame.storage_mut() {
            self.watchlist.save(storage);
            storage.flush();
        }
    }

    fn handle_event(&mut self, event: FetchEvent, frame: &mut eframe::Frame, ctx: &egui::Context) {
        let input_time = ctx.input(|input| input.time);
        match event {
            FetchEvent::Current { city, result } => {
                if let Err(err) = settle_current(&self.watchlist, &mut self.weather, &city, result)
                {
                    self.toasts.error(err.to_string(), input_time);
                }
            }
            FetchEvent::Probe { city, result } => match result {
                Ok(current) => {
                    if self.watchlist.add(&city) {
                        info!("Now watching {city}");
                        self.persist(frame);
                    }
                    self.weather.store(&city, current);
                    self.dashboard.finish_adding(true);
                }
                Err(err) => {
                    warn!("Not adding {city}: {err}");
                    self.toasts.error(err.to_string(), input_time);
                    self.dashboard.finish_adding(false);
                }
            },
            FetchEvent::Forecast { city, result } => {
                let now = self.now();
                if let View::Details(page) = &mut self.view {
                    page.receive(&city, result, now);
                }
            }
        }
    }

    fn handle_dashboard(
        &mut self,
        action: DashboardAction,
        frame: &mut eframe::Frame,
        ctx: &egui::Context,
    ) {
        match action {
            DashboardAction::Add(city) => self.fetcher.probe(ctx, &city),
            DashboardAction::Refresh(city) => {
                self.weather.mark_loading(&city);
                self.fetcher.current(ctx, &city);
            }
            DashboardAction::Details(city) => {
                self.fetcher.forecast(ctx, &city);
                self.view = View::Details(DetailsPage::new(city));
            }
            DashboardAction::Remove(city) => {
                if self.watchlist.remove(&city) {
                    info!("Stopped watching {city}");
                    self.weather.forget(&city);
                    self.persist(frame);
                }
            }
        }
    }

    /// Starts the fetch of every watched city that has no data yet.
    fn fetch_missing(&mut self, ctx: &egui::Context) {
        for city in self.watchlist.iter() {
            if self.weather.needs_fetch(city) {
                self.weather.mark_loading(city);
                self.fetcher.current(ctx, city);
            }
        }
    }

    pub fn ui(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        for event in self.fetcher.poll() {
            self.handle_event(event, frame, ctx);
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                // NOTE: no File->Quit on web pages!
                let is_web = cfg!(target_arch = "wasm32");
                if !is_web {
                    ui.menu_button("File", |ui| {
                        if ui.button("Quit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                    ui.add_space(16.0);
                }

                egui::widgets::global_dark_light_mode_buttons(ui);
            });
        });

        let now = self.now();
        match &mut self.view {
            View::Dashboard => {
                self.fetch_missing(ctx);
                if let Some(action) = self.dashboard.ui(ctx, &self.watchlist, &self.weather) {
                    self.handle_dashboard(action, frame, ctx);
                }
            }
            View::Details(page) => {
                if let Some(DetailsAction::Back) = page.ui(ctx, now) {
                    self.view = View::Dashboard;
                }
            }
        }

        self.toasts.ui(ctx);
    }
}

/// Records a current-conditions result. Results for a city that is no longer
/// watched are dropped, only errors of watched cities come back.
fn settle_current(
    watchlist: &WatchList,
    weather: &mut WeatherStore,
    city: &str,
    result: Result<CurrentConditions, ApiError>,
) -> Result<(), ApiError> {
    if !watchlist.contains(city) {
        debug!("Dropping conditions of {city}, not watched anymore");
        return Ok(());
    }

    match result {
        Ok(current) => {
            weather.store(city, current);
            Ok(())
        }
        Err(err) => {
            warn!("Could not refresh {city}: {err}");
            weather.fail(city);
            Err(err)
        }
    }
}

impl eframe::App for WeatherApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.ui(ctx, frame);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.watchlist.save(storage);
    }
}
