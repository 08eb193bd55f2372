//! Background fetches.
//!
//! Each request runs as its own task, on a tokio runtime natively and on the
//! browser event loop on the web. Results come back over a channel that the
//! app drains at the start of every frame.

use std::{
    future::Future,
    sync::mpsc::{self, Receiver, Sender},
};

use egui::Context;
use log::debug;

use crate::{
    api::{ApiError, WeatherClient},
    model::{CurrentConditions, Forecast},
};

#[derive(Debug)]
pub enum FetchEvent {
    /// Refresh of a watched city.
    Current {
        city: String,
        result: Result<CurrentConditions, ApiError>,
    },
    /// Conditions of a city the user is trying to add.
    Probe {
        city: String,
        result: Result<CurrentConditions, ApiError>,
    },
    Forecast {
        city: String,
        result: Result<Forecast, ApiError>,
    },
}

pub struct Fetcher {
    client: WeatherClient,
    sender: Sender<FetchEvent>,
    receiver: Receiver<FetchEvent>,
    #[cfg(not(target_arch = "wasm32"))]
    runtime: tokio::runtime::Runtime,
}

impl Fetcher {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(client: WeatherClient) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("weather-fetch")
            .enable_all()
            .build()?;
        let (sender, receiver) = mpsc::channel();

        Ok(Self {
            client,
            sender,
            receiver,
            runtime,
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new(client: WeatherClient) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        Ok(Self {
            client,
            sender,
            receiver,
        })
    }

    pub fn current(&self, ctx: &Context, city: &str) {
        debug!("Fetching the current weather of {city}");
        let client = self.client.clone();
        let city = city.to_string();
        self.spawn(ctx, async move {
            let result = client.current(&city).await;
            FetchEvent::Current { city, result }
        });
    }

    pub fn probe(&self, ctx: &Context, city: &str) {
        debug!("Checking that {city} exists");
        let client = self.client.clone();
        let city = city.to_string();
        self.spawn(ctx, async move {
            let result = client.current(&city).await;
            FetchEvent::Probe { city, result }
        });
    }

    pub fn forecast(&self, ctx: &Context, city: &str) {
        debug!("Fetching the forecast of {city}");
        let client = self.client.clone();
        let city = city.to_string();
        self.spawn(ctx, async move {
            let result = client.forecast(&city).await;
            FetchEvent::Forecast { city, result }
        });
    }

    /// Every event completed since the last call, without blocking.
    pub fn poll(&self) -> Vec<FetchEvent> {
        self.receiver.try_iter().collect()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn(&self, ctx: &Context, task: impl Future<Output = FetchEvent> + Send + 'static) {
        let sender = self.sender.clone();
        let ctx = ctx.clone();
        self.runtime
            .spawn(async move { deliver(&sender, &ctx, task.await) });
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn(&self, ctx: &Context, task: impl Future<Output = FetchEvent> + 'static) {
        let sender = self.sender.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move { deliver(&sender, &ctx, task.await) });
    }
}

fn deliver(sender: &Sender<FetchEvent>, ctx: &Context, event: FetchEvent) {
    // the receiver lives as long as the app
    if sender.send(event).is_ok() {
        ctx.request_repaint();
    }
}
