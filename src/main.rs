#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use weather_dashboard::{api::WeatherClient, config::Config, fetch::Fetcher, WeatherApp};

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    // must run before any other thread exists
    let utc_offset = weather_dashboard::local_offset();
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = Config::from_env()?;
    let fetcher = Fetcher::new(WeatherClient::new(&config)?)?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Weather dashboard",
        native_options,
        Box::new(move |cc| Box::new(WeatherApp::new(cc, fetcher, utc_offset))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
}

// When compiling to web using trunk:
#[cfg(target_arch = "wasm32")]
fn main() {
    // Redirect `log` message to `console.log` and friends:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let utc_offset = weather_dashboard::local_offset();
    let fetcher = match Config::from_env()
        .map_err(anyhow::Error::from)
        .and_then(|config| Ok(Fetcher::new(WeatherClient::new(&config)?)?))
    {
        Ok(fetcher) => fetcher,
        Err(err) => {
            log::error!("Cannot start the weather dashboard: {err}");
            return;
        }
    };

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async move {
        let start_result = eframe::WebRunner::new()
            .start(
                "the_canvas_id", // hardcode it
                web_options,
                Box::new(move |cc| Box::new(WeatherApp::new(cc, fetcher, utc_offset))),
            )
            .await;

        if let Err(err) = start_result {
            log::error!("Failed to start eframe: {err:?}");
        }
    });
}
