#![warn(clippy::all, rust_2018_idioms)]

pub mod api;
mod app;
pub mod config;
pub mod dashboard;
pub mod details;
pub mod fetch;
pub mod forecast;
pub mod model;
mod plot;
pub mod store;
pub mod toast;
pub mod watchlist;

pub use app::WeatherApp;
use time::UtcOffset;

/// The local UTC offset, or UTC when it cannot be determined.
///
/// On unix this only succeeds while the process is single threaded, so read it
/// at the top of `main` and pass it along.
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}
