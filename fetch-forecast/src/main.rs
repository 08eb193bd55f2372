use anyhow::bail;
use time::{OffsetDateTime, UtcOffset};
use weather_dashboard::{
    api::{ApiError, WeatherClient},
    config::Config,
    forecast::{reconstruct, resolve_covered_day, DayOffset, DayWindow},
};

fn main() -> anyhow::Result<()> {
    // read while we are still single threaded
    let utc_offset = weather_dashboard::local_offset();
    env_logger::init();

    let cities: Vec<String> = std::env::args().skip(1).collect();
    if cities.is_empty() {
        bail!("usage: fetch-forecast <city>...");
    }

    let config = Config::from_env()?;
    let client = WeatherClient::new(&config)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(fetch_all(client, cities, utc_offset));
    Ok(())
}

async fn fetch_all(client: WeatherClient, cities: Vec<String>, utc_offset: UtcOffset) {
    let now = OffsetDateTime::now_utc().to_offset(utc_offset);

    let mut handles = Vec::new();
    for city in cities {
        handles.push((
            city.clone(),
            tokio::spawn(hourly_report(client.clone(), city, now)),
        ));
    }

    for (city, handle) in handles {
        match handle.await {
            Ok(Ok(report)) => println!("{report}"),
            Ok(Err(err)) => log::error!("{city}: {err}"),
            Err(err) => log::error!("{city}: the fetch task failed: {err}"),
        }
    }
}

/// Hourly series of every covered day of `city`, until the horizon.
async fn hourly_report(
    client: WeatherClient,
    city: String,
    now: OffsetDateTime,
) -> Result<String, ApiError> {
    println!("Downloading the forecast of {city}");
    let forecast = client.forecast(&city).await?;
    let samples = forecast.samples();
    log::debug!("{} samples for {city}", samples.len());

    let name = if forecast.city.name.is_empty() {
        city
    } else {
        forecast.city.name
    };
    let mut report = format!("# {name}");

    let mut day = resolve_covered_day(&samples, DayOffset::TODAY, now);
    loop {
        let window = DayWindow::new(now, day);
        report.push_str(&format!("\n\n## {}\n", window.date));
        report.push_str(&reconstruct(&samples, day, now).to_string());
        if day.is_horizon() {
            break;
        }
        day = day.next();
    }

    Ok(report)
}
