use clap::Args;
use clockroom_core::weather::describe_code;
use clockroom_core::{Clock, Config, Database, SystemClock, WeatherCache, WeatherClient, WeatherError};
use tracing::debug;

#[derive(Args)]
pub struct WeatherArgs {
    /// Latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
    /// Ignore the cached report
    #[arg(long)]
    refresh: bool,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: WeatherArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let mut store = db.navigation();
    let cache = WeatherCache::new(config.weather.ttl_secs.saturating_mul(1000));
    let client = WeatherClient::new(config.weather.base_url.clone());
    let now = SystemClock::new().now_ms();

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(async {
        if args.refresh {
            debug!("bypassing weather cache");
            let report = client.fetch(args.lat, args.lon).await?;
            cache.put(&mut store, report.clone(), now);
            Ok::<_, WeatherError>(report)
        } else {
            client.current(&cache, &mut store, args.lat, args.lon, now).await
        }
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{:.1}°C, wind {:.0} km/h, {}",
            report.temperature_c,
            report.wind_speed_kmh,
            describe_code(report.weather_code)
        );
    }
    Ok(())
}
