//! Current weather for the world clock page.
//!
//! Talks to an Open-Meteo compatible `/v1/forecast` endpoint. Lookups go
//! through [`WeatherCache`] so a page change does not refetch.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::WeatherError;
use crate::storage::{KvStore, WeatherCache};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    /// WMO weather interpretation code.
    pub weather_code: u16,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
    weathercode: u16,
}

pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn forecast_url(&self, latitude: f64, longitude: f64) -> Result<Url, WeatherError> {
        let mut url = Url::parse(&self.base_url)?.join("/v1/forecast")?;
        url.query_pairs_mut()
            .append_pair("latitude", &latitude.to_string())
            .append_pair("longitude", &longitude.to_string())
            .append_pair("current_weather", "true");
        Ok(url)
    }

    pub async fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherReport, WeatherError> {
        let url = self.forecast_url(latitude, longitude)?;
        debug!(%url, "fetching weather");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
            });
        }
        let body: ForecastResponse = response.json().await?;
        let current = body.current_weather.ok_or(WeatherError::MissingData)?;
        Ok(WeatherReport {
            latitude,
            longitude,
            temperature_c: current.temperature,
            wind_speed_kmh: current.windspeed,
            weather_code: current.weathercode,
        })
    }

    /// Cached report for these coordinates, or a fresh fetch stored back
    /// into the cache.
    pub async fn current(
        &self,
        cache: &WeatherCache<WeatherReport>,
        store: &mut dyn KvStore,
        latitude: f64,
        longitude: f64,
        now_ms: u64,
    ) -> Result<WeatherReport, WeatherError> {
        if let Some(report) = cache.get(store, now_ms) {
            if report.latitude == latitude && report.longitude == longitude {
                debug!("weather cache hit");
                return Ok(report);
            }
        }
        let report = self.fetch(latitude, longitude).await?;
        cache.put(store, report.clone(), now_ms);
        Ok(report)
    }
}

/// Short description for a WMO weather code.
pub fn describe_code(code: u16) -> &'static str {
    match code {
        0 => "clear",
        1..=3 => "partly cloudy",
        45 | 48 => "fog",
        51..=57 => "drizzle",
        61..=67 | 80..=82 => "rain",
        71..=77 | 85 | 86 => "snow",
        95..=99 => "thunderstorm",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKv;

    const BODY: &str = r#"{
        "latitude": 35.7,
        "longitude": 139.7,
        "current_weather": {"temperature": 21.5, "windspeed": 9.0, "weathercode": 2, "time": "2024-05-01T12:00"}
    }"#;

    #[tokio::test]
    async fn fetch_parses_current_weather() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/forecast")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("latitude".into(), "35.7".into()),
                mockito::Matcher::UrlEncoded("current_weather".into(), "true".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;

        let client = WeatherClient::new(server.url());
        let report = client.fetch(35.7, 139.7).await.unwrap();
        assert_eq!(report.temperature_c, 21.5);
        assert_eq!(report.weather_code, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v1/forecast")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = WeatherClient::new(server.url());
        let err = client.fetch(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, WeatherError::Status { status: 503 }));
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/forecast")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(BODY)
            .expect(1)
            .create_async()
            .await;

        let client = WeatherClient::new(server.url());
        let cache = WeatherCache::default();
        let mut store = MemoryKv::new();
        let first = client.current(&cache, &mut store, 35.7, 139.7, 0).await.unwrap();
        let second = client.current(&cache, &mut store, 35.7, 139.7, 60_000).await.unwrap();
        assert_eq!(first, second);
        mock.assert_async().await;
    }

    #[test]
    fn describes_codes() {
        assert_eq!(describe_code(0), "clear");
        assert_eq!(describe_code(63), "rain");
        assert_eq!(describe_code(500), "unknown");
    }
}
