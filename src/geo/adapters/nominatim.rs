//! `OpenStreetMap` Nominatim geocoder.

use crate::geo::{
    domain::{Coordinates, GeocodedPlace},
    ports::{Geocoder, GeocodingError, GeocodingResult},
};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for a Nominatim instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// User agent; Nominatim's usage policy rejects anonymous clients.
    pub user_agent: String,
    /// Restricts results to these ISO country codes (comma separated).
    pub country_codes: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_owned(),
            user_agent: "DiaristLink/1.0".to_owned(),
            country_codes: "br".to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Geocoder backed by the Nominatim HTTP API.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    config: NominatimConfig,
}

impl NominatimGeocoder {
    /// Builds a geocoder with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodingError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new(config: NominatimConfig) -> GeocodingResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(GeocodingError::transport)?;
        Ok(Self { client, config })
    }

    async fn fetch<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> GeocodingResult<T> {
        let url = format!("{}/{path}", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "pt-BR,pt")
            .query(query)
            .send()
            .await
            .map_err(GeocodingError::transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::UnexpectedStatus(status.as_u16()));
        }
        response.json::<T>().await.map_err(GeocodingError::transport)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn geocode(&self, query: &str) -> GeocodingResult<Option<GeocodedPlace>> {
        let params = [
            ("format", "json".to_owned()),
            ("q", query.to_owned()),
            ("limit", "1".to_owned()),
            ("countrycodes", self.config.country_codes.clone()),
            ("addressdetails", "1".to_owned()),
        ];
        let places: Vec<NominatimPlace> = self.fetch("search", &params).await?;
        match places.into_iter().next() {
            Some(place) => place.into_geocoded(query).map(Some),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn reverse(&self, coordinates: Coordinates) -> GeocodingResult<Option<GeocodedPlace>> {
        let params = [
            ("format", "json".to_owned()),
            ("lat", coordinates.latitude().to_string()),
            ("lon", coordinates.longitude().to_string()),
        ];
        let reply: NominatimReverse = self.fetch("reverse", &params).await?;
        if reply.error.is_some() {
            return Ok(None);
        }
        match reply.place {
            Some(place) => place.into_geocoded("").map(Some),
            None => Ok(None),
        }
    }
}

/// One entry of a Nominatim search or reverse response.
///
/// Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
pub(crate) struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimPlace {
    pub(crate) fn into_geocoded(self, fallback_label: &str) -> GeocodingResult<GeocodedPlace> {
        let latitude = parse_degrees(&self.lat)?;
        let longitude = parse_degrees(&self.lon)?;
        let coordinates = Coordinates::new(latitude, longitude)
            .map_err(|err| GeocodingError::MalformedResponse(err.to_string()))?;
        let label = self
            .display_name
            .unwrap_or_else(|| fallback_label.to_owned());
        Ok(GeocodedPlace::new(coordinates, label))
    }
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    place: Option<NominatimPlace>,
}

fn parse_degrees(raw: &str) -> GeocodingResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| GeocodingError::MalformedResponse(format!("invalid coordinate '{raw}'")))
}
