//! Address resolution over the geocoder and postal-code ports.
//!
//! Providers are queried from the most specific phrasing to the most
//! generic, stopping at the first match. A transport failure on one phrasing
//! is logged and the next phrasing is tried.

use crate::error::{FailureKind, UpstreamSource};
use crate::geo::{
    domain::{COUNTRY_NAME, Coordinates, GeoDomainError, GeocodedPlace, PostalAddress, PostalCode},
    ports::{Geocoder, GeocodingError, PostalCodeLookup},
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Structured address as typed by a user. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressInput {
    /// Street and number.
    pub address: Option<String>,
    /// City name.
    pub city: Option<String>,
    /// State code.
    pub state: Option<String>,
    /// Postal code in any punctuation.
    pub zip_code: Option<String>,
}

impl AddressInput {
    fn part(value: Option<&String>) -> Option<&str> {
        value.map(|text| text.trim()).filter(|text| !text.is_empty())
    }

    fn address(&self) -> Option<&str> {
        Self::part(self.address.as_ref())
    }

    fn city(&self) -> Option<&str> {
        Self::part(self.city.as_ref())
    }

    fn state(&self) -> Option<&str> {
        Self::part(self.state.as_ref())
    }

    fn zip_code(&self) -> Option<&str> {
        Self::part(self.zip_code.as_ref())
    }
}

/// Errors returned while resolving an address.
#[derive(Debug, Clone, Error)]
pub enum AddressResolutionError {
    /// No usable address component was supplied.
    #[error("address is incomplete")]
    IncompleteAddress,

    /// A component failed validation.
    #[error(transparent)]
    Invalid(#[from] GeoDomainError),

    /// Every phrasing was answered and none matched.
    #[error("could not find coordinates for \"{0}\"; add details such as the house number or neighbourhood")]
    NotFound(String),

    /// The postal code is unknown to the lookup provider.
    #[error("postal code {0} not found")]
    PostalCodeNotFound(PostalCode),

    /// Every attempt failed at the transport level.
    #[error(transparent)]
    Upstream(#[from] GeocodingError),
}

impl AddressResolutionError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::IncompleteAddress | Self::Invalid(_) => FailureKind::Validation,
            Self::NotFound(_) | Self::PostalCodeNotFound(_) => FailureKind::NotFound,
            Self::Upstream(_) => FailureKind::Upstream(UpstreamSource::Geocoding),
        }
    }
}

/// Phrasings tried for a free-text address.
///
/// The country is appended unless the text already names it, and the bare
/// text is retried.
#[must_use]
pub fn free_text_queries(address: &str) -> Vec<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let lowered = trimmed.to_lowercase();
    if lowered.contains("brasil") || lowered.contains("brazil") {
        return vec![trimmed.to_owned()];
    }
    vec![format!("{trimmed}, {COUNTRY_NAME}"), trimmed.to_owned()]
}

/// Phrasings tried for a structured address, most specific first.
///
/// Phrasings that would need a missing component are skipped and duplicates
/// are removed.
#[must_use]
pub fn structured_queries(input: &AddressInput) -> Vec<String> {
    let address = input.address();
    let city = input.city();
    let state = input.state();
    let zip = input.zip_code();

    let full = join([address, city, state, zip]);
    let mut candidates: Vec<Option<String>> = Vec::new();
    if let Some(full_text) = full {
        candidates.push(Some(format!("{full_text}, {COUNTRY_NAME}")));
        candidates.push(Some(full_text));
    }
    if let (Some(street), Some(town), Some(region)) = (address, city, state) {
        candidates.push(Some(format!("{street}, {town}, {region}, {COUNTRY_NAME}")));
        candidates.push(Some(format!("{street}, {town}, {region}")));
    }
    candidates.push(zip.map(|code| format!("{code}, {COUNTRY_NAME}")));
    candidates.push(zip.map(str::to_owned));
    if let (Some(town), Some(region)) = (city, state) {
        candidates.push(Some(format!("{town}, {region}, {COUNTRY_NAME}")));
        candidates.push(Some(format!("{town}, {region}")));
    }
    candidates.push(city.map(|town| format!("{town}, {COUNTRY_NAME}")));
    candidates.push(city.map(str::to_owned));

    let mut queries: Vec<String> = Vec::new();
    for candidate in candidates.into_iter().flatten() {
        if !queries.contains(&candidate) {
            queries.push(candidate);
        }
    }
    queries
}

fn join<const N: usize>(parts: [Option<&str>; N]) -> Option<String> {
    let present: Vec<&str> = parts.into_iter().flatten().collect();
    (!present.is_empty()).then(|| present.join(", "))
}

/// Geocodes a free-text address with the country fallback.
///
/// # Errors
///
/// Returns [`AddressResolutionError::IncompleteAddress`] for blank input,
/// [`AddressResolutionError::NotFound`] when no phrasing matched, and
/// [`AddressResolutionError::Upstream`] when every attempt failed at the
/// transport level.
pub async fn geocode_free_text<G>(
    geocoder: &G,
    address: &str,
) -> Result<GeocodedPlace, AddressResolutionError>
where
    G: Geocoder + ?Sized,
{
    let queries = free_text_queries(address);
    if queries.is_empty() {
        return Err(AddressResolutionError::IncompleteAddress);
    }
    first_match(geocoder, &queries, Duration::ZERO)
        .await?
        .ok_or_else(|| AddressResolutionError::NotFound(address.trim().to_owned()))
}

/// Tries each query in turn; `Ok(None)` when at least one provider answer
/// was a clean miss and nothing matched.
async fn first_match<G>(
    geocoder: &G,
    queries: &[String],
    spacing: Duration,
) -> Result<Option<GeocodedPlace>, GeocodingError>
where
    G: Geocoder + ?Sized,
{
    let mut last_error = None;
    let mut answered = false;
    for (attempt, query) in queries.iter().enumerate() {
        if attempt > 0 && !spacing.is_zero() {
            tokio::time::sleep(spacing).await;
        }
        match geocoder.geocode(query).await {
            Ok(Some(place)) => {
                tracing::debug!(%query, "geocoded address");
                return Ok(Some(place));
            }
            Ok(None) => answered = true,
            Err(err) => {
                tracing::warn!(%query, error = %err, "geocoding attempt failed");
                last_error = Some(err);
            }
        }
    }
    match last_error {
        Some(err) if !answered => Err(err),
        _ => Ok(None),
    }
}

/// Resolves structured addresses and postal codes to coordinates.
pub struct AddressResolver<G, L>
where
    G: Geocoder + ?Sized,
    L: PostalCodeLookup + ?Sized,
{
    geocoder: Arc<G>,
    postal_codes: Arc<L>,
    query_spacing: Duration,
}

impl<G, L> AddressResolver<G, L>
where
    G: Geocoder + ?Sized,
    L: PostalCodeLookup + ?Sized,
{
    /// Creates a resolver.
    ///
    /// `query_spacing` is waited between consecutive provider queries to
    /// respect public rate limits; tests pass [`Duration::ZERO`].
    #[must_use]
    pub const fn new(geocoder: Arc<G>, postal_codes: Arc<L>, query_spacing: Duration) -> Self {
        Self {
            geocoder,
            postal_codes,
            query_spacing,
        }
    }

    /// Geocodes free text; see [`geocode_free_text`].
    ///
    /// # Errors
    ///
    /// See [`geocode_free_text`].
    pub async fn resolve_free_text(
        &self,
        address: &str,
    ) -> Result<GeocodedPlace, AddressResolutionError> {
        geocode_free_text(&*self.geocoder, address).await
    }

    /// Reverse-geocodes a point to the provider's label.
    ///
    /// # Errors
    ///
    /// Returns [`AddressResolutionError::NotFound`] when the provider knows
    /// nothing at the point and [`AddressResolutionError::Upstream`] when
    /// the provider fails.
    pub async fn reverse(
        &self,
        coordinates: Coordinates,
    ) -> Result<GeocodedPlace, AddressResolutionError> {
        self.geocoder.reverse(coordinates).await?.ok_or_else(|| {
            AddressResolutionError::NotFound(format!(
                "{}, {}",
                coordinates.latitude(),
                coordinates.longitude()
            ))
        })
    }

    /// Looks up a postal code.
    ///
    /// # Errors
    ///
    /// Returns [`AddressResolutionError::Invalid`] for malformed codes,
    /// [`AddressResolutionError::PostalCodeNotFound`] for unknown ones, and
    /// [`AddressResolutionError::Upstream`] for provider failures.
    pub async fn lookup_postal_code(
        &self,
        raw: &str,
    ) -> Result<PostalAddress, AddressResolutionError> {
        let postal_code = PostalCode::new(raw)?;
        self.postal_codes
            .lookup(&postal_code)
            .await?
            .ok_or(AddressResolutionError::PostalCodeNotFound(postal_code))
    }

    /// Resolves a structured address through the full fallback chain.
    ///
    /// When every phrasing misses and the postal code is well formed, the
    /// postal-code provider's street address and then its city are tried.
    ///
    /// # Errors
    ///
    /// Returns [`AddressResolutionError::IncompleteAddress`] when nothing
    /// was supplied, [`AddressResolutionError::NotFound`] when nothing
    /// matched, and [`AddressResolutionError::Upstream`] when every attempt
    /// failed at the transport level.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn resolve_structured(
        &self,
        input: &AddressInput,
    ) -> Result<GeocodedPlace, AddressResolutionError> {
        let queries = structured_queries(input);
        if queries.is_empty() {
            return Err(AddressResolutionError::IncompleteAddress);
        }

        let chain_error = match first_match(&*self.geocoder, &queries, self.query_spacing).await {
            Ok(Some(place)) => return Ok(place),
            Ok(None) => None,
            Err(err) => Some(err),
        };

        if let Some(place) = self.resolve_via_postal_code(input).await {
            return Ok(place);
        }

        Err(chain_error.map_or_else(
            || AddressResolutionError::NotFound(describe(input)),
            AddressResolutionError::Upstream,
        ))
    }

    async fn resolve_via_postal_code(&self, input: &AddressInput) -> Option<GeocodedPlace> {
        let postal_code = PostalCode::new(input.zip_code()?).ok()?;
        let address = match self.postal_codes.lookup(&postal_code).await {
            Ok(found) => found?,
            Err(err) => {
                tracing::warn!(%postal_code, error = %err, "postal code lookup failed");
                return None;
            }
        };
        let queries = [address.geocoding_query(), address.city_query()];
        first_match(&*self.geocoder, &queries, Duration::ZERO)
            .await
            .ok()
            .flatten()
    }
}

fn describe(input: &AddressInput) -> String {
    let place = join([input.address(), input.city()]).unwrap_or_default();
    match input.state() {
        Some(state) => format!("{place} - {state}"),
        None => place,
    }
}
