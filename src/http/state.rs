//! Shared state handed to every handler.

use crate::discovery::services::DiscoveryService;
use crate::geo::{
    ports::{Geocoder, PostalCodeLookup},
    services::AddressResolver,
};
use crate::job::{domain::TransitionPolicy, ports::JobRepository, services::JobLifecycleService};
use crate::profile::{ports::ProfileRepository, services::ProfileService};
use mockable::DefaultClock;
use std::sync::Arc;
use std::time::Duration;

/// Job lifecycle service over trait-object ports.
pub type JobApi =
    JobLifecycleService<dyn JobRepository, dyn ProfileRepository, dyn Geocoder, DefaultClock>;

/// Profile service over trait-object ports.
pub type ProfileApi =
    ProfileService<dyn ProfileRepository, dyn Geocoder, dyn PostalCodeLookup, DefaultClock>;

/// Discovery service over trait-object ports.
pub type DiscoveryApi = DiscoveryService<dyn JobRepository, dyn ProfileRepository>;

/// Address resolver over trait-object ports.
pub type AddressApi = AddressResolver<dyn Geocoder, dyn PostalCodeLookup>;

/// Adapters chosen at startup.
#[derive(Clone)]
pub struct Ports {
    /// Job storage.
    pub jobs: Arc<dyn JobRepository>,
    /// Profile storage.
    pub profiles: Arc<dyn ProfileRepository>,
    /// Forward and reverse geocoding.
    pub geocoder: Arc<dyn Geocoder>,
    /// Postal-code lookup.
    pub postal_codes: Arc<dyn PostalCodeLookup>,
}

/// Services shared by the handlers.
#[derive(Clone)]
pub struct AppState {
    /// Posting, lookup, and status transitions.
    pub jobs: Arc<JobApi>,
    /// Profile creation and location updates.
    pub profiles: Arc<ProfileApi>,
    /// Radius-filtered listings.
    pub discovery: Arc<DiscoveryApi>,
    /// Geocoding and postal-code proxies.
    pub addresses: Arc<AddressApi>,
}

impl AppState {
    /// Wires the services over `ports`.
    ///
    /// `query_spacing` is the pause between consecutive geocoder queries of
    /// one structured-address resolution.
    #[must_use]
    pub fn new(ports: Ports, policy: TransitionPolicy, query_spacing: Duration) -> Self {
        let clock = Arc::new(DefaultClock);
        let Ports {
            jobs,
            profiles,
            geocoder,
            postal_codes,
        } = ports;

        let resolver = || {
            AddressResolver::new(
                Arc::clone(&geocoder),
                Arc::clone(&postal_codes),
                query_spacing,
            )
        };

        Self {
            jobs: Arc::new(JobLifecycleService::new(
                Arc::clone(&jobs),
                Arc::clone(&profiles),
                Arc::clone(&geocoder),
                policy,
                Arc::clone(&clock),
            )),
            profiles: Arc::new(ProfileService::new(
                Arc::clone(&profiles),
                resolver(),
                clock,
            )),
            addresses: Arc::new(resolver()),
            discovery: Arc::new(DiscoveryService::new(jobs, profiles)),
        }
    }
}
