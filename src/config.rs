//! Server configuration from command-line flags and environment variables.

use crate::geo::adapters::NominatimConfig;
use crate::job::domain::{EmployerOwnership, TransitionPolicy};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::time::Duration;

/// Whether employers may only act on jobs they posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OwnershipMode {
    /// Employers act only on their own jobs.
    Enforced,
    /// Any employer may transition any job; only the role is checked.
    Unchecked,
}

impl From<OwnershipMode> for EmployerOwnership {
    fn from(mode: OwnershipMode) -> Self {
        match mode {
            OwnershipMode::Enforced => Self::Enforced,
            OwnershipMode::Unchecked => Self::Unchecked,
        }
    }
}

/// Runtime settings for `diaristlink-server`.
#[derive(Debug, Clone, Parser)]
#[command(name = "diaristlink-server", version, about = "Diarist and employer marketplace API")]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[arg(long, env = "DIARISTLINK_LISTEN_ADDR", default_value = "127.0.0.1:8080")]
    pub listen_addr: SocketAddr,

    /// `PostgreSQL` connection URL; in-memory storage when absent.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections.
    #[arg(long, env = "DIARISTLINK_POOL_SIZE", default_value_t = 10)]
    pub pool_size: u32,

    /// Nominatim base URL.
    #[arg(
        long,
        env = "DIARISTLINK_NOMINATIM_URL",
        default_value = "https://nominatim.openstreetmap.org"
    )]
    pub nominatim_url: String,

    /// `ViaCEP` base URL.
    #[arg(long, env = "DIARISTLINK_VIACEP_URL", default_value = "https://viacep.com.br")]
    pub viacep_url: String,

    /// User agent sent to the geocoding providers.
    #[arg(long, env = "DIARISTLINK_USER_AGENT", default_value = "DiaristLink/1.0")]
    pub user_agent: String,

    /// Pause between consecutive geocoder queries, in milliseconds.
    #[arg(long, env = "DIARISTLINK_GEOCODER_SPACING_MS", default_value_t = 1000)]
    pub geocoder_spacing_ms: u64,

    /// Timeout for outbound provider requests, in seconds.
    #[arg(long, env = "DIARISTLINK_HTTP_TIMEOUT_SECS", default_value_t = 10)]
    pub http_timeout_secs: u64,

    /// Employer ownership rule for status changes.
    #[arg(
        long,
        env = "DIARISTLINK_EMPLOYER_OWNERSHIP",
        value_enum,
        default_value_t = OwnershipMode::Unchecked
    )]
    pub employer_ownership: OwnershipMode,

    /// Emit logs as JSON lines.
    #[arg(long, env = "DIARISTLINK_JSON_LOGS")]
    pub json_logs: bool,
}

impl ServerConfig {
    /// Transition policy selected by the ownership mode.
    #[must_use]
    pub fn policy(&self) -> TransitionPolicy {
        TransitionPolicy::new(self.employer_ownership.into())
    }

    /// Pause between geocoder queries.
    #[must_use]
    pub const fn geocoder_spacing(&self) -> Duration {
        Duration::from_millis(self.geocoder_spacing_ms)
    }

    /// Timeout for outbound provider requests.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Nominatim settings restricted to Brazilian results.
    #[must_use]
    pub fn nominatim(&self) -> NominatimConfig {
        NominatimConfig {
            base_url: self.nominatim_url.trim_end_matches('/').to_owned(),
            user_agent: self.user_agent.clone(),
            country_codes: "br".to_owned(),
            timeout: self.http_timeout(),
        }
    }
}
