//! `diaristlink-server`: HTTP API for the diarist marketplace.
//!
//! Storage is `PostgreSQL` when `DATABASE_URL` is set and in-memory
//! otherwise. Geocoding goes to Nominatim and postal codes to `ViaCEP`.
//! Run with `--help` for every setting.

use clap::Parser;
use diaristlink::config::ServerConfig;
use diaristlink::geo::adapters::{NominatimGeocoder, ViaCepClient};
use diaristlink::http::{AppState, Ports, router};
use diaristlink::job::adapters::{memory::InMemoryJobRepository, postgres::PostgresJobRepository};
use diaristlink::persistence::{self, PersistenceError, PgPool};
use diaristlink::profile::adapters::{
    memory::InMemoryProfileRepository, postgres::PostgresProfileRepository,
};
use diaristlink::telemetry;
use eyre::WrapErr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let config = ServerConfig::parse();
    telemetry::init_tracing(config.json_logs).wrap_err("failed to install tracing subscriber")?;

    let ports = build_ports(&config).await?;
    let app = router(AppState::new(
        ports,
        config.policy(),
        config.geocoder_spacing(),
    ));

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .wrap_err_with(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(
        addr = %config.listen_addr,
        ownership = ?config.employer_ownership,
        "diaristlink-server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server terminated with an error")
}

async fn build_ports(config: &ServerConfig) -> eyre::Result<Ports> {
    let geocoder = Arc::new(
        NominatimGeocoder::new(config.nominatim()).wrap_err("failed to build geocoder")?,
    );
    let postal_codes = Arc::new(
        ViaCepClient::new(config.viacep_url.clone(), config.http_timeout())
            .wrap_err("failed to build postal-code client")?,
    );

    let Some(url) = config.database_url.clone() else {
        tracing::warn!("DATABASE_URL not set; data lives in memory and is lost on exit");
        return Ok(Ports {
            jobs: Arc::new(InMemoryJobRepository::new()),
            profiles: Arc::new(InMemoryProfileRepository::new()),
            geocoder,
            postal_codes,
        });
    };

    let pool_size = config.pool_size;
    let pool = tokio::task::spawn_blocking(move || -> Result<PgPool, PersistenceError> {
        let pool = persistence::connect(&url, pool_size)?;
        persistence::apply_schema(&pool)?;
        Ok(pool)
    })
    .await
    .wrap_err("database setup task failed")?
    .wrap_err("failed to prepare the database")?;
    tracing::info!(pool_size, "using PostgreSQL storage");

    Ok(Ports {
        jobs: Arc::new(PostgresJobRepository::new(pool.clone())),
        profiles: Arc::new(PostgresProfileRepository::new(pool)),
        geocoder,
        postal_codes,
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
