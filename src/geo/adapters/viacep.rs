//! `ViaCEP` postal-code lookup.

use crate::geo::{
    domain::{PostalAddress, PostalCode},
    ports::{GeocodingError, GeocodingResult, PostalCodeLookup},
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Postal-code lookup backed by the `ViaCEP` HTTP API.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    /// Builds a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodingError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> GeocodingResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GeocodingError::transport)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl PostalCodeLookup for ViaCepClient {
    #[tracing::instrument(skip_all, fields(postal_code = %postal_code), level = "debug")]
    async fn lookup(&self, postal_code: &PostalCode) -> GeocodingResult<Option<PostalAddress>> {
        let url = format!(
            "{}/ws/{}/json/",
            self.base_url.trim_end_matches('/'),
            postal_code.as_str()
        );
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(GeocodingError::transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::UnexpectedStatus(status.as_u16()));
        }
        let reply: ViaCepReply = response.json().await.map_err(GeocodingError::transport)?;
        Ok(reply.into_address(postal_code))
    }
}

/// Raw `ViaCEP` payload.
///
/// Unknown codes come back as `{"erro": true}` (older deployments send the
/// string `"true"`).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ViaCepReply {
    erro: Option<Value>,
    logradouro: String,
    bairro: String,
    localidade: String,
    uf: String,
}

impl ViaCepReply {
    pub(crate) fn into_address(self, postal_code: &PostalCode) -> Option<PostalAddress> {
        let flagged_missing = match &self.erro {
            None | Some(Value::Null | Value::Bool(false)) => false,
            Some(Value::String(text)) => text != "false",
            Some(_) => true,
        };
        if flagged_missing || self.localidade.is_empty() {
            return None;
        }
        Some(PostalAddress {
            postal_code: postal_code.clone(),
            street: self.logradouro,
            neighbourhood: self.bairro,
            city: self.localidade,
            state: self.uf,
        })
    }
}
