use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{CreatedInvoice, InvoiceRequest, LightningBackend};
use crate::config::Config;

const MACAROON_HEADER: &str = "Grpc-Metadata-macaroon";

/// Invoice creation through LND's REST API (`POST /v1/invoices`)
pub struct LndRestBackend {
    client: Client,
    invoices_url: String,
    macaroon: String,
}

impl LndRestBackend {
    pub fn new(
        host: &str,
        port: u16,
        macaroon: String,
        timeout: Duration,
        accept_invalid_certs: bool,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .context("Failed to build LND HTTP client")?;

        Ok(Self {
            client,
            invoices_url: format!("{}:{}/v1/invoices", host.trim_end_matches('/'), port),
            macaroon,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.lnd_host,
            config.lnd_rest_port,
            config.lnd_macaroon.clone(),
            config.lnd_timeout(),
            config.lnd_accept_invalid_certs,
        )
    }

    pub fn invoices_url(&self) -> &str {
        &self.invoices_url
    }
}

#[async_trait]
impl LightningBackend for LndRestBackend {
    async fn create_invoice(&self, request: &InvoiceRequest) -> Result<CreatedInvoice> {
        tracing::debug!(value = request.value, "Requesting invoice from LND");

        let response = self
            .client
            .post(&self.invoices_url)
            .header(MACAROON_HEADER, &self.macaroon)
            .json(request)
            .send()
            .await
            .context("LND request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("LND returned HTTP {}: {}", status, body);
        }

        response
            .json::<CreatedInvoice>()
            .await
            .context("Invalid LND invoice response")
    }
}
