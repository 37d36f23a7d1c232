pub mod lnd;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use lightning_invoice::{Bolt11Invoice, Bolt11InvoiceDescriptionRef};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use lnd::LndRestBackend;

/// Newtype wrapper around Bolt11Invoice for convenience methods
#[derive(Debug, Clone)]
pub struct Invoice(Bolt11Invoice);

impl FromStr for Invoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bolt11Invoice::from_str(s)
            .map(Self)
            .map_err(|e| anyhow!("Invalid invoice: {}", e))
    }
}

impl Invoice {
    pub fn amount_msats(&self) -> Option<u64> {
        self.0.amount_milli_satoshis()
    }

    pub fn payment_hash(&self) -> String {
        hex::encode(self.0.payment_hash().as_ref() as &[u8])
    }

    /// Whether the invoice carries `digest` as its description hash
    pub fn commits_to(&self, digest: &[u8; 32]) -> bool {
        match self.0.description() {
            Bolt11InvoiceDescriptionRef::Hash(hash) => {
                let bytes: &[u8] = hash.0.as_ref();
                bytes == digest.as_slice()
            }
            Bolt11InvoiceDescriptionRef::Direct(_) => false,
        }
    }
}

/// Body of an invoice creation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    /// Satoshis
    pub value: u64,
    /// Base64 SHA-256 of the LNURL-pay metadata string
    pub description_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedInvoice {
    pub payment_request: String,
}

#[async_trait]
pub trait LightningBackend: Send + Sync {
    /// Ask the node for a new invoice. A single attempt, no retries.
    async fn create_invoice(&self, request: &InvoiceRequest) -> Result<CreatedInvoice>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_invoice() {
        assert!(Invoice::from_str("lnbcmock1000").is_err());
        assert!(Invoice::from_str("").is_err());
    }

    #[test]
    fn test_invoice_request_wire_format() {
        let request = InvoiceRequest {
            value: 21,
            description_hash: "q83vEjRWeJCrze8SNFZ4kKvN7xI0VniQq83vEjRWeJA=".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "value": 21,
                "description_hash": "q83vEjRWeJCrze8SNFZ4kKvN7xI0VniQq83vEjRWeJA=",
            })
        );
    }
}
