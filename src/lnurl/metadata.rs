use anyhow::{Result, anyhow};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Deserializer};
use sha2::{Digest, Sha256};

pub const TEXT_PLAIN: &str = "text/plain";

/// One `[contentType, content]` pair of LNURL-pay metadata.
pub type MetadataEntry = (String, String);

/// LNURL-pay metadata, serialized once on construction.
///
/// Wallets verify an invoice by hashing the `metadata` string they received
/// and comparing it to the invoice's description hash, so the string handed
/// out and the string hashed must be the same bytes. Both come from
/// [`PayMetadata::as_json`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayMetadata {
    json: String,
}

impl PayMetadata {
    pub fn new(entries: Vec<MetadataEntry>) -> Result<Self> {
        let text_entries = entries.iter().filter(|(kind, _)| kind == TEXT_PLAIN).count();
        if text_entries != 1 {
            return Err(anyhow!(
                "Metadata must contain exactly one {} entry, found {}",
                TEXT_PLAIN,
                text_entries
            ));
        }

        let json = serde_json::to_string(&entries)?;
        Ok(Self { json })
    }

    pub fn text(text: impl Into<String>) -> Self {
        let entries = vec![(TEXT_PLAIN.to_string(), text.into())];
        // A Vec of string pairs always serializes
        let json = serde_json::to_string(&entries).unwrap_or_default();
        Self { json }
    }

    pub fn as_json(&self) -> &str {
        &self.json
    }

    pub fn digest(&self) -> [u8; 32] {
        Sha256::digest(self.json.as_bytes()).into()
    }

    /// Base64 SHA-256 of the metadata string, as LND expects `description_hash`
    pub fn description_hash(&self) -> String {
        STANDARD.encode(self.digest())
    }
}

impl<'de> Deserialize<'de> for PayMetadata {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<MetadataEntry>::deserialize(deserializer)?;
        Self::new(entries).map_err(serde::de::Error::custom)
    }
}
