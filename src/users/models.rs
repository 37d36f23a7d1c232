use serde::Deserialize;
use std::collections::HashMap;

use crate::lnurl::PayMetadata;

/// Per-user payment parameters as written in the users file. Any omitted
/// field falls back to [`GlobalDefaults`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub metadata: Option<PayMetadata>,
    /// Millisatoshis
    pub max_sendable: Option<u64>,
    /// Millisatoshis
    pub min_sendable: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalDefaults {
    pub metadata: PayMetadata,
    pub max_sendable: u64,
    pub min_sendable: u64,
}

impl Default for GlobalDefaults {
    fn default() -> Self {
        Self {
            metadata: PayMetadata::text("Lightning Address Payment"),
            max_sendable: 1_000_000,
            min_sendable: 1_000,
        }
    }
}

/// A user's parameters after defaults have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub metadata: PayMetadata,
    pub max_sendable: u64,
    pub min_sendable: u64,
}

impl EffectiveConfig {
    /// Field-or-default merge. Zero bounds count as unset.
    pub fn resolve(user: &UserConfig, defaults: &GlobalDefaults) -> Self {
        Self {
            metadata: user
                .metadata
                .clone()
                .unwrap_or_else(|| defaults.metadata.clone()),
            max_sendable: user
                .max_sendable
                .filter(|msats| *msats > 0)
                .unwrap_or(defaults.max_sendable),
            min_sendable: user
                .min_sendable
                .filter(|msats| *msats > 0)
                .unwrap_or(defaults.min_sendable),
        }
    }
}

/// Top level layout of the users TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersFile {
    #[serde(default)]
    pub defaults: GlobalDefaults,
    #[serde(default)]
    pub users: HashMap<String, UserConfig>,
}
