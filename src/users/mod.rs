pub mod models;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::lnurl::PayMetadata;
pub use models::{EffectiveConfig, GlobalDefaults, UserConfig, UsersFile};

#[derive(Debug, Error)]
pub enum UsersFileError {
    #[error("Failed to read users file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse users file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid username {0:?}")]
    InvalidUsername(String),

    #[error("User {username}: minSendable {min} exceeds maxSendable {max}")]
    InvalidBounds { username: String, min: u64, max: u64 },
}

/// Read-only username lookup, built once at startup.
#[derive(Debug, Clone)]
pub struct UserStore {
    users: HashMap<String, EffectiveConfig>,
}

impl UserStore {
    pub fn new(file: UsersFile) -> Result<Self, UsersFileError> {
        let mut users = HashMap::with_capacity(file.users.len());

        for (username, user) in file.users {
            if !is_valid_username(&username) {
                return Err(UsersFileError::InvalidUsername(username));
            }

            let effective = EffectiveConfig::resolve(&user, &file.defaults);
            if effective.min_sendable > effective.max_sendable {
                return Err(UsersFileError::InvalidBounds {
                    username,
                    min: effective.min_sendable,
                    max: effective.max_sendable,
                });
            }

            users.insert(username, effective);
        }

        Ok(Self { users })
    }

    pub fn from_toml(contents: &str) -> Result<Self, UsersFileError> {
        Self::new(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, UsersFileError> {
        let contents = std::fs::read_to_string(path).map_err(|source| UsersFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Configuration used when no users file is supplied
    pub fn builtin() -> Self {
        let users = HashMap::from([(
            "austin".to_string(),
            UserConfig {
                metadata: Some(PayMetadata::text("Austin's Lightning Address Endpoint")),
                max_sendable: Some(1_000_000),
                min_sendable: Some(1_000),
            },
        )]);

        let defaults = GlobalDefaults::default();
        Self {
            users: users
                .into_iter()
                .map(|(name, user)| (name, EffectiveConfig::resolve(&user, &defaults)))
                .collect(),
        }
    }

    /// Exact, case-sensitive match
    pub fn lookup(&self, username: &str) -> Option<&EffectiveConfig> {
        self.users.get(username)
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }
}

/// Empty names and the literal "undefined" are what broken client-side URL
/// templates produce, so they can never be registered.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty() && username != "undefined"
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS_TOML: &str = r#"
[defaults]
metadata = [["text/plain", "Lightning Address Payment"]]
max_sendable = 5000000
min_sendable = 2000

[users.austin]
metadata = [["text/plain", "Austin's Lightning Address Endpoint"]]
max_sendable = 1000000
min_sendable = 1000

[users.satoshi]
max_sendable = 100000000

[users.bare]
"#;

    #[test]
    fn test_load_from_toml() {
        let store = UserStore::from_toml(USERS_TOML).unwrap();
        assert_eq!(store.usernames().count(), 3);

        let austin = store.lookup("austin").unwrap();
        assert_eq!(austin.max_sendable, 1_000_000);
        assert_eq!(austin.min_sendable, 1_000);
        assert_eq!(
            austin.metadata.as_json(),
            r#"[["text/plain","Austin's Lightning Address Endpoint"]]"#
        );
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let store = UserStore::from_toml(USERS_TOML).unwrap();

        let satoshi = store.lookup("satoshi").unwrap();
        assert_eq!(satoshi.max_sendable, 100_000_000);
        assert_eq!(satoshi.min_sendable, 2_000);
        assert_eq!(
            satoshi.metadata.as_json(),
            r#"[["text/plain","Lightning Address Payment"]]"#
        );

        let bare = store.lookup("bare").unwrap();
        assert_eq!(bare.max_sendable, 5_000_000);
        assert_eq!(bare.min_sendable, 2_000);
    }

    #[test]
    fn test_zero_bounds_count_as_unset() {
        let user = UserConfig {
            metadata: None,
            max_sendable: Some(0),
            min_sendable: Some(0),
        };
        let effective = EffectiveConfig::resolve(&user, &GlobalDefaults::default());
        assert_eq!(effective.max_sendable, 1_000_000);
        assert_eq!(effective.min_sendable, 1_000);
    }

    #[test]
    fn test_defaults_section_is_optional() {
        let store = UserStore::from_toml("[users.alice]\nmin_sendable = 5000\n").unwrap();
        let alice = store.lookup("alice").unwrap();
        assert_eq!(alice.min_sendable, 5_000);
        assert_eq!(alice.max_sendable, 1_000_000);
        assert_eq!(alice.metadata, GlobalDefaults::default().metadata);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let store = UserStore::builtin();
        assert!(store.lookup("austin").is_some());
        assert!(store.lookup("Austin").is_none());
        assert!(store.lookup("AUSTIN").is_none());
        assert!(store.lookup("").is_none());
        assert!(store.lookup("undefined").is_none());
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let result = UserStore::from_toml("[users.bob]\nmin_sendable = 2000000\n");
        assert!(matches!(
            result,
            Err(UsersFileError::InvalidBounds { min: 2_000_000, max: 1_000_000, .. })
        ));
    }

    #[test]
    fn test_rejects_reserved_usernames() {
        let result = UserStore::from_toml("[users.undefined]\n");
        assert!(matches!(result, Err(UsersFileError::InvalidUsername(_))));

        let result = UserStore::from_toml("[users.\"\"]\n");
        assert!(matches!(result, Err(UsersFileError::InvalidUsername(_))));
    }

    #[test]
    fn test_rejects_metadata_without_text_plain() {
        let toml = r#"
[users.carol]
metadata = [["text/email", "carol@example.com"]]
"#;
        let result = UserStore::from_toml(toml);
        assert!(matches!(result, Err(UsersFileError::Parse(_))));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let result = UserStore::from_toml("[users.dave]\nmaxSendable = 1000\n");
        assert!(matches!(result, Err(UsersFileError::Parse(_))));
    }

    #[test]
    fn test_registered_users_have_ordered_bounds() {
        for store in [UserStore::builtin(), UserStore::from_toml(USERS_TOML).unwrap()] {
            for username in store.usernames() {
                let user = store.lookup(username).unwrap();
                assert!(user.min_sendable <= user.max_sendable, "{username}");
            }
        }
    }

    #[test]
    fn test_example_file_matches_builtin() {
        let store = UserStore::from_toml(include_str!("../../users.example.toml")).unwrap();
        assert_eq!(store.lookup("austin"), UserStore::builtin().lookup("austin"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = UserStore::load(Path::new("/nonexistent/users.toml"));
        assert!(matches!(result, Err(UsersFileError::Read { .. })));
    }
}
