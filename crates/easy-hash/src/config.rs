//! Hasher configuration.

use easy_hash_digest::DigestAlgorithm;
use serde::{Deserialize, Serialize};

/// Configuration for a [`Hasher`](crate::Hasher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HasherConfig {
    /// Algorithm used when a call does not name one.
    pub default_algorithm: DigestAlgorithm,
}

impl HasherConfig {
    /// SHA-1 default, matching the older hashing entry point.
    pub fn legacy() -> Self {
        Self {
            default_algorithm: DigestAlgorithm::Sha1,
        }
    }

    pub fn with_default_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.default_algorithm = algorithm;
        self
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            default_algorithm: DigestAlgorithm::Sha256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(HasherConfig::default().default_algorithm, DigestAlgorithm::Sha256);
        assert_eq!(HasherConfig::legacy().default_algorithm, DigestAlgorithm::Sha1);
    }

    #[test]
    fn test_serde_uses_algorithm_names() {
        let json = serde_json::to_string(&HasherConfig::legacy()).unwrap();
        assert_eq!(json, r#"{"default_algorithm":"SHA-1"}"#);

        let parsed: HasherConfig = serde_json::from_str(r#"{"default_algorithm":"SHA-512"}"#).unwrap();
        assert_eq!(parsed.default_algorithm, DigestAlgorithm::Sha512);

        let empty: HasherConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, HasherConfig::default());
    }
}
