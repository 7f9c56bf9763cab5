use serde::{Deserialize, Serialize};

use crate::core::{
    ob2::OB2_CONTEXT,
    ob3::{CREDENTIAL_CONTEXTS, OPEN_BADGES_CONTEXTS},
};

/// Verifier configuration.
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// W3C Verifiable Credentials context URIs an OB3 `@context` may use.
    pub credential_contexts: Vec<String>,
    /// Open Badges 3.0 context URIs an OB3 `@context` may use.
    pub open_badges_contexts: Vec<String>,
    /// The OB2 context placed in issued templates and expected on OB2 Assertions.
    pub ob2_context: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credential_contexts: CREDENTIAL_CONTEXTS.iter().map(|s| s.to_string()).collect(),
            open_badges_contexts: OPEN_BADGES_CONTEXTS.iter().map(|s| s.to_string()).collect(),
            ob2_context: OB2_CONTEXT.to_owned(),
        }
    }
}

impl Config {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn is_credential_context(&self, uri: &str) -> bool {
        self.credential_contexts.iter().any(|c| c == uri)
    }

    pub fn is_open_badges_context(&self, uri: &str) -> bool {
        self.open_badges_contexts.iter().any(|c| c == uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Config::from_json_str("{}").unwrap(), Config::default());
    }

    #[test]
    fn overrides_are_partial() {
        let config =
            Config::from_json_str(r#"{ "openBadgesContexts": ["https://example.org/ob3"] }"#)
                .unwrap();

        assert!(config.is_open_badges_context("https://example.org/ob3"));
        assert!(!config.is_open_badges_context(OPEN_BADGES_CONTEXTS[0]));
        assert!(config.is_credential_context("https://www.w3.org/ns/credentials/v2"));
        assert_eq!(config.ob2_context, OB2_CONTEXT);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(Config::from_json_str(r#"{ "ob2Context": 2 }"#).is_err());
    }
}
