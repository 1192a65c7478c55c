//! Connection version negotiation.

use core::fmt::{Display, Error as FmtError, Formatter};

use crate::connection::error::ConnectionError;
use crate::prelude::*;

/// Feature advertising support for ordered channels over a connection.
pub const FEATURE_ORDER_ORDERED: &str = "ORDER_ORDERED";
/// Feature advertising support for unordered channels over a connection.
pub const FEATURE_ORDER_UNORDERED: &str = "ORDER_UNORDERED";

/// A connection version: an identifier plus the feature set supported
/// under it. Negotiated down to a single version during the handshake.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Version {
    identifier: String,
    features: Vec<String>,
}

impl Version {
    pub fn new(identifier: String, features: Vec<String>) -> Self {
        Self {
            identifier,
            features,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Checks that some version in `supported` carries this identifier and
    /// every feature this version claims.
    pub fn verify_is_supported(&self, supported: &[Version]) -> Result<(), ConnectionError> {
        let maybe_supported_version = supported.iter().find(|v| v.identifier == self.identifier);

        let Some(supported_version) = maybe_supported_version else {
            return Err(ConnectionError::VersionNotSupported {
                version: self.clone(),
            });
        };

        for feature in &self.features {
            if !supported_version.features.contains(feature) {
                return Err(ConnectionError::FeatureNotSupported {
                    feature: feature.clone(),
                });
            }
        }

        Ok(())
    }

    /// Whether the negotiated version permits channels of the given
    /// ordering feature.
    pub fn is_supported_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

impl Default for Version {
    fn default() -> Self {
        Self {
            identifier: "1".to_string(),
            features: vec![
                FEATURE_ORDER_ORDERED.to_string(),
                FEATURE_ORDER_UNORDERED.to_string(),
            ],
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "{}({})",
            self.identifier,
            self.features.join(",")
        )
    }
}

/// The versions this implementation is compatible with, in preference
/// order.
pub fn compatibles() -> Vec<Version> {
    vec![Version::default()]
}

/// Selects the connection version: the first locally supported version the
/// counterparty also proposed, with the feature set cut down to the
/// intersection.
///
/// A candidate with a matching identifier but no overlapping features is
/// skipped, unless the local version declared no features at all, in which
/// case a bare identifier match suffices.
pub fn pick_version(
    supported: &[Version],
    candidates: &[Version],
) -> Result<Version, ConnectionError> {
    for local in supported {
        let Some(candidate) = candidates.iter().find(|c| c.identifier == local.identifier) else {
            continue;
        };

        let features: Vec<String> = local
            .features
            .iter()
            .filter(|f| candidate.features.contains(f))
            .cloned()
            .collect();

        if features.is_empty() && !local.features.is_empty() {
            continue;
        }

        return Ok(Version {
            identifier: local.identifier.clone(),
            features,
        });
    }

    Err(ConnectionError::VersionMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(id: &str) -> Version {
        Version::new(id.to_string(), vec![])
    }

    #[test]
    fn default_versions_negotiate_with_themselves() {
        let picked = pick_version(&compatibles(), &compatibles()).unwrap();
        assert_eq!(picked, Version::default());
    }

    #[test]
    fn overlap_picks_the_common_version() {
        let local = [bare("1"), bare("2")];
        let remote = [bare("2"), bare("3")];
        let picked = pick_version(&local, &remote).unwrap();
        assert_eq!(picked.identifier(), "2");
    }

    #[test]
    fn disjoint_sets_fail_negotiation() {
        let local = [bare("1")];
        let remote = [bare("2")];
        assert!(matches!(
            pick_version(&local, &remote),
            Err(ConnectionError::VersionMismatch)
        ));
    }

    #[test]
    fn features_are_intersected() {
        let local = [Version::new(
            "1".to_string(),
            vec![
                FEATURE_ORDER_ORDERED.to_string(),
                FEATURE_ORDER_UNORDERED.to_string(),
            ],
        )];
        let remote = [Version::new(
            "1".to_string(),
            vec![FEATURE_ORDER_UNORDERED.to_string()],
        )];

        let picked = pick_version(&local, &remote).unwrap();
        assert_eq!(picked.features(), [FEATURE_ORDER_UNORDERED.to_string()]);
    }

    #[test]
    fn matching_identifier_without_common_features_is_skipped() {
        let local = [Version::new(
            "1".to_string(),
            vec![FEATURE_ORDER_ORDERED.to_string()],
        )];
        let remote = [Version::new(
            "1".to_string(),
            vec![FEATURE_ORDER_UNORDERED.to_string()],
        )];

        assert!(pick_version(&local, &remote).is_err());
    }

    #[test]
    fn unknown_version_is_rejected() {
        let proposed = bare("9");
        assert!(proposed.verify_is_supported(&compatibles()).is_err());
        assert!(Version::default()
            .verify_is_supported(&compatibles())
            .is_ok());
    }
}
