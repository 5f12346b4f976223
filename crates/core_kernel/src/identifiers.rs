//! Strongly-typed identifiers for domain entities
//!
//! Newtype wrappers keep claim and revert identifiers from being mixed up.
//! The inner value is an opaque string: ids minted here are hyphenated UUIDs,
//! but ids arriving from batch sources are kept exactly as supplied.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Error returned when parsing a blank identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity} id must not be empty")]
pub struct EmptyIdError {
    pub entity: &'static str,
}

macro_rules! define_id {
    ($name:ident, $entity:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Mints a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Returns the identifier text as stored
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier, returning the inner string
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Returns the entity name used in error messages
            pub fn entity() -> &'static str {
                $entity
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        /// Trims surrounding whitespace and rejects blank input.
        impl FromStr for $name {
            type Err = EmptyIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(EmptyIdError { entity: $entity });
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ClaimId, "Claim");
define_id!(RevertId, "Revert");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_claim_id_is_uuid() {
        let id = ClaimId::new();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
        assert_eq!(id.to_string(), id.as_str());
    }

    #[test]
    fn test_id_parsing() {
        let id = RevertId::new();
        let parsed: RevertId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_blank_id_is_rejected() {
        let err = "   ".parse::<ClaimId>().unwrap_err();
        assert_eq!(err.entity, "Claim");
    }

    #[test]
    fn test_case_is_preserved() {
        let id = ClaimId::from("6F1C2B8E-0000-4000-8000-00000000ABCD");
        assert_eq!(id.as_str(), "6F1C2B8E-0000-4000-8000-00000000ABCD");
    }
}
