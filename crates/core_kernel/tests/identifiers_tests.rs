//! Unit tests for the identifier newtypes
//!
//! Tests cover minting, parsing, conversion, and serialization of the
//! claim and revert identifiers.

use core_kernel::{ClaimId, RevertId};
use uuid::Uuid;

mod claim_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = ClaimId::new();
        let id2 = ClaimId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = ClaimId::from(uuid);
        assert_eq!(id.as_str(), uuid.to_string());
    }

    #[test]
    fn test_entity_name() {
        assert_eq!(ClaimId::entity(), "Claim");
    }

    #[test]
    fn test_roundtrip() {
        let id = ClaimId::new();
        let parsed: ClaimId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let id = ClaimId::new();
        let parsed: ClaimId = format!("  {}\n", id).parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_accepts_non_uuid_text() {
        let parsed: ClaimId = "legacy-claim-42".parse().unwrap();
        assert_eq!(parsed.as_str(), "legacy-claim-42");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!("".parse::<ClaimId>().is_err());
        assert!(" \t".parse::<ClaimId>().is_err());
    }

    #[test]
    fn test_json_is_bare_string() {
        let id = ClaimId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_str()));

        let deserialized: ClaimId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_json_keeps_any_string_verbatim() {
        let id: ClaimId = serde_json::from_str("\"ABC-Upper-001\"").unwrap();
        assert_eq!(id.as_str(), "ABC-Upper-001");
    }
}

mod revert_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = RevertId::new();
        let id2 = RevertId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_entity_name() {
        assert_eq!(RevertId::entity(), "Revert");
    }

    #[test]
    fn test_into_inner() {
        let id = RevertId::from("r-1".to_string());
        assert_eq!(id.into_inner(), "r-1");
    }
}
