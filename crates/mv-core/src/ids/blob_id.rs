use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Opaque identifier assigned by the blob store when a write starts.
/// Every chunk of the blob is keyed by `(BlobId, seq)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobId(String);

impl_id!(BlobId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_distinct_uuids() {
        let a = BlobId::new();
        let b = BlobId::new();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = BlobId::from("blob-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"blob-1\"");
    }
}
