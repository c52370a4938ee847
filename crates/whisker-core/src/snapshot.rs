use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug)]
pub enum SnapshotError {
    Encode(String),
    Decode(String),
    Json(String),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(e) => write!(f, "snapshot encode error: {e}"),
            Self::Decode(e) => write!(f, "snapshot decode error: {e}"),
            Self::Json(e) => write!(f, "snapshot json error: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Encode a state value as MessagePack.
pub fn encode<T: Serialize>(state: &T) -> Result<Vec<u8>, SnapshotError> {
    rmp_serde::to_vec(state).map_err(|e| SnapshotError::Encode(e.to_string()))
}

/// Decode a MessagePack state value.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SnapshotError> {
    rmp_serde::from_slice(bytes).map_err(|e| {
        tracing::debug!(len = bytes.len(), error = %e, "rejected state snapshot");
        SnapshotError::Decode(e.to_string())
    })
}

/// Human-readable dump for logs and summaries.
pub fn to_json_pretty<T: Serialize>(state: &T) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(state).map_err(|e| SnapshotError::Json(e.to_string()))
}
