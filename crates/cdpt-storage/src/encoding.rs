use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use cdpt_types::ChatHistory;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

/// Shape of a download body returned by the storage gateway
///
/// The gateway does not advertise which one it uses, so this is set in
/// configuration per deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadEncoding {
    /// `{ "data": "<base64 of the JSON transcript>" }`
    #[default]
    Base64,
    /// The JSON transcript itself.
    Raw,
}

#[derive(Deserialize)]
struct Envelope {
    data: String,
}

impl PayloadEncoding {
    /// Decode a download body into a transcript.
    pub fn decode(self, body: &[u8]) -> Result<ChatHistory> {
        match self {
            PayloadEncoding::Raw => ChatHistory::from_json_slice(body)
                .map_err(|e| StorageError::Decode(format!("invalid transcript JSON: {}", e))),
            PayloadEncoding::Base64 => {
                let envelope: Envelope = serde_json::from_slice(body)
                    .map_err(|e| StorageError::Decode(format!("invalid download envelope: {}", e)))?;
                let compact: String = envelope
                    .data
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                let bytes = STANDARD
                    .decode(compact.as_bytes())
                    .map_err(|e| StorageError::Decode(format!("invalid base64 payload: {}", e)))?;
                ChatHistory::from_json_slice(&bytes)
                    .map_err(|e| StorageError::Decode(format!("invalid transcript JSON: {}", e)))
            }
        }
    }
}
