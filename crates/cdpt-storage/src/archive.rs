use std::sync::Arc;

use cdpt_types::{chat_history_filename, most_recent, ChatHistory};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::encoding::PayloadEncoding;
use crate::error::{Result, StorageError};
use crate::traits::{FileRef, StorageGateway};

/// Which stored blob `load` returns
///
/// Exactly one strategy is active per archive. The two are not compatible:
/// `MostRecent` ignores the caller's identifier entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStrategy {
    /// Fetch `<identifier>_chatHistory.json` and return it newest first.
    #[default]
    ByIdentifier,
    /// Fetch the latest file in the shared public directory, in stored order.
    MostRecent,
}

/// Saves and loads chat transcripts through a [`StorageGateway`]
///
/// Holds no state between calls. Concurrent saves for one identifier race
/// at the gateway and the last write it observes wins.
pub struct ChatArchive {
    gateway: Arc<dyn StorageGateway>,
    strategy: LoadStrategy,
    encoding: PayloadEncoding,
}

impl ChatArchive {
    pub fn builder() -> ChatArchiveBuilder {
        ChatArchiveBuilder::new()
    }

    pub fn strategy(&self) -> LoadStrategy {
        self.strategy
    }

    pub fn encoding(&self) -> PayloadEncoding {
        self.encoding
    }

    /// Upload `history` for `identifier` and return the gateway receipt.
    pub async fn save(&self, identifier: &str, history: &ChatHistory) -> Result<Value> {
        validate_identifier(identifier)?;
        if history.is_empty() {
            return Err(StorageError::Validation(
                "chat history must contain at least one message".to_string(),
            ));
        }

        let filename = chat_history_filename(identifier);
        let contents = history
            .to_json_bytes()
            .map_err(|e| StorageError::Validation(format!("chat history is not serializable: {}", e)))?;

        tracing::info!(
            identifier,
            filename = %filename,
            messages = history.len(),
            "Saving chat history"
        );

        let receipt = self
            .gateway
            .upload(&filename, contents)
            .await
            .inspect_err(|e| tracing::error!(identifier, error = %e, "Failed to save chat history"))?;

        tracing::info!(identifier, "Chat history saved");
        Ok(receipt)
    }

    /// Load a transcript according to the configured [`LoadStrategy`].
    pub async fn load(&self, selector: &str) -> Result<ChatHistory> {
        let result = match self.strategy {
            LoadStrategy::ByIdentifier => self.load_by_identifier(selector).await,
            LoadStrategy::MostRecent => self.load_most_recent(selector).await,
        };

        result.inspect_err(|e| tracing::error!(selector, error = %e, "Failed to load chat history"))
    }

    async fn load_by_identifier(&self, identifier: &str) -> Result<ChatHistory> {
        validate_identifier(identifier)?;

        let filename = chat_history_filename(identifier);
        tracing::info!(identifier, filename = %filename, "Loading chat history");

        let body = self.gateway.download(FileRef::Name(&filename)).await?;
        let history = self.encoding.decode(&body)?.sorted_newest_first();

        tracing::info!(identifier, messages = history.len(), "Loaded chat history");
        Ok(history)
    }

    async fn load_most_recent(&self, selector: &str) -> Result<ChatHistory> {
        tracing::info!(selector, "Loading most recent chat history from public directory");

        let files = self.gateway.list_public_files().await?;
        let latest = most_recent(&files).ok_or_else(|| {
            StorageError::NotFound("no chat history files in the public directory".to_string())
        })?;

        tracing::debug!(
            file_id = %latest.id,
            updated_at = %latest.updated_at,
            candidates = files.len(),
            "Selected most recent file"
        );

        let body = self.gateway.download(FileRef::Id(&latest.id)).await?;
        let history = self.encoding.decode(&body)?;

        tracing::info!(file_id = %latest.id, messages = history.len(), "Loaded chat history");
        Ok(history)
    }
}

fn validate_identifier(identifier: &str) -> Result<()> {
    if identifier.trim().is_empty() {
        return Err(StorageError::Validation("identifier is required".to_string()));
    }
    if identifier.contains(['/', '\\']) || identifier.chars().any(char::is_control) {
        return Err(StorageError::Validation(format!(
            "identifier contains invalid characters: {:?}",
            identifier
        )));
    }
    Ok(())
}

pub struct ChatArchiveBuilder {
    gateway: Option<Arc<dyn StorageGateway>>,
    strategy: LoadStrategy,
    encoding: PayloadEncoding,
}

impl ChatArchiveBuilder {
    pub fn new() -> Self {
        Self {
            gateway: None,
            strategy: LoadStrategy::default(),
            encoding: PayloadEncoding::default(),
        }
    }

    pub fn gateway(mut self, gateway: Arc<dyn StorageGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn load_strategy(mut self, strategy: LoadStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn encoding(mut self, encoding: PayloadEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn build(self) -> Result<ChatArchive> {
        let gateway = self
            .gateway
            .ok_or_else(|| StorageError::Config("storage gateway is required".to_string()))?;

        Ok(ChatArchive {
            gateway,
            strategy: self.strategy,
            encoding: self.encoding,
        })
    }
}

impl Default for ChatArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_gateway() {
        let result = ChatArchive::builder().build();
        assert!(matches!(result, Err(StorageError::Config(_))));
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("123456789012345678").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("   ").is_err());
        assert!(validate_identifier("../etc").is_err());
        assert!(validate_identifier("a\nb").is_err());
    }

    #[test]
    fn test_strategy_serde_names() {
        let strategy: LoadStrategy = serde_json::from_str("\"most_recent\"").unwrap();
        assert_eq!(strategy, LoadStrategy::MostRecent);
        assert_eq!(LoadStrategy::default(), LoadStrategy::ByIdentifier);
    }
}
