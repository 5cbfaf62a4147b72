use serde_json::Value;

use crate::error::{ProviderError, Result};

/// Read a provider response as JSON.
///
/// Non-success statuses become `Upstream` with the body kept as text so the
/// API layer can forward it unchanged.
pub(crate) async fn read_json(
    response: reqwest::Response,
    provider: &'static str,
    operation: &str,
) -> Result<Value> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let body = String::from_utf8_lossy(&body).into_owned();
        tracing::error!(
            provider,
            operation,
            status = status.as_u16(),
            body = %body,
            "Provider request failed"
        );
        return Err(ProviderError::Upstream {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    let value = serde_json::from_slice(&body).map_err(|e| ProviderError::Decode {
        provider,
        message: e.to_string(),
    })?;

    tracing::debug!(provider, operation, status = status.as_u16(), "Provider request successful");
    Ok(value)
}
