//! The text oracle seam: instruction in, free text out.

use async_trait::async_trait;

use crate::error::OracleError;

/// Opaque text-completion service. Only "text" or "failed" matter to callers.
#[async_trait]
pub trait TextOracle: Send + Sync {
  /// One blocking round-trip; no retries at this layer.
  async fn complete(&self, model: &str, instruction: &str) -> Result<String, OracleError>;

  /// Short label for logs (e.g. the base URL).
  fn describe(&self) -> String;
}
