//! Error taxonomy for challenge generation and the match board.
//!
//! Generation errors never reach the player as hard failures: `logic` turns
//! every one of them into the fallback challenge plus a warning.

use thiserror::Error;

/// Failure talking to the text oracle (transport, auth, quota, empty reply).
#[derive(Debug, Error)]
pub enum OracleError {
  #[error("oracle transport error: {0}")]
  Transport(String),

  #[error("oracle HTTP {status}: {message}")]
  Http { status: u16, message: String },

  #[error("oracle returned an empty completion")]
  EmptyCompletion,
}

/// Reasons the pair extractor rejects a raw completion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
  #[error("no structured block found in model response")]
  NoStructuredBlockFound,

  #[error("malformed structured block: {0}")]
  MalformedStructure(String),

  #[error("only {found} valid pairs (need at least {required})")]
  InsufficientPairs { found: usize, required: usize },
}

/// Classified failure of one generation attempt.
#[derive(Debug, Error)]
pub enum GenerationError {
  #[error("oracle unavailable: {0}")]
  OracleUnavailable(#[from] OracleError),

  #[error(transparent)]
  Extraction(#[from] ExtractionError),
}

impl GenerationError {
  /// Stable short label, used in logs and in the warning sent to the client.
  pub fn kind(&self) -> &'static str {
    match self {
      GenerationError::OracleUnavailable(_) => "oracle_unavailable",
      GenerationError::Extraction(ExtractionError::NoStructuredBlockFound) => "no_structured_block_found",
      GenerationError::Extraction(ExtractionError::MalformedStructure(_)) => "malformed_structure",
      GenerationError::Extraction(ExtractionError::InsufficientPairs { .. }) => "insufficient_pairs",
    }
  }
}

/// Contract violation on board ids. Only reachable from a misbehaving client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
  #[error("unknown term id {0}")]
  UnknownTerm(usize),

  #[error("unknown slot id {0}")]
  UnknownSlot(usize),

  #[error("no active challenge; generate one first")]
  NoActiveChallenge,
}
