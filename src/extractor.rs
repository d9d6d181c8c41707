//! Pair extraction from raw model output.
//!
//! Flow:
//! 1) Locate the first `[ { ... } ]` block in the completion (models like to
//!    wrap JSON in prose or markdown fences).
//! 2) Decode it as a list of records carrying `term` and `concept`.
//! 3) Clean each record, drop empties and case-insensitive duplicate terms,
//!    cap concept length.
//! 4) Require at least `MIN_PAIRS` survivors.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::domain::{Pair, MAX_CONCEPT_CHARS, MIN_PAIRS};
use crate::error::ExtractionError;
use crate::util::{clean_text, truncate_with_ellipsis};

/// Non-greedy: stops at the first `}` followed by `]`.
const BLOCK_PATTERN: &str = r"(?s)\[\s*\{.*?\}\s*\]";

fn block_regex() -> Option<&'static Regex> {
  static RE: OnceLock<Option<Regex>> = OnceLock::new();
  RE.get_or_init(|| Regex::new(BLOCK_PATTERN).ok()).as_ref()
}

/// One record as the model wrote it. Other fields are ignored; a missing or
/// `null` field reads as empty and only drops its own record.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRecord {
  pub term: Option<String>,
  pub termo: Option<String>,
  pub concept: Option<String>,
  pub conceito: Option<String>,
}

impl RawRecord {
  /// English keys win when both spellings are present.
  pub fn into_fields(self) -> (String, String) {
    (
      self.term.or(self.termo).unwrap_or_default(),
      self.concept.or(self.conceito).unwrap_or_default(),
    )
  }
}

/// Find the first structured block inside `raw`.
pub fn find_block(raw: &str) -> Result<&str, ExtractionError> {
  block_regex()
    .and_then(|re| re.find(raw))
    .map(|m| m.as_str())
    .ok_or(ExtractionError::NoStructuredBlockFound)
}

/// Decode a block into raw records.
pub fn decode_block(block: &str) -> Result<Vec<RawRecord>, ExtractionError> {
  serde_json::from_str::<Vec<RawRecord>>(block)
    .map_err(|e| ExtractionError::MalformedStructure(e.to_string()))
}

/// Clean, deduplicate and cap records, keeping encounter order.
/// Shared with configured fallback pairs so both go through the same rules.
pub fn clean_records<I>(records: I) -> Vec<Pair>
where
  I: IntoIterator<Item = (String, String)>,
{
  let mut seen = HashSet::new();
  let mut pairs = Vec::new();
  for (term, concept) in records {
    let term = clean_text(&term);
    let concept = clean_text(&concept);
    if term.is_empty() || concept.is_empty() {
      continue;
    }
    if !seen.insert(term.to_lowercase()) {
      continue;
    }
    pairs.push(Pair { term, concept: truncate_with_ellipsis(&concept, MAX_CONCEPT_CHARS) });
  }
  pairs
}

/// Turn a raw completion into validated pairs.
///
/// `max_expected` is what the oracle was asked for; it is only used for
/// diagnostics, the oracle's own count is never truncated here.
pub fn extract(raw: &str, max_expected: usize) -> Result<Vec<Pair>, ExtractionError> {
  let block = find_block(raw)?;
  let records = decode_block(block)?;
  let received = records.len();
  let pairs = clean_records(records.into_iter().map(RawRecord::into_fields));

  if pairs.len() < MIN_PAIRS {
    return Err(ExtractionError::InsufficientPairs { found: pairs.len(), required: MIN_PAIRS });
  }
  if pairs.len() > max_expected {
    tracing::debug!(target: "challenge", received, kept = pairs.len(), max_expected, "Model returned more pairs than requested");
  }
  Ok(pairs)
}
