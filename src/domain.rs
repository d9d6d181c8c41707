//! Domain models: pairs, challenges and the settings of one generation request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Fewest pairs a playable challenge may hold.
pub const MIN_PAIRS: usize = 4;
/// Most pairs the player may request.
pub const MAX_PAIRS: usize = 10;
/// Concepts longer than this are cut with a trailing "...".
pub const MAX_CONCEPT_CHARS: usize = 220;

/// One term and its definitional concept, both already cleaned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
  pub term: String,
  pub concept: String,
}

impl Pair {
  pub fn new(term: impl Into<String>, concept: impl Into<String>) -> Self {
    Self { term: term.into(), concept: concept.into() }
  }
}

/// Where did the pairs of a challenge come from?
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeSource {
  Generated, // validated oracle output
  Fallback,  // built-in (or configured) fallback pairs
}

/// Terms, concepts and the answer key for one play-through.
///
/// `terms` and `concepts` are independently ordered; only `answer_key`
/// links a term to its concept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
  pub id: String,
  pub prompt: String,
  pub source: ChallengeSource,
  pub terms: Vec<String>,
  pub concepts: Vec<String>,
  pub answer_key: HashMap<String, String>,
}

/// Player-facing knobs for one "generate" action, after range checks.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
  pub prompt: String,
  pub pair_count: usize,
  pub model: String,
  pub auto_shuffle: bool,
}

/// Clamp a requested pair count into the supported range.
pub fn clamp_pair_count(requested: usize) -> usize {
  requested.clamp(MIN_PAIRS, MAX_PAIRS)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pair_count_is_clamped() {
    assert_eq!(clamp_pair_count(0), 4);
    assert_eq!(clamp_pair_count(7), 7);
    assert_eq!(clamp_pair_count(42), 10);
  }

  #[test]
  fn source_serializes_snake_case() {
    let s = serde_json::to_string(&ChallengeSource::Fallback).unwrap();
    assert_eq!(s, "\"fallback\"");
  }
}
