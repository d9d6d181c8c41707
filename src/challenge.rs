//! Challenge construction and reshuffling.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::domain::{Challenge, ChallengeSource, Pair};

/// Build a challenge whose `terms` and `concepts` follow pair order.
pub fn challenge_from_pairs(prompt: &str, source: ChallengeSource, pairs: &[Pair]) -> Challenge {
  Challenge {
    id: Uuid::new_v4().to_string(),
    prompt: prompt.to_string(),
    source,
    terms: pairs.iter().map(|p| p.term.clone()).collect(),
    concepts: pairs.iter().map(|p| p.concept.clone()).collect(),
    answer_key: pairs.iter().map(|p| (p.term.clone(), p.concept.clone())).collect(),
  }
}

/// Independently permute `terms` and `concepts` in place. `answer_key` is untouched.
pub fn shuffle_in_place<R: Rng + ?Sized>(challenge: &mut Challenge, rng: &mut R) {
  challenge.terms.shuffle(rng);
  challenge.concepts.shuffle(rng);
}

/// A copy of `challenge` with freshly permuted terms and concepts.
pub fn reshuffle_with<R: Rng + ?Sized>(challenge: &Challenge, rng: &mut R) -> Challenge {
  let mut next = challenge.clone();
  shuffle_in_place(&mut next, rng);
  next
}

pub fn reshuffle(challenge: &Challenge) -> Challenge {
  reshuffle_with(challenge, &mut rand::thread_rng())
}

/// Structural check used on challenges arriving from clients.
pub fn is_consistent(challenge: &Challenge) -> bool {
  if challenge.terms.len() != challenge.answer_key.len() || challenge.concepts.len() != challenge.terms.len() {
    return false;
  }
  let unique: HashSet<String> = challenge.terms.iter().map(|t| t.to_lowercase()).collect();
  if unique.len() != challenge.terms.len() || challenge.terms.is_empty() {
    return false;
  }
  if !challenge.terms.iter().all(|t| challenge.answer_key.contains_key(t)) {
    return false;
  }
  let mut expected: Vec<&String> = challenge.answer_key.values().collect();
  let mut actual: Vec<&String> = challenge.concepts.iter().collect();
  expected.sort();
  actual.sort();
  expected == actual
}
