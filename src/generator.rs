//! Challenge generation: one oracle call, then pair extraction.
//!
//! The generator either returns a validated challenge or a classified
//! `GenerationError`. Substituting fallback pairs is the caller's decision
//! (see `logic::generate_challenge`).

use std::time::Instant;

use tracing::{error, info, instrument};

use crate::challenge::challenge_from_pairs;
use crate::config::Prompts;
use crate::domain::{Challenge, ChallengeSource, Pair, MAX_CONCEPT_CHARS, MIN_PAIRS};
use crate::error::GenerationError;
use crate::extractor::extract;
use crate::oracle::TextOracle;
use crate::util::{fill_template, trunc_for_log};

/// Build the single instruction sent to the oracle.
pub fn build_instruction(prompts: &Prompts, prompt: &str, pair_count: usize) -> String {
  let max_pairs = pair_count.to_string();
  let min_pairs = MIN_PAIRS.to_string();
  let max_chars = MAX_CONCEPT_CHARS.to_string();
  let bounded = fill_template(
    &prompts.pair_user_template,
    &[
      ("min_pairs", &min_pairs),
      ("max_pairs", &max_pairs),
      ("max_concept_chars", &max_chars),
    ],
  );
  // Player text goes in last so braces inside it stay literal.
  fill_template(&bounded, &[("prompt", prompt)])
}

pub struct ChallengeGenerator<'a> {
  oracle: &'a dyn TextOracle,
  prompts: &'a Prompts,
}

impl<'a> ChallengeGenerator<'a> {
  pub fn new(oracle: &'a dyn TextOracle, prompts: &'a Prompts) -> Self {
    Self { oracle, prompts }
  }

  /// Ask the oracle for pairs and validate them.
  #[instrument(level = "info", skip(self, prompt), fields(prompt_len = prompt.len(), %pair_count, %model))]
  pub async fn generate_pairs(
    &self,
    prompt: &str,
    pair_count: usize,
    model: &str,
  ) -> Result<Vec<Pair>, GenerationError> {
    let instruction = build_instruction(self.prompts, prompt, pair_count);
    let start = Instant::now();
    let raw = self.oracle.complete(model, &instruction).await?;
    let elapsed = start.elapsed();

    match extract(&raw, pair_count) {
      Ok(pairs) => {
        info!(target: "challenge", ?elapsed, pairs = pairs.len(), "Pairs extracted from model response");
        Ok(pairs)
      }
      Err(e) => {
        error!(target: "challenge", ?elapsed, error = %e, raw = %trunc_for_log(&raw, 200), "Model response rejected");
        Err(e.into())
      }
    }
  }

  /// Generate a fresh challenge; `terms` and `concepts` follow pair order.
  pub async fn generate(
    &self,
    prompt: &str,
    pair_count: usize,
    model: &str,
  ) -> Result<Challenge, GenerationError> {
    let pairs = self.generate_pairs(prompt, pair_count, model).await?;
    Ok(challenge_from_pairs(prompt, ChallengeSource::Generated, &pairs))
  }
}
