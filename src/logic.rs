//! Core behaviors shared by HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Resolving player settings into a `GenerationRequest`
//!   - Generating a challenge with the fallback policy
//!   - Auto-shuffling fresh challenges

use tracing::{error, info, instrument, warn};

use crate::challenge::{challenge_from_pairs, shuffle_in_place};
use crate::domain::{clamp_pair_count, Challenge, ChallengeSource, GenerationRequest};
use crate::generator::ChallengeGenerator;
use crate::state::AppState;

/// A challenge ready to play, plus a non-blocking warning when fallback pairs were used.
#[derive(Debug, Clone)]
pub struct GeneratedChallenge {
  pub challenge: Challenge,
  pub warning: Option<String>,
}

/// Fill unset settings from defaults and range-check the pair count.
pub fn resolve_request(
  state: &AppState,
  prompt: &str,
  pair_count: Option<usize>,
  model: Option<String>,
  auto_shuffle: Option<bool>,
) -> GenerationRequest {
  GenerationRequest {
    prompt: prompt.trim().to_string(),
    pair_count: clamp_pair_count(pair_count.unwrap_or(state.game.default_pair_count)),
    model: model
      .map(|m| m.trim().to_string())
      .filter(|m| !m.is_empty())
      .unwrap_or_else(|| state.default_model.clone()),
    auto_shuffle: auto_shuffle.unwrap_or(state.game.auto_shuffle),
  }
}

pub fn fallback_challenge(state: &AppState, prompt: &str) -> Challenge {
  challenge_from_pairs(prompt, ChallengeSource::Fallback, &state.fallback_pairs)
}

/// Generate a challenge; any failure (or a missing oracle / empty prompt)
/// yields the fallback pairs and a warning. Always returns a playable challenge.
#[instrument(level = "info", skip(state, req), fields(prompt_len = req.prompt.len(), pair_count = req.pair_count, model = %req.model))]
pub async fn generate_challenge(state: &AppState, req: &GenerationRequest) -> GeneratedChallenge {
  let (mut challenge, warning) = match (&state.oracle, req.prompt.is_empty()) {
    (None, _) => {
      warn!(target: "challenge", "No oracle configured; using fallback pairs");
      (fallback_challenge(state, &req.prompt), Some("Sem oráculo configurado (OPENAI_API_KEY). Usando exemplo padrão.".to_string()))
    }
    (Some(_), true) => {
      warn!(target: "challenge", "Empty prompt; using fallback pairs");
      (fallback_challenge(state, &req.prompt), Some("Digite uma pergunta antes de gerar. Usando exemplo padrão.".to_string()))
    }
    (Some(oracle), false) => {
      let generator = ChallengeGenerator::new(oracle.as_ref(), &state.prompts);
      match generator.generate(&req.prompt, req.pair_count, &req.model).await {
        Ok(c) => {
          info!(target: "challenge", id = %c.id, pairs = c.terms.len(), source = "generated", "Generated fresh challenge");
          (c, None)
        }
        Err(e) => {
          error!(target: "challenge", kind = e.kind(), error = %e, "Generation failed; using fallback pairs");
          (fallback_challenge(state, &req.prompt), Some(format!("Falha ao gerar desafio ({}). Usando exemplo padrão.", e)))
        }
      }
    }
  };

  if req.auto_shuffle {
    shuffle_in_place(&mut challenge, &mut rand::thread_rng());
  }

  GeneratedChallenge { challenge, warning }
}
