//! Application state: configuration, fallback pairs, feedback presenter and the optional oracle.
//!
//! This is read-only after startup and shared by all connections. Game
//! progress never lives here; each WebSocket connection owns its `Session`.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::{load_game_config_from_env, GameConfig, GameDefaults, Prompts};
use crate::domain::{clamp_pair_count, Pair};
use crate::feedback::FeedbackPresenter;
use crate::openai::OpenAI;
use crate::oracle::TextOracle;
use crate::seeds::resolve_fallback_pairs;

const FALLBACK_MODEL: &str = "gpt-4o-mini";

#[derive(Clone)]
pub struct AppState {
  pub oracle: Option<Arc<dyn TextOracle>>,
  pub prompts: Prompts,
  pub game: GameDefaults,
  pub default_model: String,
  pub fallback_pairs: Vec<Pair>,
  pub presenter: FeedbackPresenter,
}

impl AppState {
  /// Build state from env: load config, resolve fallback pairs, init the OpenAI oracle.
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Self {
    let cfg = load_game_config_from_env().unwrap_or_default();

    let openai = OpenAI::from_env(&cfg.prompts.pair_system);
    let env_model = openai.as_ref().and_then(|oa| oa.default_model.clone());
    let oracle: Option<Arc<dyn TextOracle>> = match openai {
      Some(oa) => {
        info!(target: "termatch_backend", backend = %oa.describe(), "Oracle enabled.");
        Some(Arc::new(oa))
      }
      None => {
        info!(target: "termatch_backend", "Oracle disabled (no OPENAI_API_KEY). Every challenge uses fallback pairs.");
        None
      }
    };

    Self::from_parts(cfg, oracle, env_model)
  }

  /// Assemble state from already-loaded parts. `env_model` wins over the config's model list.
  pub fn from_parts(cfg: GameConfig, oracle: Option<Arc<dyn TextOracle>>, env_model: Option<String>) -> Self {
    let GameConfig { prompts, mut game, feedback, fallback_pairs } = cfg;

    game.default_pair_count = clamp_pair_count(game.default_pair_count);
    let default_model = env_model
      .or_else(|| game.models.first().cloned())
      .unwrap_or_else(|| FALLBACK_MODEL.to_string());
    if !game.models.contains(&default_model) {
      game.models.insert(0, default_model.clone());
    }

    let fallback_pairs = resolve_fallback_pairs(&fallback_pairs);
    info!(target: "challenge", fallback_pairs = fallback_pairs.len(), %default_model, default_pair_count = game.default_pair_count, "Game defaults ready");
    let presenter = FeedbackPresenter::new(&feedback);
    info!(target: "challenge", hints = presenter.hints().len(), confetti = feedback.confetti_count, "Feedback presenter ready");

    Self {
      oracle,
      prompts,
      game,
      default_model,
      fallback_pairs,
      presenter,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::parse_game_config;

  #[test]
  fn env_model_is_default_and_listed() {
    let st = AppState::from_parts(GameConfig::default(), None, Some("llama-3".into()));
    assert_eq!(st.default_model, "llama-3");
    assert_eq!(st.game.models[0], "llama-3");
    assert!(st.oracle.is_none());
  }

  #[test]
  fn first_configured_model_is_default() {
    let st = AppState::from_parts(GameConfig::default(), None, None);
    assert_eq!(st.default_model, "gpt-4o-mini");
    assert_eq!(st.game.models.len(), 2);
  }

  #[test]
  fn out_of_range_default_pair_count_is_clamped() {
    let cfg = parse_game_config("[game]\ndefault_pair_count = 50\nmodels = []").unwrap();
    let st = AppState::from_parts(cfg, None, None);
    assert_eq!(st.game.default_pair_count, 10);
    assert_eq!(st.default_model, FALLBACK_MODEL);
    assert_eq!(st.fallback_pairs.len(), 5);
  }
}
