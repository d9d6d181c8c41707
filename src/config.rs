//! Loading game configuration (prompts, game defaults, feedback, fallback pairs) from TOML.
//!
//! Every section is optional; missing keys take the defaults below.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GameConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub game: GameDefaults,
  #[serde(default)]
  pub feedback: FeedbackCfg,
  #[serde(default)]
  pub fallback_pairs: Vec<PairCfg>,
}

/// Fallback pair entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct PairCfg {
  pub term: String,
  pub concept: String,
}

/// Prompts used to ask the oracle for pairs.
/// Placeholders: `{prompt}`, `{min_pairs}`, `{max_pairs}`, `{max_concept_chars}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub pair_system: String,
  pub pair_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      pair_system: "Você é um gerador de flashcards objetivos para concursos públicos no Brasil. Responda somente com JSON estrito.".into(),
      pair_user_template: "Tarefa: Dada a pergunta abaixo, gere entre {min_pairs} e {max_pairs} pares de \"term\" e \"concept\" curtos, corretos e não ambíguos.\n\
- Evite termos quase iguais entre si.\n\
- Conceitos devem ter 1–2 frases, no máximo ~{max_concept_chars} caracteres cada.\n\
- Responda exclusivamente em português do Brasil.\n\
- Saída ESTRITAMENTE em JSON no formato:\n\
[\n  {\"term\": \"Texto do termo\", \"concept\": \"Texto do conceito\"},\n  ...\n]\n\n\
Pergunta do usuário: \"{prompt}\"\n\
Somente JSON. Sem comentários, sem markdown, sem texto extra antes ou depois.".into(),
    }
  }
}

/// Defaults for the player-facing controls.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameDefaults {
  pub default_pair_count: usize,
  /// Selectable model ids; the first one is the default unless OPENAI_MODEL is set.
  pub models: Vec<String>,
  pub auto_shuffle: bool,
}

impl Default for GameDefaults {
  fn default() -> Self {
    Self {
      default_pair_count: 6,
      models: vec!["gpt-4o-mini".into(), "gpt-4o".into()],
      auto_shuffle: true,
    }
  }
}

/// Content knobs for the feedback modal.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FeedbackCfg {
  pub hints: Vec<String>,
  pub confetti_count: u32,
}

impl Default for FeedbackCfg {
  fn default() -> Self {
    Self {
      hints: vec![
        "Leia com calma os conceitos: identifique palavras-chave ⚡".into(),
        "Tente agrupar termos semelhantes e elimine os óbvios primeiro 🧠".into(),
        "Se pintar dúvida, use o gabarito para aprender e tente de novo 😉".into(),
      ],
      confetti_count: 80,
    }
  }
}

/// Parse a TOML document into `GameConfig`.
pub fn parse_game_config(s: &str) -> Result<GameConfig, toml::de::Error> {
  toml::from_str::<GameConfig>(s)
}

/// Attempt to load `GameConfig` from GAME_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_game_config_from_env() -> Option<GameConfig> {
  let path = std::env::var("GAME_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_game_config(&s) {
      Ok(cfg) => {
        info!(target: "termatch_backend", %path, fallback_pairs = cfg.fallback_pairs.len(), "Loaded game config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "termatch_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "termatch_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_yields_defaults() {
    let cfg = parse_game_config("").unwrap();
    assert_eq!(cfg.game.default_pair_count, 6);
    assert!(cfg.game.auto_shuffle);
    assert_eq!(cfg.feedback.hints.len(), 3);
    assert_eq!(cfg.feedback.confetti_count, 80);
    assert!(cfg.fallback_pairs.is_empty());
    assert!(cfg.prompts.pair_user_template.contains("{prompt}"));
  }

  #[test]
  fn example_config_parses() {
    let cfg = parse_game_config(include_str!("../config/game.example.toml")).unwrap();
    assert_eq!(cfg.fallback_pairs.len(), 5);
    assert_eq!(cfg.game.models[0], "gpt-4o-mini");
    assert!(cfg.prompts.pair_user_template.contains("{max_pairs}"));
  }

  #[test]
  fn partial_sections_keep_other_defaults() {
    let doc = r#"
      [game]
      auto_shuffle = false

      [feedback]
      hints = ["Respire fundo."]

      [[fallback_pairs]]
      term = "Sol"
      concept = "Estrela central."
    "#;
    let cfg = parse_game_config(doc).unwrap();
    assert!(!cfg.game.auto_shuffle);
    assert_eq!(cfg.game.default_pair_count, 6);
    assert_eq!(cfg.feedback.hints, vec!["Respire fundo.".to_string()]);
    assert_eq!(cfg.feedback.confetti_count, 80);
    assert_eq!(cfg.fallback_pairs.len(), 1);
    assert_eq!(cfg.fallback_pairs[0].term, "Sol");
  }
}
