//! Built-in fallback pairs that guarantee a playable challenge
//! even without an oracle or when generation fails.

use tracing::warn;

use crate::config::PairCfg;
use crate::domain::Pair;
use crate::extractor::clean_records;

/// Fewest pairs a configured fallback set must keep after cleaning.
pub const MIN_FALLBACK_PAIRS: usize = 5;

/// Principles of Brazilian public administration (LIMPE).
pub fn fallback_pairs() -> Vec<Pair> {
  vec![
    Pair::new("Legalidade", "A administração só pode agir conforme a lei."),
    Pair::new("Impessoalidade", "Os atos devem visar ao interesse público, sem favorecimento."),
    Pair::new("Moralidade", "Os atos devem respeitar princípios éticos."),
    Pair::new("Publicidade", "Os atos devem ser transparentes e acessíveis."),
    Pair::new("Eficiência", "Os serviços devem ser prestados de forma adequada e rápida."),
  ]
}

/// Use configured pairs when enough of them survive cleaning; otherwise the built-in set.
pub fn resolve_fallback_pairs(configured: &[PairCfg]) -> Vec<Pair> {
  if configured.is_empty() {
    return fallback_pairs();
  }
  let cleaned = clean_records(configured.iter().map(|p| (p.term.clone(), p.concept.clone())));
  if cleaned.len() < MIN_FALLBACK_PAIRS {
    warn!(target: "challenge", configured = configured.len(), usable = cleaned.len(), "Configured fallback pairs too few after cleaning; using built-in set");
    return fallback_pairs();
  }
  cleaned
}
