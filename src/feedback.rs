//! Feedback modal content chosen from a score.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::board::ScoreResult;
use crate::config::FeedbackCfg;

const SUCCESS_TITLE: &str = "🎉 Parabéns! Resultado Perfeito";
const SUCCESS_TIP: &str = "Dica: tente aumentar a velocidade mantendo a precisão — você está pronto para o próximo nível! 🚀";
const ENCOURAGE_TITLE: &str = "💪 Quase lá!";
const RETRY_LABEL: &str = "Tentar novamente";

/// What the rendering shell shows after an evaluation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum FeedbackView {
  Success {
    title: String,
    message: String,
    #[serde(rename = "progressPercent")]
    progress_percent: f64,
    tip: String,
    /// Decorative particle burst size.
    #[serde(rename = "confettiCount")]
    confetti_count: u32,
  },
  Encouragement {
    title: String,
    message: String,
    #[serde(rename = "progressPercent")]
    progress_percent: f64,
    hint: String,
    #[serde(rename = "retryLabel")]
    retry_label: String,
  },
}

impl FeedbackView {
  pub fn is_success(&self) -> bool {
    matches!(self, FeedbackView::Success { .. })
  }
}

#[derive(Clone, Debug)]
pub struct FeedbackPresenter {
  hints: Vec<String>,
  confetti_count: u32,
}

impl FeedbackPresenter {
  /// Empty hint pools fall back to the built-in hints.
  pub fn new(cfg: &FeedbackCfg) -> Self {
    let hints: Vec<String> = cfg.hints.iter().map(|h| h.trim().to_string()).filter(|h| !h.is_empty()).collect();
    let hints = if hints.is_empty() { FeedbackCfg::default().hints } else { hints };
    Self { hints, confetti_count: cfg.confetti_count }
  }

  pub fn hints(&self) -> &[String] {
    &self.hints
  }

  pub fn present(&self, score: &ScoreResult) -> FeedbackView {
    self.present_with(score, &mut rand::thread_rng())
  }

  /// Pick the view for `score`; only the encouragement hint uses `rng`.
  pub fn present_with<R: Rng + ?Sized>(&self, score: &ScoreResult, rng: &mut R) -> FeedbackView {
    let counts = format!("{} / {}", score.correct_count, score.total);
    let rounded = score.percent.round();
    if score.is_perfect() {
      FeedbackView::Success {
        title: SUCCESS_TITLE.into(),
        message: format!("Você acertou {} ({}%). Excelente!", counts, rounded),
        progress_percent: 100.0,
        tip: SUCCESS_TIP.into(),
        confetti_count: self.confetti_count,
      }
    } else {
      let hint = self.hints.choose(rng).cloned().unwrap_or_default();
      FeedbackView::Encouragement {
        title: ENCOURAGE_TITLE.into(),
        message: format!("Você acertou {} ({}%). Continue — cada tentativa reforça a memória!", counts, rounded),
        progress_percent: score.percent.clamp(0.0, 100.0),
        hint: format!("Sugestão: {}", hint),
        retry_label: RETRY_LABEL.into(),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn presenter() -> FeedbackPresenter {
    FeedbackPresenter::new(&FeedbackCfg::default())
  }

  #[test]
  fn perfect_score_celebrates() {
    let view = presenter().present(&ScoreResult::new(5, 5));
    match view {
      FeedbackView::Success { message, progress_percent, confetti_count, .. } => {
        assert_eq!(message, "Você acertou 5 / 5 (100%). Excelente!");
        assert_eq!(progress_percent, 100.0);
        assert_eq!(confetti_count, 80);
      }
      other => panic!("expected success, got {other:?}"),
    }
  }

  #[test]
  fn partial_score_encourages_with_pool_hint() {
    let p = presenter();
    let mut rng = StdRng::seed_from_u64(1);
    let view = p.present_with(&ScoreResult::new(4, 5), &mut rng);
    match view {
      FeedbackView::Encouragement { message, progress_percent, hint, retry_label, .. } => {
        assert!(message.starts_with("Você acertou 4 / 5 (80%)."));
        assert_eq!(progress_percent, 80.0);
        let tip = hint.strip_prefix("Sugestão: ").unwrap();
        assert!(p.hints().iter().any(|h| h == tip));
        assert_eq!(retry_label, "Tentar novamente");
      }
      other => panic!("expected encouragement, got {other:?}"),
    }
  }

  #[test]
  fn zero_total_is_not_success() {
    assert!(!presenter().present(&ScoreResult::new(0, 0)).is_success());
  }

  #[test]
  fn every_hint_is_eventually_chosen() {
    let p = presenter();
    let mut rng = StdRng::seed_from_u64(42);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
      if let FeedbackView::Encouragement { hint, .. } = p.present_with(&ScoreResult::new(1, 5), &mut rng) {
        seen.insert(hint);
      }
    }
    assert_eq!(seen.len(), p.hints().len());
  }

  #[test]
  fn blank_hint_pool_uses_defaults() {
    let cfg = FeedbackCfg { hints: vec!["  ".into()], confetti_count: 10 };
    let p = FeedbackPresenter::new(&cfg);
    assert_eq!(p.hints().len(), 3);
  }

  #[test]
  fn view_serializes_with_tag() {
    let v = serde_json::to_value(presenter().present(&ScoreResult::new(2, 2))).unwrap();
    assert_eq!(v["view"], "success");
    assert_eq!(v["confettiCount"], 80);
  }
}
