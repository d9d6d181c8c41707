//! Match board: the per-session game engine.
//!
//! Terms are identified by their index in `Challenge::terms`, slots by their
//! index in `Challenge::concepts`. Every term is either in the unplaced pool
//! or in exactly one slot; a slot holds at most one term. All operations are
//! synchronous and keep those two views (`slots` and `placed_in`) in lockstep.

use serde::Serialize;
use tracing::debug;

use crate::domain::Challenge;
use crate::error::BoardError;

pub type TermId = usize;
pub type SlotId = usize;

/// Where a term currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TermState {
  Unplaced,
  Placed(SlotId),
}

/// Presentation marker set by `evaluate`, cleared by any change to the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotMark {
  Unmarked,
  Correct,
  Incorrect,
}

/// Derived score; recomputed on every evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoreResult {
  #[serde(rename = "correctCount")]
  pub correct_count: usize,
  pub total: usize,
  pub percent: f64,
}

impl ScoreResult {
  pub fn new(correct_count: usize, total: usize) -> Self {
    let percent = if total == 0 { 0.0 } else { correct_count as f64 * 100.0 / total as f64 };
    Self { correct_count, total, percent }
  }

  pub fn is_perfect(&self) -> bool {
    self.total > 0 && self.correct_count == self.total
  }

  /// Score line shown in the toolbar.
  pub fn banner(&self) -> String {
    format!("Pontuação: {} / {}", self.correct_count, self.total)
  }
}

#[derive(Clone, Debug)]
pub struct MatchBoard {
  challenge: Challenge,
  /// Unplaced terms, head first.
  pool: Vec<TermId>,
  slots: Vec<Option<TermId>>,
  placed_in: Vec<Option<SlotId>>,
  marks: Vec<SlotMark>,
}

impl MatchBoard {
  /// Fresh board: every term unplaced, in challenge order.
  pub fn new(challenge: Challenge) -> Self {
    let terms = challenge.terms.len();
    let slots = challenge.concepts.len();
    Self {
      challenge,
      pool: (0..terms).collect(),
      slots: vec![None; slots],
      placed_in: vec![None; terms],
      marks: vec![SlotMark::Unmarked; slots],
    }
  }

  pub fn challenge(&self) -> &Challenge {
    &self.challenge
  }

  pub fn pool(&self) -> &[TermId] {
    &self.pool
  }

  pub fn slot_count(&self) -> usize {
    self.slots.len()
  }

  pub fn term_text(&self, term: TermId) -> Option<&str> {
    self.challenge.terms.get(term).map(String::as_str)
  }

  pub fn concept_text(&self, slot: SlotId) -> Option<&str> {
    self.challenge.concepts.get(slot).map(String::as_str)
  }

  pub fn slot_term(&self, slot: SlotId) -> Option<TermId> {
    self.slots.get(slot).copied().flatten()
  }

  pub fn mark(&self, slot: SlotId) -> SlotMark {
    self.marks.get(slot).copied().unwrap_or(SlotMark::Unmarked)
  }

  pub fn term_state(&self, term: TermId) -> TermState {
    match self.placed_in.get(term).copied().flatten() {
      Some(slot) => TermState::Placed(slot),
      None => TermState::Unplaced,
    }
  }

  fn check_term(&self, term: TermId) -> Result<(), BoardError> {
    if term < self.placed_in.len() { Ok(()) } else { Err(BoardError::UnknownTerm(term)) }
  }

  fn check_slot(&self, slot: SlotId) -> Result<(), BoardError> {
    if slot < self.slots.len() { Ok(()) } else { Err(BoardError::UnknownSlot(slot)) }
  }

  /// Put `term` into `slot`. A term already placed elsewhere moves; a
  /// different term occupying `slot` is evicted to the head of the pool.
  pub fn place(&mut self, term: TermId, slot: SlotId) -> Result<(), BoardError> {
    self.check_term(term)?;
    self.check_slot(slot)?;
    self.place_unchecked(term, slot);
    debug!(target: "board", term, slot, "Term placed");
    Ok(())
  }

  fn place_unchecked(&mut self, term: TermId, slot: SlotId) {
    match self.placed_in[term] {
      Some(current) if current == slot => return,
      Some(previous) => {
        self.slots[previous] = None;
        self.marks[previous] = SlotMark::Unmarked;
      }
      None => self.pool.retain(|&t| t != term),
    }

    if let Some(evicted) = self.slots[slot].take() {
      self.placed_in[evicted] = None;
      self.pool.insert(0, evicted);
    }

    self.slots[slot] = Some(term);
    self.placed_in[term] = Some(slot);
    self.marks[slot] = SlotMark::Unmarked;
  }

  /// Take `term` out of its slot, back to the head of the pool. No-op if unplaced.
  pub fn remove(&mut self, term: TermId) -> Result<(), BoardError> {
    self.check_term(term)?;
    if let TermState::Placed(slot) = self.term_state(term) {
      self.placed_in[term] = None;
      self.slots[slot] = None;
      self.marks[slot] = SlotMark::Unmarked;
      self.pool.insert(0, term);
      debug!(target: "board", term, slot, "Term removed");
    }
    Ok(())
  }

  /// Score without touching markers.
  pub fn score(&self) -> ScoreResult {
    let correct = (0..self.slots.len()).filter(|&slot| self.is_correct(slot) == Some(true)).count();
    ScoreResult::new(correct, self.slots.len())
  }

  /// `Some(true|false)` for an occupied slot, `None` for an empty one.
  fn is_correct(&self, slot: SlotId) -> Option<bool> {
    let term = self.slots[slot]?;
    let expected = self.challenge.answer_key.get(&self.challenge.terms[term]);
    Some(expected == Some(&self.challenge.concepts[slot]))
  }

  /// Score the current placements and mark each occupied slot.
  /// Empty slots stay unmarked and count as not correct.
  pub fn evaluate(&mut self) -> ScoreResult {
    for slot in 0..self.slots.len() {
      self.marks[slot] = match self.is_correct(slot) {
        Some(true) => SlotMark::Correct,
        Some(false) => SlotMark::Incorrect,
        None => SlotMark::Unmarked,
      };
    }
    let score = self.score();
    debug!(target: "board", correct = score.correct_count, total = score.total, "Board evaluated");
    score
  }

  /// Return every placed term to the pool and clear markers.
  ///
  /// Slots are emptied in slot order and each term is pushed to the pool
  /// head, so the last slot's term ends up first.
  pub fn reset(&mut self) {
    for slot in 0..self.slots.len() {
      if let Some(term) = self.slots[slot].take() {
        self.placed_in[term] = None;
        self.pool.insert(0, term);
      }
    }
    self.marks.fill(SlotMark::Unmarked);
    debug!(target: "board", pool = self.pool.len(), "Board reset");
  }

  /// Force the answer-key layout onto the board, then evaluate it.
  ///
  /// For each slot the first term (in challenge term order) whose answer
  /// matches the slot's concept text is placed there.
  pub fn reveal(&mut self) -> ScoreResult {
    self.reset();
    for slot in 0..self.slots.len() {
      let concept = &self.challenge.concepts[slot];
      let found = self
        .challenge
        .terms
        .iter()
        .position(|t| self.challenge.answer_key.get(t) == Some(concept));
      if let Some(term) = found {
        self.place_unchecked(term, slot);
      }
    }
    self.evaluate()
  }

  /// Give the challenge back (e.g. to reshuffle it); placements are dropped.
  pub fn into_challenge(self) -> Challenge {
    self.challenge
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::challenge::{challenge_from_pairs, reshuffle_with};
  use crate::domain::{ChallengeSource, Pair};
  use crate::seeds::fallback_pairs;
  use pretty_assertions::assert_eq;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn board() -> MatchBoard {
    MatchBoard::new(challenge_from_pairs("p", ChallengeSource::Fallback, &fallback_pairs()))
  }

  /// Slot holding the concept that belongs to `term`.
  fn slot_for(b: &MatchBoard, term: TermId) -> SlotId {
    let text = b.term_text(term).unwrap();
    let concept = &b.challenge().answer_key[text];
    b.challenge().concepts.iter().position(|c| c == concept).unwrap()
  }

  fn assert_consistent(b: &MatchBoard) {
    let n = b.challenge().terms.len();
    for term in 0..n {
      let in_pool = b.pool().iter().filter(|&&t| t == term).count();
      let in_slots = (0..b.slot_count()).filter(|&s| b.slot_term(s) == Some(term)).count();
      assert_eq!(in_pool + in_slots, 1, "term {term} referenced {} times", in_pool + in_slots);
      match b.term_state(term) {
        TermState::Placed(s) => assert_eq!(b.slot_term(s), Some(term)),
        TermState::Unplaced => assert_eq!(in_pool, 1),
      }
    }
  }

  #[test]
  fn new_board_has_everything_unplaced() {
    let mut b = board();
    assert_eq!(b.pool(), &[0, 1, 2, 3, 4]);
    assert!((0..5).all(|t| b.term_state(t) == TermState::Unplaced));
    let score = b.evaluate();
    assert_eq!(score, ScoreResult::new(0, 5));
    assert_eq!(b.mark(0), SlotMark::Unmarked);
  }

  #[test]
  fn perfect_then_one_removed() {
    let mut b = board();
    for term in 0..5 {
      let slot = slot_for(&b, term);
      b.place(term, slot).unwrap();
    }
    let score = b.evaluate();
    assert_eq!(score.correct_count, 5);
    assert_eq!(score.total, 5);
    assert_eq!(score.percent, 100.0);
    assert!(score.is_perfect());
    assert_eq!(score.banner(), "Pontuação: 5 / 5");
    assert!((0..5).all(|s| b.mark(s) == SlotMark::Correct));

    b.remove(2).unwrap();
    let score = b.evaluate();
    assert_eq!((score.correct_count, score.total, score.percent), (4, 5, 80.0));
    assert!(!score.is_perfect());
    assert_eq!(b.pool(), &[2]);
  }

  #[test]
  fn wrong_placement_is_marked_incorrect() {
    let mut b = board();
    let wrong = slot_for(&b, 1);
    b.place(0, wrong).unwrap();
    let score = b.evaluate();
    assert_eq!(score.correct_count, 0);
    assert_eq!(b.mark(wrong), SlotMark::Incorrect);
  }

  #[test]
  fn moving_a_term_vacates_the_previous_slot() {
    let mut b = board();
    b.place(3, 0).unwrap();
    b.place(3, 1).unwrap();
    assert_eq!(b.slot_term(0), None);
    assert_eq!(b.slot_term(1), Some(3));
    assert_eq!(b.term_state(3), TermState::Placed(1));
    assert_consistent(&b);
  }

  #[test]
  fn occupied_slot_evicts_to_pool_head() {
    let mut b = board();
    b.place(0, 2).unwrap();
    b.place(4, 2).unwrap();
    assert_eq!(b.slot_term(2), Some(4));
    assert_eq!(b.term_state(0), TermState::Unplaced);
    assert_eq!(b.pool(), &[0, 1, 2, 3]);
    assert_consistent(&b);
  }

  #[test]
  fn moving_onto_occupied_slot_swaps_nothing_else() {
    let mut b = board();
    b.place(0, 0).unwrap();
    b.place(1, 1).unwrap();
    b.place(0, 1).unwrap();
    assert_eq!(b.slot_term(0), None);
    assert_eq!(b.slot_term(1), Some(0));
    assert_eq!(b.pool()[0], 1);
    assert_consistent(&b);
  }

  #[test]
  fn placing_into_same_slot_keeps_marker() {
    let mut b = board();
    let slot = slot_for(&b, 0);
    b.place(0, slot).unwrap();
    b.evaluate();
    b.place(0, slot).unwrap();
    assert_eq!(b.mark(slot), SlotMark::Correct);
  }

  #[test]
  fn unknown_ids_are_rejected() {
    let mut b = board();
    assert_eq!(b.place(9, 0), Err(BoardError::UnknownTerm(9)));
    assert_eq!(b.place(0, 9), Err(BoardError::UnknownSlot(9)));
    assert_eq!(b.remove(5), Err(BoardError::UnknownTerm(5)));
    assert_consistent(&b);
  }

  #[test]
  fn reset_returns_terms_in_reverse_slot_order() {
    let mut b = board();
    b.place(0, 0).unwrap();
    b.place(1, 3).unwrap();
    b.evaluate();
    b.reset();
    assert_eq!(b.pool(), &[1, 0, 2, 3, 4]);
    assert!((0..5).all(|t| b.term_state(t) == TermState::Unplaced));
    assert!((0..5).all(|s| b.mark(s) == SlotMark::Unmarked));
    assert_eq!(b.evaluate().correct_count, 0);
  }

  #[test]
  fn reveal_scores_fully_correct_on_shuffled_challenge() {
    let mut rng = StdRng::seed_from_u64(3);
    let base = challenge_from_pairs("p", ChallengeSource::Fallback, &fallback_pairs());
    for _ in 0..10 {
      let mut b = MatchBoard::new(reshuffle_with(&base, &mut rng));
      b.place(0, 4).unwrap();
      b.place(1, 0).unwrap();
      let score = b.reveal();
      assert_eq!(score.correct_count, score.total);
      assert!(b.pool().is_empty());
      assert_consistent(&b);
    }
  }

  #[test]
  fn reveal_with_duplicate_concepts_uses_first_term() {
    let pairs = vec![
      Pair::new("A", "mesmo"),
      Pair::new("B", "mesmo"),
      Pair::new("C", "c"),
      Pair::new("D", "d"),
    ];
    let mut b = MatchBoard::new(challenge_from_pairs("p", ChallengeSource::Generated, &pairs));
    let score = b.reveal();
    // Both "mesmo" slots pick term A; the second pick moves it, leaving slot 0 empty.
    assert_eq!(b.slot_term(0), None);
    assert_eq!(b.slot_term(1), Some(0));
    assert_eq!(score.correct_count, 3);
    assert_consistent(&b);
  }
}
