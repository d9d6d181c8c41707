//! Per-connection game session.
//!
//! A session owns at most one board, and the board owns its challenge.
//! Installing a new challenge drops the old board in the same step, so no
//! placement can outlive the challenge it refers to.

use rand::Rng;
use tracing::info;

use crate::board::{MatchBoard, ScoreResult, SlotId, TermId};
use crate::challenge::reshuffle_with;
use crate::domain::Challenge;
use crate::error::BoardError;
use crate::feedback::{FeedbackPresenter, FeedbackView};

#[derive(Debug, Default)]
pub struct Session {
  board: Option<MatchBoard>,
}

impl Session {
  pub fn new() -> Self {
    Self::default()
  }

  fn board_mut(&mut self) -> Result<&mut MatchBoard, BoardError> {
    self.board.as_mut().ok_or(BoardError::NoActiveChallenge)
  }

  /// Replace whatever was being played with `challenge`, on a fresh board.
  pub fn install(&mut self, challenge: Challenge) -> &MatchBoard {
    info!(target: "board", id = %challenge.id, terms = challenge.terms.len(), "New board installed");
    self.board.insert(MatchBoard::new(challenge))
  }

  /// Reshuffle the current challenge; placements are discarded.
  pub fn reshuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&MatchBoard, BoardError> {
    let board = self.board.take().ok_or(BoardError::NoActiveChallenge)?;
    let next = reshuffle_with(&board.into_challenge(), rng);
    Ok(&*self.board.insert(MatchBoard::new(next)))
  }

  pub fn reshuffle(&mut self) -> Result<&MatchBoard, BoardError> {
    self.reshuffle_with(&mut rand::thread_rng())
  }

  pub fn place(&mut self, term: TermId, slot: SlotId) -> Result<&MatchBoard, BoardError> {
    let board = self.board_mut()?;
    board.place(term, slot)?;
    Ok(&*board)
  }

  pub fn remove(&mut self, term: TermId) -> Result<&MatchBoard, BoardError> {
    let board = self.board_mut()?;
    board.remove(term)?;
    Ok(&*board)
  }

  pub fn reset(&mut self) -> Result<&MatchBoard, BoardError> {
    let board = self.board_mut()?;
    board.reset();
    Ok(&*board)
  }

  /// Evaluate and choose the feedback view for the result.
  pub fn evaluate(&mut self, presenter: &FeedbackPresenter) -> Result<(ScoreResult, FeedbackView, &MatchBoard), BoardError> {
    let board = self.board_mut()?;
    let score = board.evaluate();
    Ok((score, presenter.present(&score), &*board))
  }

  pub fn reveal(&mut self, presenter: &FeedbackPresenter) -> Result<(ScoreResult, FeedbackView, &MatchBoard), BoardError> {
    let board = self.board_mut()?;
    let score = board.reveal();
    Ok((score, presenter.present(&score), &*board))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::board::TermState;
  use crate::challenge::challenge_from_pairs;
  use crate::config::FeedbackCfg;
  use crate::domain::ChallengeSource;
  use crate::seeds::fallback_pairs;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn challenge() -> Challenge {
    challenge_from_pairs("p", ChallengeSource::Fallback, &fallback_pairs())
  }

  #[test]
  fn actions_need_a_challenge() {
    let mut s = Session::new();
    assert_eq!(s.place(0, 0).err(), Some(BoardError::NoActiveChallenge));
    assert_eq!(s.reset().err(), Some(BoardError::NoActiveChallenge));
    assert_eq!(s.reshuffle().err(), Some(BoardError::NoActiveChallenge));
  }

  #[test]
  fn installing_discards_old_placements() {
    let mut s = Session::new();
    s.install(challenge());
    s.place(0, 0).unwrap();
    let board = s.install(challenge());
    assert_eq!(board.term_state(0), TermState::Unplaced);
    assert_eq!(board.pool().len(), 5);
  }

  #[test]
  fn reshuffle_rebuilds_board_with_same_key() {
    let mut s = Session::new();
    let key = s.install(challenge()).challenge().answer_key.clone();
    s.place(1, 1).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let board = s.reshuffle_with(&mut rng).unwrap();
    assert_eq!(board.challenge().answer_key, key);
    assert!(board.pool().len() == 5 && board.slot_term(1).is_none());
  }

  #[test]
  fn reveal_yields_success_feedback() {
    let presenter = FeedbackPresenter::new(&FeedbackCfg::default());
    let mut s = Session::new();
    s.install(challenge());
    let (score, view, _) = s.reveal(&presenter).unwrap();
    assert!(score.is_perfect());
    assert!(view.is_success());

    s.remove(0).unwrap();
    let (score, view, _) = s.evaluate(&presenter).unwrap();
    assert_eq!(score.correct_count, 4);
    assert!(!view.is_success());
  }
}
