//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::board::{MatchBoard, ScoreResult, SlotMark};
use crate::domain::{Challenge, ChallengeSource, MAX_PAIRS, MIN_PAIRS};
use crate::feedback::FeedbackView;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Generate {
        #[serde(default)]
        prompt: String,
        #[serde(default, rename = "pairCount")]
        pair_count: Option<usize>,
        #[serde(default)]
        model: Option<String>,
        #[serde(default, rename = "autoShuffle")]
        auto_shuffle: Option<bool>,
    },
    Reshuffle,
    Place {
        term: usize,
        slot: usize,
    },
    Remove {
        term: usize,
    },
    Evaluate,
    Reset,
    Reveal,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Challenge {
        challenge: ChallengeOut,
        board: BoardOut,
        #[serde(skip_serializing_if = "Option::is_none")]
        warning: Option<String>,
    },
    Board {
        board: BoardOut,
    },
    Evaluation {
        score: ScoreResult,
        banner: String,
        board: BoardOut,
        feedback: FeedbackView,
    },
    Error {
        message: String,
    },
}

/// Challenge as handed to the rendering shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeOut {
    pub id: String,
    #[serde(default)]
    pub prompt: String,
    pub source: ChallengeSource,
    pub terms: Vec<String>,
    pub concepts: Vec<String>,
    #[serde(rename = "answerKey")]
    pub answer_key: HashMap<String, String>,
}

/// Convert full `Challenge` (internal) to the public DTO.
pub fn to_out(c: &Challenge) -> ChallengeOut {
    ChallengeOut {
        id: c.id.clone(),
        prompt: c.prompt.clone(),
        source: c.source,
        terms: c.terms.clone(),
        concepts: c.concepts.clone(),
        answer_key: c.answer_key.clone(),
    }
}

/// Convert a client-supplied DTO back into a `Challenge`.
pub fn from_out(c: ChallengeOut) -> Challenge {
    Challenge {
        id: c.id,
        prompt: c.prompt,
        source: c.source,
        terms: c.terms,
        concepts: c.concepts,
        answer_key: c.answer_key,
    }
}

#[derive(Debug, Serialize)]
pub struct TermOut {
    pub id: usize,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SlotOut {
    pub id: usize,
    pub concept: String,
    pub term: Option<TermOut>,
    pub mark: SlotMark,
}

/// Board snapshot: unplaced pool (head first) and every slot.
#[derive(Debug, Serialize)]
pub struct BoardOut {
    pub pool: Vec<TermOut>,
    pub slots: Vec<SlotOut>,
}

fn term_out(board: &MatchBoard, id: usize) -> TermOut {
    TermOut { id, text: board.term_text(id).unwrap_or_default().to_string() }
}

pub fn board_out(board: &MatchBoard) -> BoardOut {
    BoardOut {
        pool: board.pool().iter().map(|&id| term_out(board, id)).collect(),
        slots: (0..board.slot_count())
            .map(|id| SlotOut {
                id,
                concept: board.concept_text(id).unwrap_or_default().to_string(),
                term: board.slot_term(id).map(|t| term_out(board, t)),
                mark: board.mark(id),
            })
            .collect(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct ChallengeIn {
    #[serde(default)]
    pub prompt: String,
    #[serde(default, rename = "pairCount")]
    pub pair_count: Option<usize>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, rename = "autoShuffle")]
    pub auto_shuffle: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedOut {
    pub challenge: ChallengeOut,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReshuffleIn {
    pub challenge: ChallengeOut,
}

#[derive(Debug, Serialize)]
pub struct SettingsOut {
    #[serde(rename = "minPairs")]
    pub min_pairs: usize,
    #[serde(rename = "maxPairs")]
    pub max_pairs: usize,
    #[serde(rename = "defaultPairCount")]
    pub default_pair_count: usize,
    pub models: Vec<String>,
    #[serde(rename = "defaultModel")]
    pub default_model: String,
    #[serde(rename = "autoShuffle")]
    pub auto_shuffle: bool,
    #[serde(rename = "oracleEnabled")]
    pub oracle_enabled: bool,
}

impl SettingsOut {
    pub fn new(default_pair_count: usize, models: Vec<String>, default_model: String, auto_shuffle: bool, oracle_enabled: bool) -> Self {
        Self { min_pairs: MIN_PAIRS, max_pairs: MAX_PAIRS, default_pair_count, models, default_model, auto_shuffle, oracle_enabled }
    }
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::challenge_from_pairs;
    use crate::seeds::fallback_pairs;

    #[test]
    fn client_messages_parse() {
        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"place","term":2,"slot":0}"#).unwrap();
        assert!(matches!(m, ClientWsMessage::Place { term: 2, slot: 0 }));
        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"generate","prompt":"x","pairCount":8}"#).unwrap();
        assert!(matches!(m, ClientWsMessage::Generate { pair_count: Some(8), auto_shuffle: None, .. }));
        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"reveal"}"#).unwrap();
        assert!(matches!(m, ClientWsMessage::Reveal));
    }

    #[test]
    fn board_snapshot_reflects_placements() {
        let mut b = MatchBoard::new(challenge_from_pairs("p", ChallengeSource::Fallback, &fallback_pairs()));
        b.place(1, 0).unwrap();
        b.evaluate();
        let out = serde_json::to_value(board_out(&b)).unwrap();
        assert_eq!(out["pool"].as_array().unwrap().len(), 4);
        assert_eq!(out["slots"][0]["term"]["text"], "Impessoalidade");
        assert_eq!(out["slots"][0]["mark"], "incorrect");
        assert!(out["slots"][1]["term"].is_null());
    }

    #[test]
    fn challenge_round_trips_with_camel_case_key() {
        let c = challenge_from_pairs("p", ChallengeSource::Generated, &fallback_pairs());
        let v = serde_json::to_value(to_out(&c)).unwrap();
        assert_eq!(v["answerKey"]["Legalidade"], "A administração só pode agir conforme a lei.");
        let back: ChallengeOut = serde_json::from_value(v).unwrap();
        assert_eq!(from_out(back), c);
    }
}
