//! WebSocket upgrade + message loop. Each connection owns one game `Session`;
//! every client message is parsed as JSON, applied to that session, and
//! answered with a single JSON message.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::board::{MatchBoard, ScoreResult};
use crate::error::BoardError;
use crate::feedback::FeedbackView;
use crate::logic::{generate_challenge, resolve_request};
use crate::protocol::{board_out, to_out, ClientWsMessage, ServerWsMessage};
use crate::session::Session;
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "termatch_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "termatch_backend", "WebSocket connected");
  let mut session = Session::new();
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "termatch_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &mut session).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "termatch_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "termatch_backend", "WebSocket disconnected");
}

fn board_reply(result: Result<&MatchBoard, BoardError>) -> ServerWsMessage {
  match result {
    Ok(board) => ServerWsMessage::Board { board: board_out(board) },
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}

/// Apply one client action to `session`.
#[instrument(level = "info", skip(state, session))]
pub async fn handle_client_ws(msg: ClientWsMessage, state: &AppState, session: &mut Session) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Generate { prompt, pair_count, model, auto_shuffle } => {
      let req = resolve_request(state, &prompt, pair_count, model, auto_shuffle);
      let out = generate_challenge(state, &req).await;
      info!(target: "challenge", id = %out.challenge.id, source = ?out.challenge.source, fallback = out.warning.is_some(), "WS challenge served");
      let challenge = to_out(&out.challenge);
      let board = board_out(session.install(out.challenge));
      ServerWsMessage::Challenge { challenge, board, warning: out.warning }
    }

    ClientWsMessage::Reshuffle => match session.reshuffle() {
      Ok(board) => ServerWsMessage::Challenge { challenge: to_out(board.challenge()), board: board_out(board), warning: None },
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::Place { term, slot } => board_reply(session.place(term, slot)),
    ClientWsMessage::Remove { term } => board_reply(session.remove(term)),
    ClientWsMessage::Reset => board_reply(session.reset()),

    ClientWsMessage::Evaluate => evaluation_reply(session.evaluate(&state.presenter), false),
    ClientWsMessage::Reveal => evaluation_reply(session.reveal(&state.presenter), true),
  }
}

fn evaluation_reply(result: Result<(ScoreResult, FeedbackView, &MatchBoard), BoardError>, revealing: bool) -> ServerWsMessage {
  match result {
    Ok((score, feedback, board)) => {
      info!(target: "board", revealing, success = feedback.is_success(), correct = score.correct_count, total = score.total, "WS evaluation");
      ServerWsMessage::Evaluation { score, banner: score.banner(), board: board_out(board), feedback }
    }
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}
