use actix::Message;
use serde::{Deserialize, Serialize};

use crate::game::{Move, Position, RenderView, Side};
use crate::models::GameDocument;

/// Message sent from client to server
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ClientMessage {
    pub message_type: String,
    pub game_id: Option<String>,
    /// Opaque player reference from the authentication layer.
    pub player_id: Option<String>,
    pub square: Option<Square>,
    pub move_from: Option<Square>,
    pub move_to: Option<Square>,
}

/// Raw board coordinates as sent by a client.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    pub fn position(self) -> Option<Position> {
        Position::new(self.row, self.col)
    }
}

/// Message sent from server to client
#[derive(Serialize, Debug, Clone, Default)]
pub struct ServerMessage {
    pub message_type: String,
    pub game_id: Option<String>,
    /// The side this connection plays; `None` for observers.
    pub side: Option<Side>,
    pub document: Option<GameDocument>,
    pub view: Option<RenderView>,
    pub available_moves: Option<Vec<Move>>,
    pub status_label: Option<String>,
    pub error: Option<String>,
}

impl ServerMessage {
    pub fn new(message_type: &str) -> Self {
        ServerMessage {
            message_type: message_type.to_string(),
            ..Default::default()
        }
    }

    pub fn error(game_id: Option<String>, error: impl ToString) -> Self {
        ServerMessage {
            message_type: "error".to_string(),
            game_id,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

/// A document change pushed to every connection of a room.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct GameSnapshot {
    pub game_id: String,
    pub document: GameDocument,
}
