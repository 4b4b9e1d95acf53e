use serde::{Deserialize, Serialize};

use crate::game::{Board, Side};

/// Lifecycle of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    WaitingForSecondPlayer,
    Active,
    Finished,
    Forfeited,
}

/// The shared record both clients of a room synchronize on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDocument {
    pub board: Board,
    pub side_to_move: Side,
    pub player1_ref: Option<String>,
    pub player2_ref: Option<String>,
    /// Player allowed to reset the room, normally its creator.
    pub admin_ref: Option<String>,
    pub status: GameStatus,
    pub winner: Option<Side>,
    pub forfeited_by: Option<Side>,
    /// Bumped by every store write; snapshots with a lower version are stale.
    #[serde(default)]
    pub version: u64,
}

impl GameDocument {
    /// A fresh room created by `creator`, who plays red and administers it.
    pub fn new(creator: &str) -> Self {
        GameDocument {
            board: Board::initial(),
            side_to_move: Side::Red,
            player1_ref: Some(creator.to_string()),
            player2_ref: None,
            admin_ref: Some(creator.to_string()),
            status: GameStatus::WaitingForSecondPlayer,
            winner: None,
            forfeited_by: None,
            version: 0,
        }
    }

    /// No more moves may be made.
    pub fn is_concluded(&self) -> bool {
        self.winner.is_some() || self.status == GameStatus::Forfeited
    }

    /// The side `player` is seated as, if any.
    pub fn seat_of(&self, player: &str) -> Option<Side> {
        if self.player1_ref.as_deref() == Some(player) {
            Some(Side::Red)
        } else if self.player2_ref.as_deref() == Some(player) {
            Some(Side::Black)
        } else {
            None
        }
    }
}
