//! In-memory game document store.
//!
//! Every operation is a read-modify-write under one lock, so two players
//! racing for the second seat cannot both win it.

use log::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::game::{Board, Side};
use crate::models::{GameDocument, GameStatus};

/// Where a joining player ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Player(Side),
    Observer,
}

impl Seat {
    pub fn side(self) -> Option<Side> {
        match self {
            Seat::Player(side) => Some(side),
            Seat::Observer => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound { room: String },
    RoomExists { room: String },
    /// The caller holds no seat in the room.
    NotAPlayer,
    /// Only the room admin may do this.
    NotAdmin,
    GameConcluded,
    /// Resets are only allowed while waiting or playing.
    ResetNotAllowed { status: GameStatus },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { room } => write!(f, "Game not found: {room}"),
            StoreError::RoomExists { room } => write!(f, "Room {room} already exists"),
            StoreError::NotAPlayer => write!(f, "You are not a player in this game"),
            StoreError::NotAdmin => write!(f, "Only the room admin can reset the game"),
            StoreError::GameConcluded => write!(f, "The game is already over"),
            StoreError::ResetNotAllowed { status } => {
                write!(f, "The game cannot be reset while {status:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Default)]
pub struct GameStore {
    games: Mutex<HashMap<String, GameDocument>>,
}

impl GameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.lock().is_empty()
    }

    pub fn get(&self, room: &str) -> Option<GameDocument> {
        self.games.lock().get(room).cloned()
    }

    /// Opens a room with `player` as red and admin. A blank or missing id
    /// gets a generated one.
    pub fn create(
        &self,
        room: Option<&str>,
        player: &str,
    ) -> Result<(String, GameDocument), StoreError> {
        let room = match room.map(str::trim).filter(|r| !r.is_empty()) {
            Some(r) => r.to_string(),
            None => Uuid::new_v4().to_string(),
        };

        let mut games = self.games.lock();
        if games.contains_key(&room) {
            return Err(StoreError::RoomExists { room });
        }
        let doc = GameDocument::new(player);
        games.insert(room.clone(), doc.clone());
        info!("Created game {} for player {}", room, player);
        Ok((room, doc))
    }

    /// Seats `player` in `room`: returning players get their seat back, the
    /// first newcomer claims black and starts the game, later ones observe.
    pub fn join(&self, room: &str, player: &str) -> Result<(Seat, GameDocument), StoreError> {
        let mut games = self.games.lock();
        let doc = games.get_mut(room).ok_or_else(|| StoreError::NotFound {
            room: room.to_string(),
        })?;

        let seat = if let Some(side) = doc.seat_of(player) {
            info!("Player {} returned to game {} as {}", player, room, side);
            Seat::Player(side)
        } else if doc.player2_ref.is_none() {
            doc.player2_ref = Some(player.to_string());
            if doc.status == GameStatus::WaitingForSecondPlayer {
                doc.status = GameStatus::Active;
            }
            doc.version += 1;
            info!("Player {} joined game {} as black", player, room);
            Seat::Player(Side::Black)
        } else {
            info!("Game {} is full, {} joins as observer", room, player);
            Seat::Observer
        };

        Ok((seat, doc.clone()))
    }

    /// Records an intermediate board of a capture chain; the turn is kept.
    pub fn commit_progress(
        &self,
        room: &str,
        board: Board,
        side_to_move: Side,
    ) -> Result<GameDocument, StoreError> {
        self.update(room, |doc| {
            if doc.is_concluded() {
                return Err(StoreError::GameConcluded);
            }
            doc.board = board;
            doc.side_to_move = side_to_move;
            Ok(())
        })
    }

    /// Records a finished turn and its outcome.
    pub fn commit_turn(
        &self,
        room: &str,
        board: Board,
        side_to_move: Side,
        winner: Option<Side>,
    ) -> Result<GameDocument, StoreError> {
        self.update(room, |doc| {
            if doc.is_concluded() {
                return Err(StoreError::GameConcluded);
            }
            doc.board = board;
            doc.side_to_move = side_to_move;
            doc.winner = winner;
            if winner.is_some() {
                doc.status = GameStatus::Finished;
            } else {
                if doc.status != GameStatus::WaitingForSecondPlayer {
                    doc.status = GameStatus::Active;
                }
                doc.forfeited_by = None;
            }
            Ok(())
        })
    }

    /// `player` gives up; the opponent wins.
    pub fn forfeit(&self, room: &str, player: &str) -> Result<GameDocument, StoreError> {
        self.update(room, |doc| {
            if doc.is_concluded() {
                return Err(StoreError::GameConcluded);
            }
            let side = doc.seat_of(player).ok_or(StoreError::NotAPlayer)?;
            doc.status = GameStatus::Forfeited;
            doc.winner = Some(side.opponent());
            doc.forfeited_by = Some(side);
            info!("Player {} ({}) forfeited game {}", player, side, room);
            Ok(())
        })
    }

    /// Puts the pieces back to the opening layout. Admin only.
    pub fn reset(&self, room: &str, player: &str) -> Result<GameDocument, StoreError> {
        self.update(room, |doc| {
            if doc.admin_ref.as_deref() != Some(player) {
                return Err(StoreError::NotAdmin);
            }
            if !matches!(
                doc.status,
                GameStatus::Active | GameStatus::WaitingForSecondPlayer
            ) {
                return Err(StoreError::ResetNotAllowed { status: doc.status });
            }
            doc.board = Board::initial();
            doc.side_to_move = Side::Red;
            doc.winner = None;
            doc.forfeited_by = None;
            doc.status = if doc.player2_ref.is_some() {
                GameStatus::Active
            } else {
                GameStatus::WaitingForSecondPlayer
            };
            info!("Game {} reset by {}", room, player);
            Ok(())
        })
    }

    /// A seated player walking out of a running game forfeits it. Returns the
    /// updated document when anything changed.
    pub fn leave(&self, room: &str, player: &str) -> Result<Option<GameDocument>, StoreError> {
        let doc = self.get(room).ok_or_else(|| StoreError::NotFound {
            room: room.to_string(),
        })?;
        if doc.status == GameStatus::Active && doc.seat_of(player).is_some() {
            return self.forfeit(room, player).map(Some);
        }
        debug!("Player {} left game {} without state change", player, room);
        Ok(None)
    }

    /// Drops `room` once its game is over. Waiting and running rooms stay so
    /// their players can come back to them.
    pub fn remove_if_concluded(&self, room: &str) -> Option<GameDocument> {
        let mut games = self.games.lock();
        if !games.get(room).is_some_and(GameDocument::is_concluded) {
            return None;
        }
        info!("Removed finished game {}", room);
        games.remove(room)
    }

    fn update<F>(&self, room: &str, apply: F) -> Result<GameDocument, StoreError>
    where
        F: FnOnce(&mut GameDocument) -> Result<(), StoreError>,
    {
        let mut games = self.games.lock();
        let doc = games.get_mut(room).ok_or_else(|| StoreError::NotFound {
            room: room.to_string(),
        })?;
        let mut draft = doc.clone();
        if let Err(e) = apply(&mut draft) {
            warn!("Rejected update to game {}: {}", room, e);
            return Err(e);
        }
        draft.version = doc.version + 1;
        *doc = draft.clone();
        debug!(
            "Game {} updated to version {}, {} to move",
            room, draft.version, draft.side_to_move
        );
        Ok(draft)
    }
}
