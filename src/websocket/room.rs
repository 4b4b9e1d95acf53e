//! Store and session bookkeeping shared by the websocket handlers.
//!
//! Nothing here touches the actor context, so the handlers stay thin and
//! the room flow can be driven directly against a [`GameStore`].

use log::{debug, info, warn};

use crate::game::{GameSession, Side, Transition};
use crate::models::utils::get_game_status;
use crate::models::{GameDocument, ServerMessage};
use crate::store::{GameStore, Seat, StoreError};

/// A connection's place in a room after create or join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub game_id: String,
    pub seat: Seat,
    pub document: GameDocument,
    /// False when the room already existed and was joined instead.
    pub created: bool,
}

/// Creates `room` with `player` as red, or joins it if it already exists.
pub fn open_room(store: &GameStore, room: Option<&str>, player: &str) -> Result<Entry, StoreError> {
    match store.create(room, player) {
        Ok((game_id, document)) => Ok(Entry {
            game_id,
            seat: Seat::Player(Side::Red),
            document,
            created: true,
        }),
        Err(StoreError::RoomExists { room }) => {
            info!("Room {} already exists, joining instead", room);
            join_room(store, &room, player)
        }
        Err(e) => Err(e),
    }
}

pub fn join_room(store: &GameStore, room: &str, player: &str) -> Result<Entry, StoreError> {
    let (seat, document) = store.join(room, player)?;
    Ok(Entry {
        game_id: room.to_string(),
        seat,
        document,
        created: false,
    })
}

/// A fresh turn state machine for whoever sits on `seat`.
pub fn start_session(doc: &GameDocument, seat: Seat) -> GameSession {
    let mut session = GameSession::new(
        doc.board.clone(),
        doc.side_to_move,
        seat.side(),
        doc.is_concluded(),
    );
    session.record_version(doc.version);
    session
}

/// Marks `session` finished if the stored game already is.
pub fn refresh_conclusion(
    store: &GameStore,
    game_id: &str,
    session: &mut GameSession,
) -> Result<(), StoreError> {
    let doc = store.get(game_id).ok_or_else(|| StoreError::NotFound {
        room: game_id.to_string(),
    })?;
    if doc.is_concluded() {
        session.sync(doc.version, doc.board, doc.side_to_move, true);
    }
    Ok(())
}

/// Writes a board-changing transition to the store.
///
/// Returns `Ok(None)` for transitions that leave the board alone. When the
/// store refuses the write, `session` is put back in step with the stored
/// document before the error is returned.
pub fn commit(
    store: &GameStore,
    game_id: &str,
    session: &mut GameSession,
    transition: Transition,
) -> Result<Option<GameDocument>, StoreError> {
    let committed = match transition {
        Transition::JumpPending {
            board,
            side_to_move,
            forced,
        } => {
            info!("Game {}: capture chain continues from {}", game_id, forced);
            store.commit_progress(game_id, board, side_to_move)
        }
        Transition::TurnComplete {
            board,
            side_to_move,
            winner,
        } => {
            if let Some(winner) = winner {
                info!("Game {}: {} wins", game_id, winner);
            }
            store.commit_turn(game_id, board, side_to_move, winner)
        }
        _ => return Ok(None),
    };

    match committed {
        Ok(doc) => {
            session.record_version(doc.version);
            Ok(Some(doc))
        }
        Err(e) => {
            warn!("Commit to game {} failed: {}", game_id, e);
            if let Some(doc) = store.get(game_id) {
                let concluded = doc.is_concluded();
                session.sync(doc.version, doc.board, doc.side_to_move, concluded);
            }
            Err(e)
        }
    }
}

/// Applies a broadcast document to one connection and builds its update.
///
/// Returns `None` for a snapshot older than one the session already has.
pub fn snapshot_update(
    game_id: &str,
    side: Option<Side>,
    session: Option<&mut GameSession>,
    doc: GameDocument,
) -> Option<ServerMessage> {
    let view = match session {
        Some(session) => {
            let fresh = session.sync(
                doc.version,
                doc.board.clone(),
                doc.side_to_move,
                doc.is_concluded(),
            );
            if !fresh {
                debug!("Dropping stale snapshot {} of game {}", doc.version, game_id);
                return None;
            }
            Some(session.render())
        }
        None => None,
    };

    Some(ServerMessage {
        game_id: Some(game_id.to_string()),
        side,
        view,
        status_label: Some(get_game_status(&doc)),
        document: Some(doc),
        ..ServerMessage::new("game_update")
    })
}
