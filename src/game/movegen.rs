//! Move generation for a single piece.
//!
//! Men step one square diagonally forward and capture by jumping an
//! adjacent enemy in any of the four diagonals. Kings slide any distance
//! and capture the first piece met on a diagonal when the square right
//! behind it is free. A capture always takes exactly one piece; chains are
//! played as a sequence of single-jump moves.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::board::{Board, Position, Side};

/// Diagonal directions as `(row delta, col delta)`, in generation order.
pub const DIAGONALS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// A candidate transition of one piece.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    /// Empty for a simple move, one square for a jump.
    pub captured: Vec<Position>,
}

impl Move {
    pub fn simple(from: Position, to: Position) -> Self {
        Move {
            from,
            to,
            captured: Vec::new(),
        }
    }

    pub fn jump(from: Position, to: Position, over: Position) -> Self {
        Move {
            from,
            to,
            captured: vec![over],
        }
    }

    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_capture() {
            write!(f, "{} x {}", self.from, self.to)
        } else {
            write!(f, "{} -> {}", self.from, self.to)
        }
    }
}

/// All moves, simple and capturing, of a piece standing on `from`.
///
/// The result ignores the side-wide capture obligation; callers filter it.
pub fn moves_for(from: Position, owner: Side, is_king: bool, board: &Board) -> Vec<Move> {
    if is_king {
        king_moves(from, owner, board)
    } else {
        man_moves(from, owner, board)
    }
}

/// Moves of whatever piece stands on `from`; empty for an empty square.
pub fn piece_moves(board: &Board, from: Position) -> Vec<Move> {
    match board.get(from) {
        Some(piece) => moves_for(from, piece.owner, piece.is_king, board),
        None => Vec::new(),
    }
}

/// Only the capturing moves of the piece on `from`.
pub fn captures_from(board: &Board, from: Position) -> Vec<Move> {
    piece_moves(board, from)
        .into_iter()
        .filter(Move::is_capture)
        .collect()
}

fn man_moves(from: Position, owner: Side, board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();
    let forward = owner.forward();

    for dc in [-1, 1] {
        if let Some(to) = from.offset(forward, dc) {
            if board.is_empty_at(to) {
                moves.push(Move::simple(from, to));
            }
        }
    }

    for (dr, dc) in DIAGONALS {
        let Some(over) = from.offset(dr, dc) else {
            continue;
        };
        let Some(to) = from.offset(2 * dr, 2 * dc) else {
            continue;
        };
        let holds_enemy = board.get(over).is_some_and(|p| p.owner != owner);
        if holds_enemy && board.is_empty_at(to) {
            moves.push(Move::jump(from, to, over));
        }
    }

    moves
}

fn king_moves(from: Position, owner: Side, board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();

    for (dr, dc) in DIAGONALS {
        let mut cursor = from;
        while let Some(next) = cursor.offset(dr, dc) {
            match board.get(next) {
                None => {
                    moves.push(Move::simple(from, next));
                    cursor = next;
                }
                Some(blocker) => {
                    if blocker.owner != owner {
                        if let Some(to) = next.offset(dr, dc) {
                            if board.is_empty_at(to) {
                                moves.push(Move::jump(from, to, next));
                            }
                        }
                    }
                    // Never look past the first occupied square.
                    break;
                }
            }
        }
    }

    moves
}
