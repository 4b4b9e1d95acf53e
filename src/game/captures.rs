//! Mandatory-capture scan over every piece of one side.

use serde::{Deserialize, Serialize};

use crate::game::board::{Board, Position, Side};
use crate::game::movegen::{moves_for, Move};

/// A piece that can capture, with every jump it has available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureObligation {
    pub piece_position: Position,
    pub available_captures: Vec<Move>,
}

/// Every piece of `side` that has at least one capture, in row-major order.
///
/// A non-empty result makes all simple moves of `side` illegal. No attempt
/// is made to prefer longer chains: any listed piece may be chosen.
pub fn obligatory_captures(side: Side, board: &Board) -> Vec<CaptureObligation> {
    board
        .pieces_of(side)
        .filter_map(|(position, piece)| {
            let captures: Vec<Move> = moves_for(position, piece.owner, piece.is_king, board)
                .into_iter()
                .filter(Move::is_capture)
                .collect();
            if captures.is_empty() {
                None
            } else {
                Some(CaptureObligation {
                    piece_position: position,
                    available_captures: captures,
                })
            }
        })
        .collect()
}

/// Looks up the obligation entry of the piece on `position`.
pub fn obligation_at(
    obligations: &[CaptureObligation],
    position: Position,
) -> Option<&CaptureObligation> {
    obligations
        .iter()
        .find(|entry| entry.piece_position == position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn no_obligation_at_the_start() {
        let board = Board::initial();
        assert!(obligatory_captures(Side::Red, &board).is_empty());
        assert!(obligatory_captures(Side::Black, &board).is_empty());
    }

    #[test]
    fn lists_every_piece_that_can_capture() {
        let board: Board = "
            ........
            ........
            ........
            ..b.b...
            ...r....
            ........
            .b......
            r.......
        "
        .parse()
        .unwrap();
        let red = obligatory_captures(Side::Red, &board);
        let positions: Vec<_> = red.iter().map(|o| o.piece_position).collect();
        assert_eq!(positions, vec![pos(4, 3), pos(7, 0)]);
        assert_eq!(red[0].available_captures.len(), 2);
        assert_eq!(red[1].available_captures.len(), 1);
        assert!(obligation_at(&red, pos(7, 0)).is_some());
        assert!(obligation_at(&red, pos(4, 3)).is_some());
    }

    #[test]
    fn opponent_obligations_are_independent() {
        let board: Board = "
            ........
            ........
            ........
            ..b.....
            ...r....
            ........
            ........
            ........
        "
        .parse()
        .unwrap();
        // Black on (3,2) can jump red on (4,3) landing on (5,4).
        let black = obligatory_captures(Side::Black, &board);
        assert_eq!(black.len(), 1);
        assert_eq!(black[0].piece_position, pos(3, 2));
        assert_eq!(black[0].available_captures[0].to, pos(5, 4));
    }
}
