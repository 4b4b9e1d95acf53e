//! Game termination: piece exhaustion or a side left without moves.

use crate::game::board::{Board, Side};
use crate::game::captures::obligatory_captures;
use crate::game::movegen::moves_for;

/// True when `side` has at least one legal move, honouring mandatory capture.
pub fn has_any_legal_move(side: Side, board: &Board) -> bool {
    if !obligatory_captures(side, board).is_empty() {
        return true;
    }
    board
        .pieces_of(side)
        .any(|(pos, piece)| !moves_for(pos, piece.owner, piece.is_king, board).is_empty())
}

/// Winner of the game on `board` with `side_to_move` about to play, if any.
///
/// A side without pieces loses at once. A side to move that still has
/// pieces but no legal move also loses; blocked positions are not draws.
pub fn evaluate(board: &Board, side_to_move: Side) -> Option<Side> {
    if board.count(Side::Red) == 0 {
        return Some(Side::Black);
    }
    if board.count(Side::Black) == 0 {
        return Some(Side::Red);
    }
    if !has_any_legal_move(side_to_move, board) {
        return Some(side_to_move.opponent());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_position_has_no_winner() {
        let board = Board::initial();
        assert_eq!(evaluate(&board, Side::Red), None);
        assert_eq!(evaluate(&board, Side::Black), None);
    }

    #[test]
    fn side_without_pieces_loses() {
        let board: Board = "
            ........
            ........
            ........
            ........
            ........
            ........
            ........
            r.......
        "
        .parse()
        .unwrap();
        assert_eq!(evaluate(&board, Side::Red), Some(Side::Red));
        assert_eq!(evaluate(&board, Side::Black), Some(Side::Red));
    }

    #[test]
    fn blocked_side_to_move_loses() {
        // Red man on (7,0) is stuck behind (6,1), which is guarded by (5,2).
        let board: Board = "
            ........
            ........
            ........
            ........
            ........
            ..b.....
            .b......
            r.......
        "
        .parse()
        .unwrap();
        assert!(!has_any_legal_move(Side::Red, &board));
        assert_eq!(evaluate(&board, Side::Red), Some(Side::Black));
        // Black to move is not blocked, so nobody has won yet.
        assert_eq!(evaluate(&board, Side::Black), None);
    }

    #[test]
    fn capture_counts_as_a_legal_move() {
        let board: Board = "
            ........
            ........
            ........
            ........
            ........
            ........
            .b......
            r.......
        "
        .parse()
        .unwrap();
        assert!(has_any_legal_move(Side::Red, &board));
        assert_eq!(evaluate(&board, Side::Red), None);
    }
}
