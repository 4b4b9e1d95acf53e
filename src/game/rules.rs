//! Applying a single move to a board snapshot.

use crate::game::board::{Board, Position};
use crate::game::movegen::{captures_from, Move};

/// The snapshot produced by one move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    pub landed: Position,
    /// A man reached the opponent's back rank on this move.
    pub promoted: bool,
    /// The piece captured and can capture again from `landed`.
    pub must_continue: bool,
}

/// Copies `board`, moves the piece, clears captured squares and crowns a man
/// reaching the far rank. Returns `None` when `mv.from` is empty.
///
/// Promotion ends a capture chain even when further jumps would exist.
pub fn execute_move(board: &Board, mv: &Move) -> Option<MoveOutcome> {
    let piece = board.get(mv.from)?;
    let mut next = board.clone();

    next.clear(mv.from);
    for &victim in &mv.captured {
        next.clear(victim);
    }

    let promoted = !piece.is_king && mv.to.row() == piece.owner.promotion_row();
    let landed_piece = if promoted { piece.promoted() } else { piece };
    next.place(mv.to, landed_piece).ok()?;

    let must_continue = mv.is_capture() && !promoted && !captures_from(&next, mv.to).is_empty();

    Some(MoveOutcome {
        board: next,
        landed: mv.to,
        promoted,
        must_continue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{Piece, Side};

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn simple_move_relocates_the_piece() {
        let board = Board::initial();
        let out = execute_move(&board, &Move::simple(pos(5, 0), pos(4, 1))).unwrap();
        assert!(out.board.is_empty_at(pos(5, 0)));
        assert_eq!(out.board.get(pos(4, 1)), Some(Piece::man(Side::Red)));
        assert!(!out.promoted);
        assert!(!out.must_continue);
        // The source snapshot is untouched.
        assert_eq!(board, Board::initial());
    }

    #[test]
    fn capture_clears_the_victim_and_flags_continuation() {
        let board: Board = "
            ........
            ........
            ...b....
            ........
            ...b....
            ..r.....
            ........
            ........
        "
        .parse()
        .unwrap();
        let out = execute_move(&board, &Move::jump(pos(5, 2), pos(3, 4), pos(4, 3))).unwrap();
        assert!(out.board.is_empty_at(pos(4, 3)));
        assert_eq!(out.board.count(Side::Black), 1);
        assert!(out.must_continue);
    }

    #[test]
    fn promotion_stops_the_chain() {
        let board: Board = "
            ........
            ..b.b...
            .r......
            ........
            ........
            ........
            ........
            ........
        "
        .parse()
        .unwrap();
        let out = execute_move(&board, &Move::jump(pos(2, 1), pos(0, 3), pos(1, 2))).unwrap();
        assert!(out.promoted);
        // (1,4) could be jumped from (0,3), but the crowning ends the turn.
        assert!(!captures_from(&out.board, pos(0, 3)).is_empty());
        assert!(!out.must_continue);
        assert_eq!(out.board.get(pos(0, 3)), Some(Piece::king(Side::Red)));
    }

    #[test]
    fn king_on_back_rank_is_not_promoted_again() {
        let mut board = Board::empty();
        board.place(pos(1, 2), Piece::king(Side::Red)).unwrap();
        let out = execute_move(&board, &Move::simple(pos(1, 2), pos(0, 1))).unwrap();
        assert!(!out.promoted);
        assert_eq!(out.board.get(pos(0, 1)), Some(Piece::king(Side::Red)));
    }

    #[test]
    fn empty_source_yields_nothing() {
        assert!(execute_move(&Board::empty(), &Move::simple(pos(5, 0), pos(4, 1))).is_none());
    }
}
