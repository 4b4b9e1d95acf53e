//! Error types for rule violations and board decoding.

use std::fmt;

/// Reasons the turn state machine refuses an input.
///
/// Every variant is recoverable: the session is left exactly as it was
/// before the rejected input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleError {
    /// The acting client is an observer or the other side is to move.
    NotPlayersTurn,
    /// Another piece of the same side has a capture available.
    CaptureObligationViolation,
    /// The target square is not a legal destination for the selected piece.
    IllegalDestination,
    /// A capture chain is pending and only the forced piece may capture.
    MustContinueSamePiece,
    /// The game has a winner or was forfeited.
    GameAlreadyConcluded,
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::NotPlayersTurn => write!(f, "Not your turn"),
            RuleError::CaptureObligationViolation => {
                write!(f, "Capture is obligatory with another piece")
            }
            RuleError::IllegalDestination => write!(f, "Illegal destination for the selected piece"),
            RuleError::MustContinueSamePiece => {
                write!(f, "You must continue the capture with the same piece")
            }
            RuleError::GameAlreadyConcluded => write!(f, "The game is already over"),
        }
    }
}

impl std::error::Error for RuleError {}

/// Failures while decoding a board from its wire or diagram form.
#[derive(Debug)]
pub enum BoardError {
    /// The payload is not valid JSON for a board.
    Json(serde_json::Error),
    /// The grid does not have exactly eight rows.
    BadRowCount { found: usize },
    /// A row does not have exactly eight cells.
    BadColumnCount { row: usize, found: usize },
    /// A piece sits on a light (unplayable) square.
    LightSquareOccupied { row: usize, col: usize },
    /// Unknown character in a text diagram.
    InvalidSymbol { symbol: char },
    /// Coordinates outside the 8x8 grid.
    OffBoard { row: usize, col: usize },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::Json(e) => write!(f, "Invalid board encoding: {e}"),
            BoardError::BadRowCount { found } => {
                write!(f, "Board must have 8 rows, found {found}")
            }
            BoardError::BadColumnCount { row, found } => {
                write!(f, "Board row {row} must have 8 cells, found {found}")
            }
            BoardError::LightSquareOccupied { row, col } => {
                write!(f, "Piece on light square ({row}, {col})")
            }
            BoardError::InvalidSymbol { symbol } => {
                write!(f, "Invalid board symbol '{symbol}'")
            }
            BoardError::OffBoard { row, col } => {
                write!(f, "Square ({row}, {col}) is off the board")
            }
        }
    }
}

impl std::error::Error for BoardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BoardError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(e: serde_json::Error) -> Self {
        BoardError::Json(e)
    }
}
