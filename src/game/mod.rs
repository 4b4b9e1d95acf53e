//! Brazilian draughts rules engine.

pub mod board;
pub mod captures;
pub mod error;
pub mod movegen;
pub mod outcome;
pub mod rules;
pub mod session;

// Re-export important types
pub use board::{is_on_board, Board, Piece, Position, Side, BOARD_SIZE};
pub use captures::{obligatory_captures, CaptureObligation};
pub use error::{BoardError, RuleError};
pub use movegen::{moves_for, Move};
pub use outcome::evaluate;
pub use rules::{execute_move, MoveOutcome};
pub use session::{GameSession, RenderView, Transition, TurnPhase};
