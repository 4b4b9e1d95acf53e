//! Per-client turn state machine.
//!
//! A [`GameSession`] holds the last synchronized board, whose turn it is and
//! the local selection. Square activations drive it through
//! `Idle -> PieceSelected -> (MustContinueJump)* -> Idle`. Rejected inputs
//! leave the session untouched; accepted moves replace the board with a new
//! snapshot.

use serde::Serialize;

use crate::game::board::{Board, Position, Side};
use crate::game::captures::{obligation_at, obligatory_captures, CaptureObligation};
use crate::game::error::RuleError;
use crate::game::movegen::{captures_from, piece_moves, Move};
use crate::game::outcome::evaluate;
use crate::game::rules::execute_move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "position", rename_all = "snake_case")]
pub enum TurnPhase {
    Idle,
    PieceSelected(Position),
    /// A capture chain is pending; only this piece may move, and only by capturing.
    MustContinueJump(Position),
}

/// What an accepted input did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing to do, e.g. clicking an empty square with no selection.
    Unchanged,
    Selected(Position),
    Deselected,
    /// A capture landed with more jumps available. The side to move is kept
    /// so both clients can observe the intermediate board.
    JumpPending {
        board: Board,
        side_to_move: Side,
        forced: Position,
    },
    /// The move (or chain) is over and the turn passed.
    TurnComplete {
        board: Board,
        side_to_move: Side,
        winner: Option<Side>,
    },
}

impl Transition {
    /// Whether the transition changed the board and must be committed.
    pub fn changes_board(&self) -> bool {
        matches!(
            self,
            Transition::JumpPending { .. } | Transition::TurnComplete { .. }
        )
    }
}

/// Everything a presentation layer needs to redraw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderView {
    pub board: Board,
    pub side_to_move: Side,
    pub selected: Option<Position>,
    pub obligations: Vec<CaptureObligation>,
    pub must_continue_from: Option<Position>,
    pub concluded: bool,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    side_to_move: Side,
    local_side: Option<Side>,
    phase: TurnPhase,
    obligations: Vec<CaptureObligation>,
    concluded: bool,
    version: u64,
}

impl GameSession {
    /// `local_side` is `None` for observers.
    pub fn new(board: Board, side_to_move: Side, local_side: Option<Side>, concluded: bool) -> Self {
        let obligations = obligatory_captures(side_to_move, &board);
        GameSession {
            board,
            side_to_move,
            local_side,
            phase: TurnPhase::Idle,
            obligations,
            concluded,
            version: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn local_side(&self) -> Option<Side> {
        self.local_side
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn obligations(&self) -> &[CaptureObligation] {
        &self.obligations
    }

    pub fn is_concluded(&self) -> bool {
        self.concluded
    }

    pub fn set_local_side(&mut self, side: Option<Side>) {
        self.local_side = side;
    }

    /// Newest document version this session has seen or written.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Remembers the version the store gave to a document this session
    /// joined or committed. Older snapshots are ignored from then on.
    pub fn record_version(&mut self, version: u64) {
        self.version = self.version.max(version);
    }

    /// Adopts a snapshot from the document store. Returns `false` and changes
    /// nothing when the snapshot is older than the newest version seen.
    ///
    /// A pending capture chain survives only if the snapshot is the one this
    /// session produced itself: same side to move and an identical board.
    pub fn sync(&mut self, version: u64, board: Board, side_to_move: Side, concluded: bool) -> bool {
        if version < self.version {
            return false;
        }
        self.version = version;

        let keep_chain = matches!(self.phase, TurnPhase::MustContinueJump(_))
            && !concluded
            && side_to_move == self.side_to_move
            && board == self.board;

        self.board = board;
        self.side_to_move = side_to_move;
        self.concluded = concluded;

        if !keep_chain {
            self.phase = TurnPhase::Idle;
            self.obligations = obligatory_captures(side_to_move, &self.board);
        }
        true
    }

    /// Handles a click on `target`.
    pub fn activate(&mut self, target: Position) -> Result<Transition, RuleError> {
        self.ensure_can_act()?;

        match self.phase {
            TurnPhase::MustContinueJump(forced) => {
                let mv = captures_from(&self.board, forced)
                    .into_iter()
                    .find(|m| m.to == target)
                    .ok_or(RuleError::MustContinueSamePiece)?;
                self.perform(mv)
            }
            TurnPhase::Idle => {
                if self.is_own_piece(target) {
                    self.select(target)
                } else {
                    Ok(Transition::Unchanged)
                }
            }
            TurnPhase::PieceSelected(selected) => {
                if let Some(mv) = self
                    .constrained_moves(selected)
                    .into_iter()
                    .find(|m| m.to == target)
                {
                    return self.perform(mv);
                }
                if self.is_own_piece(target) {
                    self.select(target)
                } else {
                    self.phase = TurnPhase::Idle;
                    Ok(Transition::Deselected)
                }
            }
        }
    }

    /// Plays `from -> to` directly, without a prior selection.
    pub fn apply_move(&mut self, from: Position, to: Position) -> Result<Transition, RuleError> {
        self.ensure_can_act()?;

        if let TurnPhase::MustContinueJump(forced) = self.phase {
            if from != forced {
                return Err(RuleError::MustContinueSamePiece);
            }
            let mv = captures_from(&self.board, forced)
                .into_iter()
                .find(|m| m.to == to)
                .ok_or(RuleError::MustContinueSamePiece)?;
            return self.perform(mv);
        }

        if !self.is_own_piece(from) {
            return Err(RuleError::IllegalDestination);
        }
        self.check_obligation(from)?;
        let mv = self
            .constrained_moves(from)
            .into_iter()
            .find(|m| m.to == to)
            .ok_or(RuleError::IllegalDestination)?;
        self.perform(mv)
    }

    /// Legal moves of the piece on `from` for the side to move, under the
    /// capture obligation and any pending chain. Empty for other squares.
    pub fn legal_destinations(&self, from: Position) -> Vec<Move> {
        match self.phase {
            TurnPhase::MustContinueJump(forced) if forced == from => {
                captures_from(&self.board, forced)
            }
            TurnPhase::MustContinueJump(_) => Vec::new(),
            _ if !self.is_own_piece_of(from, self.side_to_move) => Vec::new(),
            _ if !self.obligations.is_empty()
                && obligation_at(&self.obligations, from).is_none() =>
            {
                Vec::new()
            }
            _ => self.constrained_moves(from),
        }
    }

    pub fn render(&self) -> RenderView {
        let (selected, must_continue_from) = match self.phase {
            TurnPhase::Idle => (None, None),
            TurnPhase::PieceSelected(p) => (Some(p), None),
            TurnPhase::MustContinueJump(p) => (Some(p), Some(p)),
        };
        RenderView {
            board: self.board.clone(),
            side_to_move: self.side_to_move,
            selected,
            obligations: self.obligations.clone(),
            must_continue_from,
            concluded: self.concluded,
        }
    }

    fn ensure_can_act(&self) -> Result<(), RuleError> {
        if self.concluded {
            return Err(RuleError::GameAlreadyConcluded);
        }
        if self.local_side != Some(self.side_to_move) {
            return Err(RuleError::NotPlayersTurn);
        }
        Ok(())
    }

    fn is_own_piece(&self, pos: Position) -> bool {
        self.is_own_piece_of(pos, self.side_to_move)
    }

    fn is_own_piece_of(&self, pos: Position, side: Side) -> bool {
        self.board.get(pos).is_some_and(|p| p.owner == side)
    }

    fn check_obligation(&self, pos: Position) -> Result<(), RuleError> {
        if !self.obligations.is_empty() && obligation_at(&self.obligations, pos).is_none() {
            return Err(RuleError::CaptureObligationViolation);
        }
        Ok(())
    }

    fn select(&mut self, pos: Position) -> Result<Transition, RuleError> {
        self.check_obligation(pos)?;
        self.phase = TurnPhase::PieceSelected(pos);
        Ok(Transition::Selected(pos))
    }

    /// Moves of one piece, restricted to captures when any capture exists.
    fn constrained_moves(&self, from: Position) -> Vec<Move> {
        let moves = piece_moves(&self.board, from);
        if self.obligations.is_empty() {
            moves
        } else {
            moves.into_iter().filter(Move::is_capture).collect()
        }
    }

    fn perform(&mut self, mv: Move) -> Result<Transition, RuleError> {
        let outcome = execute_move(&self.board, &mv).ok_or(RuleError::IllegalDestination)?;
        let side = self.side_to_move;
        self.board = outcome.board;

        if outcome.must_continue {
            let forced = outcome.landed;
            self.phase = TurnPhase::MustContinueJump(forced);
            self.obligations = obligatory_captures(side, &self.board);
            return Ok(Transition::JumpPending {
                board: self.board.clone(),
                side_to_move: side,
                forced,
            });
        }

        let next = side.opponent();
        let winner = evaluate(&self.board, next);
        self.side_to_move = next;
        self.phase = TurnPhase::Idle;
        self.concluded = winner.is_some();
        self.obligations = obligatory_captures(next, &self.board);

        Ok(Transition::TurnComplete {
            board: self.board.clone(),
            side_to_move: next,
            winner,
        })
    }
}
