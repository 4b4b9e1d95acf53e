//! Board model: sides, pieces, positions and the 8x8 grid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::game::error::BoardError;

/// Number of rows and columns.
pub const BOARD_SIZE: usize = 8;

/// Rows filled with men at the start of a game, per side.
const STARTING_RANKS: usize = 3;

/// Grid form used on the wire: rows of optional pieces.
pub type Grid = Vec<Vec<Option<Piece>>>;

/// One of the two players. Red opens the game and moves toward row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Row delta of a forward step for this side's men.
    pub fn forward(self) -> isize {
        match self {
            Side::Red => -1,
            Side::Black => 1,
        }
    }

    /// The opponent's back rank, where this side's men are crowned.
    pub fn promotion_row(self) -> usize {
        match self {
            Side::Red => 0,
            Side::Black => BOARD_SIZE - 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Red => "red",
            Side::Black => "black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A man or a king belonging to one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub owner: Side,
    pub is_king: bool,
}

impl Piece {
    pub fn man(owner: Side) -> Self {
        Piece { owner, is_king: false }
    }

    pub fn king(owner: Side) -> Self {
        Piece { owner, is_king: true }
    }

    /// The crowned version of this piece. Kings stay kings.
    pub fn promoted(self) -> Self {
        Piece { is_king: true, ..self }
    }

    fn symbol(self) -> char {
        match (self.owner, self.is_king) {
            (Side::Red, false) => 'r',
            (Side::Red, true) => 'R',
            (Side::Black, false) => 'b',
            (Side::Black, true) => 'B',
        }
    }
}

/// A square on the board, always within bounds.
///
/// Only [`Position::new`] builds one, and decoding goes through it too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: usize,
    col: usize,
}

/// Unchecked coordinates as they arrive on the wire.
#[derive(Deserialize)]
struct RawPosition {
    row: usize,
    col: usize,
}

impl TryFrom<RawPosition> for Position {
    type Error = BoardError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::new(raw.row, raw.col).ok_or(BoardError::OffBoard {
            row: raw.row,
            col: raw.col,
        })
    }
}

impl Position {
    /// Returns `None` for coordinates outside the board.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Position { row, col })
        } else {
            None
        }
    }

    pub fn row(self) -> usize {
        self.row
    }

    pub fn col(self) -> usize {
        self.col
    }

    /// The square `(dr, dc)` steps away, if it is on the board.
    pub fn offset(self, dr: isize, dc: isize) -> Option<Position> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Position::new(row, col)
    }

    /// Dark squares are the only playable ones.
    pub fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// True iff both coordinates lie in `[0, BOARD_SIZE)`.
pub fn is_on_board(row: isize, col: isize) -> bool {
    (0..BOARD_SIZE as isize).contains(&row) && (0..BOARD_SIZE as isize).contains(&col)
}

/// An 8x8 board snapshot.
///
/// Light squares are always empty. The wire form is a JSON array of eight
/// rows, each holding eight `{"owner", "isKing"}` objects or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Grid", into = "Grid")]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn empty() -> Self {
        Board {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Standard opening layout: black men on rows 0-2, red men on rows 5-7.
    pub fn initial() -> Self {
        let mut board = Board::empty();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let pos = Position { row, col };
                if !pos.is_dark() {
                    continue;
                }
                if row < STARTING_RANKS {
                    board.cells[row][col] = Some(Piece::man(Side::Black));
                } else if row >= BOARD_SIZE - STARTING_RANKS {
                    board.cells[row][col] = Some(Piece::man(Side::Red));
                }
            }
        }
        board
    }

    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.cells[pos.row][pos.col]
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Puts `piece` on a dark square, replacing whatever was there.
    pub fn place(&mut self, pos: Position, piece: Piece) -> Result<(), BoardError> {
        if !pos.is_dark() {
            return Err(BoardError::LightSquareOccupied {
                row: pos.row,
                col: pos.col,
            });
        }
        self.cells[pos.row][pos.col] = Some(piece);
        Ok(())
    }

    pub fn clear(&mut self, pos: Position) {
        self.cells[pos.row][pos.col] = None;
    }

    /// Every occupied square in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        (0..BOARD_SIZE).flat_map(move |row| {
            (0..BOARD_SIZE).filter_map(move |col| {
                self.cells[row][col].map(|piece| (Position { row, col }, piece))
            })
        })
    }

    /// Squares held by `side` in row-major order.
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.occupied().filter(move |(_, piece)| piece.owner == side)
    }

    pub fn count(&self, side: Side) -> usize {
        self.pieces_of(side).count()
    }

    /// Encodes the board for the document store.
    pub fn to_wire(&self) -> Result<String, BoardError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a board produced by [`Board::to_wire`].
    pub fn from_wire(s: &str) -> Result<Self, BoardError> {
        Ok(serde_json::from_str(s)?)
    }
}

impl TryFrom<Grid> for Board {
    type Error = BoardError;

    fn try_from(grid: Grid) -> Result<Self, Self::Error> {
        if grid.len() != BOARD_SIZE {
            return Err(BoardError::BadRowCount { found: grid.len() });
        }
        let mut board = Board::empty();
        for (row, cells) in grid.into_iter().enumerate() {
            if cells.len() != BOARD_SIZE {
                return Err(BoardError::BadColumnCount {
                    row,
                    found: cells.len(),
                });
            }
            for (col, cell) in cells.into_iter().enumerate() {
                if let Some(piece) = cell {
                    board.place(Position { row, col }, piece)?;
                }
            }
        }
        Ok(board)
    }
}

impl From<Board> for Grid {
    fn from(board: Board) -> Self {
        board.cells.iter().map(|row| row.to_vec()).collect()
    }
}

/// Text diagram, one line per row from row 0: `.` empty, `r`/`R` red man/king,
/// `b`/`B` black man/king.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row
                .iter()
                .map(|cell| cell.map_or('.', Piece::symbol))
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut grid: Grid = Vec::with_capacity(BOARD_SIZE);
        for line in s.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| match c {
                    '.' | '-' => Ok(None),
                    'r' => Ok(Some(Piece::man(Side::Red))),
                    'R' => Ok(Some(Piece::king(Side::Red))),
                    'b' => Ok(Some(Piece::man(Side::Black))),
                    'B' => Ok(Some(Piece::king(Side::Black))),
                    symbol => Err(BoardError::InvalidSymbol { symbol }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            grid.push(row);
        }
        Board::try_from(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn initial_layout_has_twelve_men_per_side_on_dark_squares() {
        let board = Board::initial();
        assert_eq!(board.count(Side::Red), 12);
        assert_eq!(board.count(Side::Black), 12);
        for (p, piece) in board.occupied() {
            assert!(p.is_dark(), "piece on light square {p}");
            assert!(!piece.is_king);
            match piece.owner {
                Side::Black => assert!(p.row() < 3),
                Side::Red => assert!(p.row() > 4),
            }
        }
    }

    #[test]
    fn on_board_bounds() {
        assert!(is_on_board(0, 0));
        assert!(is_on_board(7, 7));
        assert!(!is_on_board(-1, 3));
        assert!(!is_on_board(3, 8));
        assert!(Position::new(8, 0).is_none());
        assert_eq!(pos(0, 1).offset(-1, -1), None);
        assert_eq!(pos(2, 3).offset(-2, -2), Some(pos(0, 1)));
    }

    #[test]
    fn decoded_positions_stay_on_the_board() {
        let p: Position = serde_json::from_str(r#"{"row":2,"col":3}"#).unwrap();
        assert_eq!(p, pos(2, 3));
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"row":2,"col":3}"#);

        let err = serde_json::from_str::<Position>(r#"{"row":8,"col":1}"#).unwrap_err();
        assert!(err.to_string().contains("off the board"), "{err}");
    }

    #[test]
    fn wire_format_uses_owner_and_is_king_fields() {
        let mut board = Board::empty();
        board.place(pos(0, 1), Piece::king(Side::Red)).unwrap();
        let wire = board.to_wire().unwrap();
        assert!(wire.starts_with("[[null,{\"owner\":\"red\",\"isKing\":true},null"));
        assert_eq!(Board::from_wire(&wire).unwrap(), board);
    }

    #[test]
    fn wire_decode_rejects_malformed_grids() {
        assert!(matches!(
            Board::from_wire("[[null]]"),
            Err(BoardError::Json(_))
        ));
        let mut grid: Grid = vec![vec![None; BOARD_SIZE]; BOARD_SIZE];
        grid[0][0] = Some(Piece::man(Side::Black));
        assert!(matches!(
            Board::try_from(grid),
            Err(BoardError::LightSquareOccupied { row: 0, col: 0 })
        ));
        let short: Grid = vec![vec![None; BOARD_SIZE]; 7];
        assert!(matches!(
            Board::try_from(short),
            Err(BoardError::BadRowCount { found: 7 })
        ));
    }

    #[test]
    fn diagram_round_trips_through_display() {
        let board = Board::initial();
        let parsed: Board = board.to_string().parse().unwrap();
        assert_eq!(parsed, board);
        assert!(matches!(
            "x".parse::<Board>(),
            Err(BoardError::InvalidSymbol { symbol: 'x' })
        ));
    }

    #[test]
    fn promotion_is_idempotent() {
        let king = Piece::man(Side::Black).promoted();
        assert!(king.is_king);
        assert_eq!(king.promoted(), king);
    }
}
