//! Connect Four rules engine
//!
//! A 6x7 board stored as signed cells (`+1` for [`Player::One`], `-1` for
//! [`Player::Two`], `0` for empty). Row 0 is the top of the board and pieces
//! fall to the lowest empty row of a column.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::game_state::{GameState, Outcome, Placement, Player};
use crate::{MCTSError, Result};

/// Number of rows on a standard board
pub const ROWS: usize = 6;

/// Number of columns on a standard board
pub const COLS: usize = 7;

/// Pieces in a line needed to win
const CONNECT: usize = 4;

/// Line directions checked for wins: horizontal, vertical and both diagonals
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// A Connect Four position
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[i8; COLS]; ROWS],
}

impl Board {
    /// Creates an empty board
    pub fn new() -> Self {
        Board {
            cells: [[0; COLS]; ROWS],
        }
    }

    /// Builds a board from raw cells, rejecting positions that cannot occur in play
    pub fn from_cells(cells: [[i8; COLS]; ROWS]) -> Result<Self> {
        let board = Board { cells };
        board.validate()?;
        Ok(board)
    }

    /// Builds a board from rows of arbitrary length, checking the dimensions first
    pub fn from_rows<R: AsRef<[i8]>>(rows: &[R]) -> Result<Self> {
        if rows.len() != ROWS {
            return Err(MCTSError::InvalidBoard(format!(
                "expected {} rows, got {}",
                ROWS,
                rows.len()
            )));
        }

        let mut cells = [[0; COLS]; ROWS];
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != COLS {
                return Err(MCTSError::InvalidBoard(format!(
                    "row {} has {} columns, expected {}",
                    row,
                    values.len(),
                    COLS
                )));
            }
            cells[row].copy_from_slice(values);
        }

        Self::from_cells(cells)
    }

    /// Returns the raw cell grid
    pub fn cells(&self) -> &[[i8; COLS]; ROWS] {
        &self.cells
    }

    /// Returns the owner of a cell, if any
    pub fn get(&self, row: usize, column: usize) -> Option<Player> {
        self.cells
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|&cell| Player::from_sign(cell))
    }

    /// Number of pieces on the board
    pub fn piece_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell != 0)
            .count()
    }

    /// The player to move, assuming [`Player::One`] opened the game
    pub fn player_to_move(&self) -> Player {
        if self.piece_count() % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    /// Returns true when no empty cell remains
    pub fn is_full(&self) -> bool {
        self.cells[0].iter().all(|&cell| cell != 0)
    }

    /// Finds a completed line anywhere on the board
    pub fn winner(&self) -> Option<Player> {
        for row in 0..ROWS {
            for column in 0..COLS {
                let Some(player) = Player::from_sign(self.cells[row][column]) else {
                    continue;
                };
                for &(dr, dc) in &DIRECTIONS {
                    if self.run_length(row, column, dr, dc, player.sign()) >= CONNECT {
                        return Some(player);
                    }
                }
            }
        }
        None
    }

    /// Plays random legal moves from this position
    ///
    /// Stops after `plies` moves, or earlier if the next move would end the game,
    /// so the returned position is always non-terminal when this one is.
    pub fn random_position<R: Rng + ?Sized>(&self, plies: usize, rng: &mut R) -> Board {
        let mut board = *self;
        for _ in 0..plies {
            if board.terminal_state().is_some() {
                break;
            }
            let moves = board.legal_moves();
            let Some(&placement) = moves.choose(rng) else {
                break;
            };
            let player = board.player_to_move();
            let Ok(next) = board.apply_move(player, placement) else {
                break;
            };
            if next.terminal_state_after(placement, player).is_some() {
                break;
            }
            board = next;
        }
        board
    }

    fn validate(&self) -> Result<()> {
        let mut balance: i32 = 0;
        for (row, cells) in self.cells.iter().enumerate() {
            for (column, &cell) in cells.iter().enumerate() {
                if !(-1..=1).contains(&cell) {
                    return Err(MCTSError::InvalidBoard(format!(
                        "cell ({}, {}) holds {}, expected -1, 0 or 1",
                        row, column, cell
                    )));
                }
                if cell == 0 && row > 0 && self.cells[row - 1][column] != 0 {
                    return Err(MCTSError::InvalidBoard(format!(
                        "floating piece above empty cell ({}, {})",
                        row, column
                    )));
                }
                balance += cell as i32;
            }
        }

        if !(0..=1).contains(&balance) {
            return Err(MCTSError::InvalidBoard(format!(
                "piece counts are unbalanced (sum {})",
                balance
            )));
        }
        Ok(())
    }

    /// Length of the run of `sign` through (row, column) along one direction
    fn run_length(&self, row: usize, column: usize, dr: isize, dc: isize, sign: i8) -> usize {
        1 + self.count_from(row, column, dr, dc, sign) + self.count_from(row, column, -dr, -dc, sign)
    }

    fn count_from(&self, row: usize, column: usize, dr: isize, dc: isize, sign: i8) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = column as isize + dc;
        while (0..ROWS as isize).contains(&r)
            && (0..COLS as isize).contains(&c)
            && self.cells[r as usize][c as usize] == sign
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for Board {
    const ACTIONS: usize = COLS;

    fn legal_moves(&self) -> Vec<Placement> {
        (0..COLS)
            .filter_map(|column| {
                (0..ROWS)
                    .rev()
                    .find(|&row| self.cells[row][column] == 0)
                    .map(|row| Placement::new(row, column))
            })
            .collect()
    }

    fn apply_move(&self, player: Player, placement: Placement) -> Result<Self> {
        let Placement { row, column } = placement;
        if column >= COLS || row >= ROWS {
            return Err(MCTSError::IllegalMove { column });
        }
        if self.cells[row][column] != 0 {
            return Err(MCTSError::IllegalMove { column });
        }
        if row + 1 < ROWS && self.cells[row + 1][column] == 0 {
            return Err(MCTSError::IllegalMove { column });
        }

        let mut next = *self;
        next.cells[row][column] = player.sign();
        Ok(next)
    }

    fn terminal_state(&self) -> Option<Outcome> {
        if let Some(winner) = self.winner() {
            return Some(Outcome::Win(winner));
        }
        if self.is_full() {
            return Some(Outcome::Draw);
        }
        None
    }

    fn terminal_state_after(&self, placement: Placement, player: Player) -> Option<Outcome> {
        let Placement { row, column } = placement;
        if row < ROWS && column < COLS && self.cells[row][column] == player.sign() {
            for &(dr, dc) in &DIRECTIONS {
                if self.run_length(row, column, dr, dc, player.sign()) >= CONNECT {
                    return Some(Outcome::Win(player));
                }
            }
        }
        if self.is_full() {
            return Some(Outcome::Draw);
        }
        None
    }
}

impl FromStr for Board {
    type Err = MCTSError;

    /// Parses six lines of seven characters: `X`, `O` or `.` (top row first)
    fn from_str(s: &str) -> Result<Self> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|ch| match ch {
                        'X' | 'x' => Ok(Player::One.sign()),
                        'O' | 'o' => Ok(Player::Two.sign()),
                        '.' | '-' | '_' => Ok(0),
                        other => Err(MCTSError::InvalidBoard(format!(
                            "unexpected character {:?}",
                            other
                        ))),
                    })
                    .collect::<Result<Vec<i8>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Board::from_rows(&rows)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for &cell in row {
                let symbol = match Player::from_sign(cell) {
                    Some(player) => player.to_string(),
                    None => ".".to_string(),
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board(")?;
        write!(f, "{}", self)?;
        write!(f, ")")
    }
}
