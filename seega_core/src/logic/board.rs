use crate::engine::zobrist::ZobristKeys;
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::fmt;

pub const BOARD_SIZE: usize = 7;
pub const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE;
pub const STONES_PER_PLAYER: u8 = 24;
pub const CENTER: Cell = Cell::new_unchecked(3, 3);

/// Orthogonal step offsets in scan order: up, down, left, right.
pub const DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// One bit per cell, bit index `row * 7 + col`.
pub type Bitboard = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Light,
    Dark,
}

impl Player {
    pub const ALL: [Self; 2] = [Self::Light, Self::Dark];

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Light => 0,
            Self::Dark => 1,
        }
    }

    const fn symbol(self) -> char {
        match self {
            Self::Light => 'L',
            Self::Dark => 'D',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "Light"),
            Self::Dark => write!(f, "Dark"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

impl Cell {
    /// Checked constructor; `None` outside the 7x7 grid.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self {
                row: u8::try_from(row).ok()?,
                col: u8::try_from(col).ok()?,
            })
        } else {
            None
        }
    }

    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Mailbox/bitboard index. Only meaningful for in-bounds cells.
    pub const fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_index(sq: usize) -> Self {
        Self {
            row: (sq / BOARD_SIZE) as u8,
            col: (sq % BOARD_SIZE) as u8,
        }
    }

    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let r = i16::from(self.row) + i16::from(dr);
        let c = i16::from(self.col) + i16::from(dc);
        Self::new(usize::try_from(r).ok()?, usize::try_from(c).ok()?)
    }

    pub const fn manhattan(self, other: Self) -> u8 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    pub const fn is_corner(self) -> bool {
        let last = (BOARD_SIZE - 1) as u8;
        (self.row == 0 || self.row == last) && (self.col == 0 || self.col == last)
    }

    pub const fn is_edge(self) -> bool {
        let last = (BOARD_SIZE - 1) as u8;
        self.row == 0 || self.row == last || self.col == 0 || self.col == last
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

pub const fn in_bounds(cell: Cell) -> bool {
    (cell.row as usize) < BOARD_SIZE && (cell.col as usize) < BOARD_SIZE
}

pub fn is_center(cell: Cell) -> bool {
    cell == CENTER
}

/// In-bounds orthogonal neighbours of `cell`, in `DIRECTIONS` order.
pub fn orthogonal_neighbors(cell: Cell) -> impl Iterator<Item = Cell> {
    let valid = in_bounds(cell);
    DIRECTIONS
        .into_iter()
        .filter(move |_| valid)
        .filter_map(move |(dr, dc)| cell.offset(dr, dc))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    // Index: player.index()
    pub stones: [Bitboard; 2],
    // Mailbox for O(1) lookup
    #[serde(with = "BigArray")]
    pub grid: [Option<Player>; NUM_CELLS],
    pub zobrist_hash: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stones: [0; 2],
            grid: [None; NUM_CELLS],
            zobrist_hash: 0,
        }
    }

    #[must_use]
    pub fn get(&self, cell: Cell) -> Option<Player> {
        if !in_bounds(cell) {
            return None;
        }
        self.grid.get(cell.index()).copied().flatten()
    }

    pub fn is_empty(&self, cell: Cell) -> bool {
        in_bounds(cell) && self.get(cell).is_none()
    }

    pub fn is_owned_by(&self, cell: Cell, player: Player) -> bool {
        self.get(cell) == Some(player)
    }

    /// Puts a stone on an empty in-bounds cell. Occupied or out-of-bounds
    /// cells are left untouched.
    pub fn place(&mut self, cell: Cell, player: Player) {
        if !self.is_empty(cell) {
            return;
        }
        let sq = cell.index();
        if let Some(slot) = self.grid.get_mut(sq) {
            *slot = Some(player);
        }
        if let Some(bb) = self.stones.get_mut(player.index()) {
            *bb |= 1 << sq;
        }
        self.zobrist_hash ^= ZobristKeys::get().stone_key(player, cell);
    }

    pub fn remove(&mut self, cell: Cell) -> Option<Player> {
        let player = self.get(cell)?;
        let sq = cell.index();
        if let Some(slot) = self.grid.get_mut(sq) {
            *slot = None;
        }
        if let Some(bb) = self.stones.get_mut(player.index()) {
            *bb &= !(1 << sq);
        }
        self.zobrist_hash ^= ZobristKeys::get().stone_key(player, cell);
        Some(player)
    }

    pub fn move_stone(&mut self, from: Cell, to: Cell) -> Option<Player> {
        if !self.is_empty(to) {
            return None;
        }
        let player = self.remove(from)?;
        self.place(to, player);
        Some(player)
    }

    pub fn bitboard(&self, player: Player) -> Bitboard {
        self.stones.get(player.index()).copied().unwrap_or(0)
    }

    pub fn count(&self, player: Player) -> u32 {
        self.bitboard(player).count_ones()
    }

    pub fn empty_count(&self) -> u32 {
        let total = u32::try_from(NUM_CELLS).unwrap_or(49);
        total - self.count(Player::Light) - self.count(Player::Dark)
    }

    /// Cells owned by `player`, in row-major order.
    pub fn stones_of(&self, player: Player) -> BitboardIterator {
        BitboardIterator::new(self.bitboard(player))
    }

    pub fn calculate_hash(&self) -> u64 {
        let keys = ZobristKeys::get();
        let mut hash = 0;
        for player in Player::ALL {
            for cell in self.stones_of(player) {
                hash ^= keys.stone_key(player, cell);
            }
        }
        hash
    }

    /// Parses the diagram format produced by `Display`: seven lines of seven
    /// symbols, `L` for Light, `D` for Dark and `.` for empty. Whitespace
    /// inside a line is ignored.
    pub fn from_diagram(diagram: &str) -> Option<Self> {
        let mut board = Self::new();
        let rows: Vec<&str> = diagram
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if rows.len() != BOARD_SIZE {
            return None;
        }
        for (r, line) in rows.iter().enumerate() {
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != BOARD_SIZE {
                return None;
            }
            for (c, symbol) in symbols.into_iter().enumerate() {
                let cell = Cell::new(r, c)?;
                match symbol {
                    'L' | 'l' => board.place(cell, Player::Light),
                    'D' | 'd' => board.place(cell, Player::Dark),
                    '.' => {}
                    _ => return None,
                }
            }
        }
        Some(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..BOARD_SIZE {
            for c in 0..BOARD_SIZE {
                let cell = Cell::from_index(r * BOARD_SIZE + c);
                let symbol = self.get(cell).map_or('.', Player::symbol);
                write!(f, "{symbol}")?;
            }
            if r + 1 < BOARD_SIZE {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

pub struct BitboardIterator {
    bb: Bitboard,
}

impl BitboardIterator {
    pub const fn new(bb: Bitboard) -> Self {
        Self { bb }
    }
}

impl Iterator for BitboardIterator {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bb == 0 {
            None
        } else {
            let lsb = self.bb.trailing_zeros() as usize;
            self.bb &= self.bb - 1;
            Some(Cell::from_index(lsb))
        }
    }
}
