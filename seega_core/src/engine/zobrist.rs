use crate::logic::board::{Cell, Player, NUM_CELLS};
use std::sync::OnceLock;

// 2 players * 49 cells
const NUM_PLAYERS: usize = 2;
const TABLE_SIZE: usize = NUM_PLAYERS * NUM_CELLS;

pub struct ZobristKeys {
    pub stone_keys: [u64; TABLE_SIZE],
}

// Simple XorShift RNG for deterministic keys without dependencies
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = XorShift64::new(0x5EE6_A7E5_1234_5678);
        let mut stone_keys = [0; TABLE_SIZE];
        for key in &mut stone_keys {
            *key = rng.next();
        }
        Self { stone_keys }
    }

    /// Keys are generated once from a fixed seed, so hashes are stable across
    /// runs and survive a save/restore of the game state.
    pub fn get() -> &'static Self {
        static INSTANCE: OnceLock<ZobristKeys> = OnceLock::new();
        INSTANCE.get_or_init(ZobristKeys::new)
    }

    pub fn stone_key(&self, player: Player, cell: Cell) -> u64 {
        let idx = player.index() * NUM_CELLS + cell.index();
        self.stone_keys.get(idx).copied().unwrap_or(0)
    }
}
