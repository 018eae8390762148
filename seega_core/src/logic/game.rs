use crate::engine::Action;
use crate::logic::board::{is_center, Board, Cell, Player, STONES_PER_PLAYER};
use crate::logic::capture::resolve_captures;
use crate::logic::history::History;
use crate::logic::rules::{has_any_legal_move, validate_placement, validate_step, MoveError};
use crate::logic::variants::VariantFlags;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// A player with this many stones or fewer has lost.
pub const LOSS_THRESHOLD: u32 = 7;
/// Recurrences of a board since the last capture that force a stalemate.
pub const REPETITION_LIMIT: u32 = 6;
pub const STONES_PER_TURN: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Placement,
    Movement,
    /// The stone on `origin` just captured and may keep moving.
    Chain { origin: Cell },
    /// `blocked` cannot move; their opponent removes one of `blocked`'s stones.
    Blockade { blocked: Player },
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawType {
    Mutual,
    Repetition,
    Insufficient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    StoneCount {
        loser: Player,
        loser_count: u32,
        threshold: u32,
    },
    Resignation {
        resigned_player: Player,
    },
    Stalemate {
        draw_type: DrawType,
    },
}

/// `winner == None` is a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Option<Player>,
    pub reason: WinReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Board index of the origin cell.
    pub piece_id: u8,
    pub player: Player,
    pub from: Cell,
    pub to: Cell,
    /// 1-based ordinal of the movement ply.
    pub ply: u32,
}

impl MoveRecord {
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(player: Player, from: Cell, to: Cell, ply: u32) -> Self {
        Self {
            piece_id: from.index() as u8,
            player,
            from,
            to,
            ply,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub current: Player,
    pub phase: Phase,
    pub stones_to_place: [u8; 2],
    /// Stones placed so far in the current placement turn.
    pub placement_count: u8,
    pub move_history: History<MoveRecord>,
    pub variants: VariantFlags,
    pub captured_last_move: Vec<Cell>,
    pub outcome: Option<Outcome>,
    pub stalemate_offers: [bool; 2],
    pub move_repetition: u32,
    pub last_board_hash: Option<u64>,
    /// Board hashes seen since the last irreversible change.
    pub position_history: History<u64>,
    /// The side to move already lost a stone to the current blockade.
    #[serde(default)]
    pub blockade_spent: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(VariantFlags::default())
    }
}

impl GameState {
    #[must_use]
    pub const fn new(variants: VariantFlags) -> Self {
        Self {
            board: Board::new(),
            current: Player::Light,
            phase: Phase::Placement,
            stones_to_place: [STONES_PER_PLAYER; 2],
            placement_count: 0,
            move_history: History::new(),
            variants,
            captured_last_move: Vec::new(),
            outcome: None,
            stalemate_offers: [false; 2],
            move_repetition: 0,
            last_board_hash: None,
            position_history: History::new(),
            blockade_spent: false,
        }
    }

    /// A Movement-phase state around an arbitrary board, e.g. a restored
    /// position or an analysis diagram. Terminal and blockade conditions are
    /// evaluated immediately.
    #[must_use]
    pub fn from_board(board: Board, current: Player, variants: VariantFlags) -> Self {
        let mut state = Self {
            board,
            current,
            phase: Phase::Movement,
            stones_to_place: [0; 2],
            ..Self::new(variants)
        };
        state.position_history.push(board.zobrist_hash);
        state.last_board_hash = Some(board.zobrist_hash);
        state.refresh_status();
        state
    }

    pub const fn chain_origin(&self) -> Option<Cell> {
        match self.phase {
            Phase::Chain { origin } => Some(origin),
            _ => None,
        }
    }

    /// `None` while the game is running, `Some(None)` for a draw.
    pub const fn winner(&self) -> Option<Option<Player>> {
        match self.outcome {
            Some(outcome) => Some(outcome.winner),
            None => None,
        }
    }

    pub const fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// The player whose decision the game is waiting on. During a blockade
    /// this is the opponent of the blocked player.
    pub const fn acting_player(&self) -> Player {
        match self.phase {
            Phase::Blockade { blocked } => blocked.opposite(),
            _ => self.current,
        }
    }

    pub fn stones_to_place_for(&self, player: Player) -> u8 {
        self.stones_to_place.get(player.index()).copied().unwrap_or(0)
    }

    pub fn has_offered_stalemate(&self, player: Player) -> bool {
        self.stalemate_offers.get(player.index()).copied().unwrap_or(false)
    }

    const fn ensure_live(&self) -> Result<(), MoveError> {
        if self.outcome.is_some() {
            return Err(MoveError::GameOver);
        }
        Ok(())
    }

    /// Places one or two stones for the side to move.
    pub fn apply_placement(&self, first: Cell, second: Option<Cell>) -> Result<Self, MoveError> {
        self.ensure_live()?;
        if self.phase != Phase::Placement {
            return Err(MoveError::WrongPhase);
        }

        let player = self.current;
        let requested = if second.is_some() { 2 } else { 1 };
        let allowed = STONES_PER_TURN
            .saturating_sub(self.placement_count)
            .min(self.stones_to_place_for(player));
        if requested > allowed {
            return Err(MoveError::PlacementLimit);
        }

        let mut next = self.clone();
        next.captured_last_move.clear();
        for cell in std::iter::once(first).chain(second) {
            validate_placement(&next.board, cell)?;
            next.board.place(cell, player);
            if let Some(left) = next.stones_to_place.get_mut(player.index()) {
                *left -= 1;
            }
            next.placement_count += 1;
        }

        if next.placement_count >= STONES_PER_TURN || next.stones_to_place_for(player) == 0 {
            next.current = player.opposite();
            next.placement_count = 0;
            if next.stones_to_place_for(next.current) == 0 {
                next.current = player;
            }
        }

        if next.stones_to_place.iter().all(|&left| left == 0) {
            next.phase = Phase::Movement;
            next.current = Player::Light;
            debug!("placement finished, {} opens the movement phase", next.current);
            next.position_history.push(next.board.zobrist_hash);
            next.last_board_hash = Some(next.board.zobrist_hash);
            next.refresh_status();
        }
        Ok(next)
    }

    /// Moves a stone of the side to move one orthogonal step.
    pub fn apply_move(&self, from: Cell, to: Cell) -> Result<Self, MoveError> {
        self.ensure_live()?;
        if self.phase != Phase::Movement {
            return Err(MoveError::WrongPhase);
        }
        self.step(from, to)
    }

    /// Continues a chain capture with the stone on the chain origin.
    pub fn apply_chain_step(&self, to: Cell) -> Result<Self, MoveError> {
        self.ensure_live()?;
        let origin = self.chain_origin().ok_or(MoveError::NotInChainMode)?;
        self.step(origin, to)
    }

    pub fn end_chain(&self) -> Result<Self, MoveError> {
        self.ensure_live()?;
        if self.chain_origin().is_none() {
            return Err(MoveError::NotInChainMode);
        }
        let mut next = self.clone();
        next.captured_last_move.clear();
        next.phase = Phase::Movement;
        next.current = self.current.opposite();
        next.refresh_status();
        Ok(next)
    }

    /// Removes one stone of the blocked player; the blocked player then moves.
    /// The center stone keeps its immunity here too. One removal per
    /// blockade: a player still stuck afterwards passes instead.
    pub fn resolve_blockade(&self, target: Cell) -> Result<Self, MoveError> {
        self.ensure_live()?;
        let Phase::Blockade { blocked } = self.phase else {
            return Err(MoveError::WrongPhase);
        };
        if is_center(target) || !self.board.is_owned_by(target, blocked) {
            return Err(MoveError::InvalidBlockadeTarget);
        }

        let mut next = self.clone();
        next.board.remove(target);
        next.captured_last_move = vec![target];
        next.phase = Phase::Movement;
        next.current = blocked;
        next.blockade_spent = true;
        next.record_position(true);
        debug!("blockade resolved: removed {blocked} stone at {target}");
        next.refresh_status();
        Ok(next)
    }

    /// Hands the turn over when the side to move has no legal move, either
    /// with the blockade removal variant off or after its one removal.
    pub fn pass_turn(&self) -> Result<Self, MoveError> {
        self.ensure_live()?;
        if self.phase != Phase::Movement {
            return Err(MoveError::WrongPhase);
        }
        if has_any_legal_move(self, self.current) {
            return Err(MoveError::PassNotAllowed);
        }
        let mut next = self.clone();
        next.captured_last_move.clear();
        next.current = self.current.opposite();
        next.blockade_spent = false;
        next.refresh_status();
        Ok(next)
    }

    pub fn offer_stalemate(&self, player: Player) -> Result<Self, MoveError> {
        self.ensure_after_placement()?;
        let mut next = self.clone();
        if let Some(flag) = next.stalemate_offers.get_mut(player.index()) {
            *flag = true;
        }
        next.refresh_status();
        Ok(next)
    }

    /// Withdraws `player`'s pending offer.
    pub fn reject_stalemate(&self, player: Player) -> Result<Self, MoveError> {
        self.ensure_after_placement()?;
        let mut next = self.clone();
        if let Some(flag) = next.stalemate_offers.get_mut(player.index()) {
            *flag = false;
        }
        Ok(next)
    }

    pub fn resign(&self, player: Player) -> Result<Self, MoveError> {
        self.ensure_after_placement()?;
        let mut next = self.clone();
        next.finish(Outcome {
            winner: Some(player.opposite()),
            reason: WinReason::Resignation {
                resigned_player: player,
            },
        });
        Ok(next)
    }

    pub fn apply_action(&self, action: Action) -> Result<Self, MoveError> {
        match action {
            Action::Place { cell } => self.apply_placement(cell, None),
            Action::Move { from, to } => match self.phase {
                Phase::Chain { .. } => {
                    if self.chain_origin() != Some(from) {
                        return Err(MoveError::NotInChainMode);
                    }
                    self.apply_chain_step(to)
                }
                _ => self.apply_move(from, to),
            },
            Action::EndChain => self.end_chain(),
            Action::RemoveBlocked { cell } => self.resolve_blockade(cell),
            Action::Pass => self.pass_turn(),
        }
    }

    const fn ensure_after_placement(&self) -> Result<(), MoveError> {
        if self.outcome.is_some() {
            return Err(MoveError::GameOver);
        }
        if matches!(self.phase, Phase::Placement) {
            return Err(MoveError::WrongPhase);
        }
        Ok(())
    }

    fn step(&self, from: Cell, to: Cell) -> Result<Self, MoveError> {
        validate_step(self, from, to)?;

        let player = self.current;
        let mut next = self.clone();
        next.captured_last_move.clear();
        next.blockade_spent = false;
        next.board.move_stone(from, to);

        let ply = u32::try_from(self.move_history.len()).unwrap_or(u32::MAX - 1) + 1;
        next.move_history.push(MoveRecord::new(player, from, to, ply));

        let captured = resolve_captures(&next.board, to);
        for &cell in &captured {
            next.board.remove(cell);
        }
        next.record_position(!captured.is_empty());

        if captured.is_empty() {
            next.phase = Phase::Movement;
            next.current = player.opposite();
        } else {
            debug!("{player} {from}->{to} captured {} stone(s)", captured.len());
            next.phase = Phase::Chain { origin: to };
        }
        next.captured_last_move = captured;
        next.refresh_status();
        Ok(next)
    }

    fn record_position(&mut self, irreversible: bool) {
        let hash = self.board.zobrist_hash;
        if irreversible {
            self.position_history.clear();
            self.move_repetition = 0;
        } else if self.position_history.contains(&hash) {
            self.move_repetition += 1;
        }
        self.position_history.push(hash);
        self.last_board_hash = Some(hash);
    }

    fn finish(&mut self, outcome: Outcome) {
        match outcome.winner {
            Some(winner) => info!("game over: {winner} wins ({:?})", outcome.reason),
            None => info!("game over: draw ({:?})", outcome.reason),
        }
        self.outcome = Some(outcome);
        self.phase = Phase::Finished;
    }

    /// Applies the win/draw detector and, when the side to move is stuck under
    /// the blockade variant and has not yet lost a stone to it, opens the
    /// removal sub-mode.
    fn refresh_status(&mut self) {
        if let Some(outcome) = check_win(self) {
            self.finish(outcome);
            return;
        }
        if self.phase == Phase::Movement
            && self.variants.blockade_one_removal
            && !self.blockade_spent
            && !has_any_legal_move(self, self.current)
        {
            debug!("{} is blockaded", self.current);
            self.phase = Phase::Blockade {
                blocked: self.current,
            };
        }
    }
}

/// Terminal condition for `state`, if any.
pub fn check_win(state: &GameState) -> Option<Outcome> {
    if state.outcome.is_some() {
        return state.outcome;
    }

    if state.phase != Phase::Placement {
        for player in Player::ALL {
            let count = state.board.count(player);
            if count <= LOSS_THRESHOLD {
                return Some(Outcome {
                    winner: Some(player.opposite()),
                    reason: WinReason::StoneCount {
                        loser: player,
                        loser_count: count,
                        threshold: LOSS_THRESHOLD,
                    },
                });
            }
        }
    }

    if state.stalemate_offers.iter().all(|&offered| offered) {
        return Some(stalemate(&state.board, DrawType::Mutual));
    }
    if state.move_repetition >= REPETITION_LIMIT {
        return Some(stalemate(&state.board, DrawType::Repetition));
    }
    if matches!(state.phase, Phase::Movement | Phase::Chain { .. })
        && Player::ALL
            .into_iter()
            .all(|player| !has_any_legal_move(state, player))
    {
        return Some(stalemate(&state.board, DrawType::Insufficient));
    }
    None
}

/// Stalemates go to the player with strictly more stones.
fn stalemate(board: &Board, draw_type: DrawType) -> Outcome {
    let light = board.count(Player::Light);
    let dark = board.count(Player::Dark);
    let winner = match light.cmp(&dark) {
        std::cmp::Ordering::Greater => Some(Player::Light),
        std::cmp::Ordering::Less => Some(Player::Dark),
        std::cmp::Ordering::Equal => None,
    };
    Outcome {
        winner,
        reason: WinReason::Stalemate { draw_type },
    }
}
