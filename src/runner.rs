//! Turn loop shared by human and engine players.

use anyhow::{bail, Context, Result};
use seega_core::engine::config::{is_ai_controlled, Controller, Difficulty, PlayerConfig};
use seega_core::engine::search::{AlphaBetaEngine, RankedMove};
use seega_core::engine::stalemate::{should_accept_stalemate, should_offer_stalemate};
use seega_core::engine::Action;
use seega_core::logic::board::{Cell, Player};
use seega_core::logic::game::{GameState, Phase};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

/// Plies between two engine stalemate offers.
const OFFER_COOLDOWN: usize = 12;

/// A line of human input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Act(Action),
    Hint,
    Offer,
    Resign,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default().to_ascii_lowercase();
    let numbers = words
        .map(|w| w.parse::<usize>().with_context(|| format!("'{w}' is not a number")))
        .collect::<Result<Vec<_>>>()?;
    let cell = |r: usize, c: usize| Cell::new(r, c).with_context(|| format!("({r}, {c}) is off the board"));

    let command = match (verb.as_str(), numbers.as_slice()) {
        ("place" | "p", &[r, c]) => Command::Act(Action::Place { cell: cell(r, c)? }),
        ("move" | "m", &[r1, c1, r2, c2]) => Command::Act(Action::Move {
            from: cell(r1, c1)?,
            to: cell(r2, c2)?,
        }),
        ("remove" | "r", &[r, c]) => Command::Act(Action::RemoveBlocked { cell: cell(r, c)? }),
        ("end", []) => Command::Act(Action::EndChain),
        ("pass", []) => Command::Act(Action::Pass),
        ("hint", []) => Command::Hint,
        ("offer", []) => Command::Offer,
        ("resign", []) => Command::Resign,
        ("quit" | "q", []) => Command::Quit,
        _ => bail!(
            "expected: place r c | move r c r c | remove r c | end | pass | hint | offer | resign | quit"
        ),
    };
    Ok(command)
}

pub struct Runner<R, W> {
    engine: AlphaBetaEngine,
    players: PlayerConfig,
    max_plies: usize,
    input: R,
    output: W,
    last_offer: Option<usize>,
}

impl<R: BufRead, W: Write> Runner<R, W> {
    pub const fn new(
        engine: AlphaBetaEngine,
        players: PlayerConfig,
        max_plies: usize,
        input: R,
        output: W,
    ) -> Self {
        Self {
            engine,
            players,
            max_plies,
            input,
            output,
            last_offer: None,
        }
    }

    /// Plays from `state` until the game ends, the ply limit is hit or a
    /// human quits, and returns the last state.
    pub fn play(&mut self, mut state: GameState) -> Result<GameState> {
        for ply in 0..self.max_plies {
            if state.is_over() {
                break;
            }
            writeln!(self.output, "\n{}\n{}", state.board, describe_turn(&state))?;

            let next = if is_ai_controlled(&state, &self.players) {
                self.engine_turn(&state, ply)?
            } else {
                match self.human_turn(&state)? {
                    Some(next) => next,
                    None => {
                        info!("game abandoned at ply {ply}");
                        return Ok(state);
                    }
                }
            };
            state = next;
        }

        match state.outcome {
            Some(outcome) => {
                info!(winner = ?outcome.winner, reason = ?outcome.reason, "game finished");
                writeln!(self.output, "\n{}\nResult: {:?}", state.board, outcome)?;
            }
            None => {
                warn!(max_plies = self.max_plies, "ply limit reached without a result");
                writeln!(self.output, "\nPly limit reached.")?;
            }
        }
        Ok(state)
    }

    fn engine_turn(&mut self, state: &GameState, ply: usize) -> Result<GameState> {
        let player = state.acting_player();
        let Controller::Ai(difficulty) = self.players.controller(player) else {
            bail!("{player} is not engine controlled");
        };

        let cooled_down = !matches!(self.last_offer, Some(at) if ply < at + OFFER_COOLDOWN);
        if cooled_down && should_offer_stalemate(state, player, difficulty) {
            self.last_offer = Some(ply);
            info!(%player, "engine offers a stalemate");
            let offered = state.offer_stalemate(player)?;
            if self.opponent_accepts(&offered, player.opposite())? {
                return Ok(offered.offer_stalemate(player.opposite())?);
            }
            let rejected = offered.reject_stalemate(player)?;
            return self.engine_move(&rejected, difficulty);
        }
        self.engine_move(state, difficulty)
    }

    fn engine_move(&mut self, state: &GameState, difficulty: Difficulty) -> Result<GameState> {
        let player = state.acting_player();
        let action = self
            .engine
            .best_move(state, difficulty)
            .with_context(|| format!("{player} has no legal action"))?;
        info!(%player, %difficulty, %action, "engine move");
        writeln!(self.output, "{player} plays {action}")?;
        Ok(state.apply_action(action)?)
    }

    fn opponent_accepts(&mut self, state: &GameState, opponent: Player) -> Result<bool> {
        match self.players.controller(opponent) {
            Controller::Ai(difficulty) => {
                let accept = should_accept_stalemate(state, opponent, difficulty);
                debug!(%opponent, accept, "stalemate answer");
                Ok(accept)
            }
            Controller::Human => {
                writeln!(self.output, "{} offers a stalemate. Accept? [y/N]", opponent.opposite())?;
                let line = self.read_line()?.unwrap_or_default();
                Ok(line.trim().eq_ignore_ascii_case("y"))
            }
        }
    }

    /// `None` when the human quits or input ends.
    fn human_turn(&mut self, state: &GameState) -> Result<Option<GameState>> {
        let player = state.acting_player();
        loop {
            write!(self.output, "{player}> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                continue;
            }

            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(self.output, "{e}")?;
                    continue;
                }
            };

            let result = match command {
                Command::Quit => return Ok(None),
                Command::Hint => {
                    let hints = self.engine.top_moves(state, 3);
                    self.print_hints(&hints)?;
                    continue;
                }
                Command::Act(action) => state.apply_action(action),
                Command::Resign => state.resign(player),
                Command::Offer => match state.offer_stalemate(player) {
                    Ok(offered) => {
                        if self.opponent_accepts(&offered, player.opposite())? {
                            offered.offer_stalemate(player.opposite())
                        } else {
                            writeln!(self.output, "Offer declined.")?;
                            offered.reject_stalemate(player)
                        }
                    }
                    Err(e) => Err(e),
                },
            };

            match result {
                Ok(next) => return Ok(Some(next)),
                Err(e) => writeln!(self.output, "Illegal: {e}")?,
            }
        }
    }

    fn print_hints(&mut self, hints: &[RankedMove]) -> Result<()> {
        if hints.is_empty() {
            writeln!(self.output, "No suggestions.")?;
        }
        for (rank, hint) in hints.iter().enumerate() {
            writeln!(
                self.output,
                "{}. {} ({:+.1}): {}",
                rank + 1,
                hint.action,
                hint.score,
                hint.rationale
            )?;
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

fn describe_turn(state: &GameState) -> String {
    let player = state.acting_player();
    match state.phase {
        Phase::Placement => format!(
            "{player} to place ({} left)",
            state.stones_to_place_for(player)
        ),
        Phase::Movement => format!("{player} to move"),
        Phase::Chain { origin } => format!("{player} may continue capturing from {origin}"),
        Phase::Blockade { blocked } => {
            format!("{blocked} is blocked; {player} removes one of their stones")
        }
        Phase::Finished => "game over".to_string(),
    }
}
