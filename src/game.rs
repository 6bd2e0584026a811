use std::time::{Duration, Instant};

use rand::Rng;

use crate::agent::Agent;
use crate::ai::choose_move;
use crate::maze::{Dir, Maze};
use crate::mazegen::generate_solvable;

pub const SHIFT_INTERVAL: u32 = 5;
pub const TIME_LIMIT: Duration = Duration::from_secs(60);

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Classic,
    TimeTrial,
    Survival,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Classic => "Classic",
            Mode::TimeTrial => "Time Trial",
            Mode::Survival => "Survival",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
}

impl Difficulty {
    pub fn level(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    HumanWins,
    OpponentWins,
    TimeUp,
}

#[derive(Default)]
pub struct Scores {
    pub human: u32,
    pub opponent: u32,
}

/// One play session: the live maze, both tokens, scores and the shift
/// counter. All mutation happens serially within a tick, in the order
/// input, human move, shift check, opponent decision, termination check.
pub struct Game {
    pub maze: Maze,
    pub human: Agent,
    pub opponent: Agent,
    pub scores: Scores,
    pub mode: Mode,
    pub difficulty: Difficulty,
    moves_since_shift: u32,
    started: Instant,
}

impl Game {
    pub fn new(size: usize, mode: Mode, difficulty: Difficulty, rng: &mut impl Rng) -> Self {
        let maze = generate_solvable(size, rng);
        let human = Agent::new(maze.top_left());
        let opponent = Agent::new(maze.bottom_right());
        Self {
            maze,
            human,
            opponent,
            scores: Scores::default(),
            mode,
            difficulty,
            moves_since_shift: 0,
            started: Instant::now(),
        }
    }

    /// Apply one directional key press. Rejected outright when the
    /// adjacent cell in that direction is a wall or off-grid. An accepted
    /// press pays speed-multiplier cells out of the move budget, each step
    /// gated on traversability and consuming whatever tile it lands on.
    pub fn apply_human_input(&mut self, dir: Dir) -> bool {
        let accepted = matches!(
            self.maze.step(self.human.pos, dir),
            Some(next) if self.maze.traversable(next)
        );
        if !accepted {
            return false;
        }

        let mut steps = self.human.take_steps();
        if steps > 0 {
            self.human.record_position();
        }
        while steps > 0 {
            let next = match self.maze.step(self.human.pos, dir) {
                Some(p) if self.maze.traversable(p) => p,
                _ => break,
            };
            self.human.pos = next;
            self.human.apply_tile_effect(&mut self.maze, &mut self.scores.human);
            steps -= 1;
        }

        self.moves_since_shift += 1;
        true
    }

    /// Swap in a fresh maze once enough human moves have accumulated.
    /// Token positions survive the shift; their loop-avoidance history
    /// refers to the discarded layout and is dropped.
    pub fn maybe_shift(&mut self, rng: &mut impl Rng) -> bool {
        if self.moves_since_shift < SHIFT_INTERVAL {
            return false;
        }
        self.maze = generate_solvable(self.maze.size(), rng);
        self.moves_since_shift = 0;
        self.human.clear_recent();
        self.opponent.clear_recent();
        true
    }

    /// One opponent decision, throttled to the minimum decision interval.
    /// The timestamp advances even when the opponent turns out to be boxed
    /// in, so a stuck opponent does not retry at an unthrottled rate.
    pub fn move_opponent(&mut self, now: Instant) {
        if !self.opponent.ready(now) {
            return;
        }
        self.opponent.stamp(now);

        let depth = self.difficulty.level() + 1;
        let dest = match choose_move(&self.maze, &self.opponent, self.human.pos, depth) {
            Some(p) => p,
            None => return,
        };
        self.opponent.record_position();
        self.opponent.pos = dest;
        self.opponent
            .apply_tile_effect(&mut self.maze, &mut self.scores.opponent);
    }

    pub fn outcome(&self, now: Instant) -> Option<Outcome> {
        if self.human.pos == self.maze.bottom_right() {
            return Some(Outcome::HumanWins);
        }
        if self.opponent.pos == self.maze.top_left() {
            return Some(Outcome::OpponentWins);
        }
        if self.mode == Mode::TimeTrial && now.duration_since(self.started) >= TIME_LIMIT {
            return Some(Outcome::TimeUp);
        }
        None
    }

    /// Whole seconds left on the Time Trial clock.
    pub fn time_left(&self, now: Instant) -> u64 {
        TIME_LIMIT
            .saturating_sub(now.duration_since(self.started))
            .as_secs()
    }
}
