use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::maze::{Cell, Maze, Pos};

pub const SPEED_BOOST: f64 = 2.0;
pub const SLOW_DOWN: f64 = 0.5;
pub const RECENT_CAP: usize = 6;
pub const MOVE_INTERVAL: Duration = Duration::from_millis(200);

/// Per-token state shared by both sides. The decision throttle only
/// matters for the opponent; the fractional move budget only matters for
/// the human, whose step size per key press is its speed multiplier.
pub struct Agent {
    pub pos: Pos,
    pub speed: f64,
    recent: VecDeque<Pos>,
    last_decision: Instant,
    move_budget: f64,
}

impl Agent {
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            speed: 1.0,
            recent: VecDeque::with_capacity(RECENT_CAP),
            last_decision: Instant::now(),
            move_budget: 0.0,
        }
    }

    /// True once the minimum real-time interval since the last decision
    /// has elapsed. Non-blocking; the caller supplies the clock.
    pub fn ready(&self, now: Instant) -> bool {
        now.duration_since(self.last_decision) >= MOVE_INTERVAL
    }

    pub fn stamp(&mut self, now: Instant) {
        self.last_decision = now;
    }

    /// Push the current position into the ring before moving off it.
    pub fn record_position(&mut self) {
        if self.recent.len() == RECENT_CAP {
            self.recent.pop_front();
        }
        self.recent.push_back(self.pos);
    }

    pub fn recently_visited(&self, pos: Pos) -> bool {
        self.recent.contains(&pos)
    }

    pub fn recent(&self) -> &VecDeque<Pos> {
        &self.recent
    }

    /// Forget loop-avoidance history, e.g. when the maze shifts under us.
    pub fn clear_recent(&mut self) {
        self.recent.clear();
        self.move_budget = 0.0;
    }

    /// Accrue one key press worth of movement and return the whole cells
    /// it pays for. At x0.5 every second press yields a step; at x2.0 a
    /// single press yields two.
    pub fn take_steps(&mut self) -> u32 {
        self.move_budget += self.speed;
        let steps = self.move_budget as u32;
        self.move_budget -= steps as f64;
        steps
    }

    /// Consume whatever tile the agent just landed on. Bonus boosts speed
    /// and scores a point, Trap slows; either way the cell reverts to Open
    /// so a second visit is a no-op.
    pub fn apply_tile_effect(&mut self, maze: &mut Maze, score: &mut u32) {
        match maze.get(self.pos) {
            Cell::Bonus => {
                self.speed = SPEED_BOOST;
                *score += 1;
                maze.set(self.pos, Cell::Open);
            }
            Cell::Trap => {
                self.speed = SLOW_DOWN;
                maze.set(self.pos, Cell::Open);
            }
            Cell::Open | Cell::Wall => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonus_consumption_is_idempotent() {
        let mut maze = Maze::new(5);
        maze.set(Pos::new(2, 2), Cell::Bonus);
        let mut agent = Agent::new(Pos::new(2, 2));
        let mut score = 0;

        agent.apply_tile_effect(&mut maze, &mut score);
        assert_eq!(score, 1);
        assert_eq!(agent.speed, SPEED_BOOST);
        assert_eq!(maze.get(Pos::new(2, 2)), Cell::Open);

        // Landing on the now-Open cell again changes nothing.
        agent.apply_tile_effect(&mut maze, &mut score);
        assert_eq!(score, 1);
        assert_eq!(agent.speed, SPEED_BOOST);
    }

    #[test]
    fn trap_slows_without_scoring() {
        let mut maze = Maze::new(5);
        maze.set(Pos::new(1, 3), Cell::Trap);
        let mut agent = Agent::new(Pos::new(1, 3));
        let mut score = 0;

        agent.apply_tile_effect(&mut maze, &mut score);
        assert_eq!(score, 0);
        assert_eq!(agent.speed, SLOW_DOWN);
        assert_eq!(maze.get(Pos::new(1, 3)), Cell::Open);
    }

    #[test]
    fn throttle_gates_on_the_interval() {
        let mut agent = Agent::new(Pos::new(0, 0));
        let t0 = Instant::now();
        agent.stamp(t0);
        assert!(!agent.ready(t0));
        assert!(!agent.ready(t0 + Duration::from_millis(100)));
        assert!(agent.ready(t0 + MOVE_INTERVAL));
        assert!(agent.ready(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn recent_ring_evicts_oldest() {
        let mut agent = Agent::new(Pos::new(0, 0));
        for col in 0..8 {
            agent.pos = Pos::new(0, col);
            agent.record_position();
        }
        assert!(!agent.recently_visited(Pos::new(0, 0)));
        assert!(!agent.recently_visited(Pos::new(0, 1)));
        for col in 2..8 {
            assert!(agent.recently_visited(Pos::new(0, col)));
        }
        agent.clear_recent();
        assert!(!agent.recently_visited(Pos::new(0, 5)));
    }

    #[test]
    fn move_budget_tracks_speed() {
        let mut agent = Agent::new(Pos::new(0, 0));
        assert_eq!(agent.take_steps(), 1);
        assert_eq!(agent.take_steps(), 1);

        agent.speed = SPEED_BOOST;
        assert_eq!(agent.take_steps(), 2);

        agent.speed = SLOW_DOWN;
        assert_eq!(agent.take_steps(), 0);
        assert_eq!(agent.take_steps(), 1);
        assert_eq!(agent.take_steps(), 0);
    }
}
